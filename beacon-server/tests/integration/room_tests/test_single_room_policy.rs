use beacon_core::ServerEvent;
use beacon_server::{RelayConfig, RelayError};

use crate::integration::{create_test_manager, init_tracing};

fn strict_config() -> RelayConfig {
    RelayConfig {
        single_room_per_connection: true,
        ..RelayConfig::default()
    }
}

#[tokio::test]
async fn test_second_create_is_rejected_in_strict_mode() {
    init_tracing();

    let (mut manager, output) = create_test_manager(strict_config());
    let x = output.connect().await;
    let first = manager.create_room(x, "a@x.com".into()).await.unwrap();
    output.clear().await;

    let res = manager.create_room(x, "a@x.com".into()).await;

    assert_eq!(res, Err(RelayError::AlreadyInRoom(first)));
    assert_eq!(
        output.events_for(&x).await,
        vec![ServerEvent::RoomCreateError {
            error: "Already in a room".into()
        }]
    );
    assert_eq!(manager.stats().active_rooms, 1);
}

#[tokio::test]
async fn test_join_of_second_room_is_rejected_in_strict_mode() {
    init_tracing();

    let (mut manager, output) = create_test_manager(strict_config());
    let x = output.connect().await;
    let y = output.connect().await;
    let a = manager.create_room(x, "a@x.com".into()).await.unwrap();
    let b = manager.create_room(y, "b@x.com".into()).await.unwrap();
    output.clear().await;

    let res = manager.join_room(x, "a@x.com".into(), b.clone()).await;

    assert_eq!(res, Err(RelayError::AlreadyInRoom(a.clone())));
    assert_eq!(
        output.events_for(&x).await,
        vec![ServerEvent::RoomJoinError {
            error: "Already in a room".into()
        }]
    );
    assert!(output.events_for(&y).await.is_empty());
    assert_eq!(manager.members(&b), vec![y]);

    // Rejoining the room it already belongs to is fine
    manager.join_room(x, "a@x.com".into(), a).await.unwrap();
}

#[tokio::test]
async fn test_default_mode_allows_several_rooms() {
    init_tracing();

    let (mut manager, output) = create_test_manager(RelayConfig::default());
    let x = output.connect().await;
    manager.create_room(x, "a@x.com".into()).await.unwrap();
    manager.create_room(x, "a@x.com".into()).await.unwrap();
    assert_eq!(manager.rooms_of(&x).len(), 2);

    // call:end without a room token leaves every room
    let retired = manager.end_call(x, None, None).await;

    assert_eq!(retired.len(), 2);
    assert_eq!(manager.stats().active_rooms, 0);
}
