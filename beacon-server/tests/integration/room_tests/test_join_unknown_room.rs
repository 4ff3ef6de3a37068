use beacon_core::{RoomToken, ServerEvent};
use beacon_server::{RelayConfig, RelayError};

use crate::integration::{create_test_manager, init_tracing};

#[tokio::test]
async fn test_join_never_created_room_fails() {
    init_tracing();

    let (mut manager, output) = create_test_manager(RelayConfig::default());
    let x = output.connect().await;
    let z = output.connect().await;
    let existing = manager.create_room(x, "a@x.com".into()).await.unwrap();
    output.clear().await;
    let before = manager.stats();

    let token = RoomToken::from("nope1");
    let res = manager.join_room(z, "z@x.com".into(), token.clone()).await;

    assert_eq!(res, Err(RelayError::RoomNotFound(token.clone())));
    assert_eq!(
        output.events_for(&z).await,
        vec![ServerEvent::RoomJoinError {
            error: "Room does not exist".into()
        }]
    );
    assert!(output.events_for(&x).await.is_empty(), "no broadcast expected");
    assert_eq!(manager.stats(), before);
    assert!(!manager.is_active(&token));
    assert_eq!(manager.member_count(&existing), 1);
    assert_eq!(manager.label_of(&z), None);
}

#[tokio::test]
async fn test_join_retired_room_fails() {
    init_tracing();

    let (mut manager, output) = create_test_manager(RelayConfig::default());
    let x = output.connect().await;
    let y = output.connect().await;
    let token = manager.create_room(x, "a@x.com".into()).await.unwrap();
    manager.end_call(x, None, Some(token.clone())).await;
    output.clear().await;

    let res = manager.join_room(y, "b@x.com".into(), token.clone()).await;

    assert_eq!(res, Err(RelayError::RoomNotFound(token.clone())));
    assert_eq!(
        output.events_for(&y).await,
        vec![ServerEvent::RoomJoinError {
            error: "Room does not exist".into()
        }]
    );
    assert!(!manager.is_active(&token));
}
