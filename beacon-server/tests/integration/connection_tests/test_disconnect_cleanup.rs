use beacon_core::ServerEvent;
use beacon_server::{RelayConfig, RoomStats};

use crate::integration::{create_test_manager, init_tracing};

#[tokio::test]
async fn test_disconnect_unwinds_membership_and_directory() {
    init_tracing();

    let (mut manager, output) = create_test_manager(RelayConfig::default());
    let x = output.connect().await;
    let y = output.connect().await;
    let token = manager.create_room(x, "a@x.com".into()).await.unwrap();
    manager
        .join_room(y, "b@x.com".into(), token.clone())
        .await
        .unwrap();
    output.clear().await;

    // Y vanishes without call:end
    output.disconnect(&y).await;
    let retired = manager.on_disconnect(y).await;

    assert!(retired.is_empty());
    assert_eq!(
        output.events_for(&x).await,
        vec![ServerEvent::UserLeft {
            label: Some("b@x.com".into()),
            id: y
        }]
    );
    assert_eq!(manager.members(&token), vec![x]);
    assert_eq!(manager.label_of(&y), None);
    assert_eq!(manager.connection_of("b@x.com"), None);

    // Last member gone: room retires
    output.disconnect(&x).await;
    let retired = manager.on_disconnect(x).await;

    assert_eq!(retired, vec![token.clone()]);
    assert!(!manager.is_active(&token));
    assert_eq!(manager.stats(), RoomStats::default());
}

#[tokio::test]
async fn test_disconnect_of_roomless_connection_is_harmless() {
    init_tracing();

    let (mut manager, output) = create_test_manager(RelayConfig::default());
    let x = output.connect().await;
    let token = manager.create_room(x, "a@x.com".into()).await.unwrap();
    let stranger = output.connect().await;
    output.clear().await;

    let retired = manager.on_disconnect(stranger).await;

    assert!(retired.is_empty());
    assert!(output.all().await.is_empty());
    assert!(manager.is_active(&token));
}
