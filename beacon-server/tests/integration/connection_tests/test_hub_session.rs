use beacon_core::{ClientEvent, ServerEvent};
use beacon_server::{ConnectionRegistry, RelayConfig, RoomStats, spawn_hub};
use serde_json::json;
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::TestPeer;

#[tokio::test]
async fn test_hub_applies_commands_in_order() {
    init_tracing();

    let config = RelayConfig::default();
    let registry = ConnectionRegistry::new();
    let hub = spawn_hub(&config, Arc::new(registry.clone()));

    let mut x = TestPeer::connect(&registry);
    let mut y = TestPeer::connect(&registry);

    hub.client_event(
        x.id,
        ClientEvent::CreateRoom {
            label: "a@x.com".into(),
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        x.next_event().await.unwrap(),
        ServerEvent::UserJoined { id, .. } if id == x.id
    ));
    let ServerEvent::RoomJoined { room, .. } = x.next_event().await.unwrap() else {
        panic!("expected room:joined");
    };

    hub.client_event(
        y.id,
        ClientEvent::JoinRoom {
            label: "b@x.com".into(),
            room: room.clone(),
        },
    )
    .await
    .unwrap();
    assert!(matches!(
        y.next_event().await.unwrap(),
        ServerEvent::UserJoined { id, .. } if id == y.id
    ));
    assert!(matches!(
        y.next_event().await.unwrap(),
        ServerEvent::RoomJoined { .. }
    ));
    assert!(matches!(
        x.next_event().await.unwrap(),
        ServerEvent::UserJoined { id, .. } if id == y.id
    ));

    // Per-connection FIFO
    hub.client_event(
        x.id,
        ClientEvent::CallOffer {
            to: y.id,
            offer: json!("offer-sdp"),
        },
    )
    .await
    .unwrap();
    hub.client_event(x.id, ClientEvent::CallInitiated { to: y.id })
        .await
        .unwrap();

    assert_eq!(
        y.next_event().await.unwrap(),
        ServerEvent::IncomingCall {
            from: x.id,
            offer: json!("offer-sdp")
        }
    );
    assert_eq!(
        y.next_event().await.unwrap(),
        ServerEvent::CallInitiated { from: x.id }
    );

    assert_eq!(
        hub.stats().await.unwrap(),
        RoomStats {
            active_rooms: 1,
            members: 2,
            labels: 2
        }
    );

    // Y drops off, X hears about it
    registry.on_disconnect(&y.id);
    hub.disconnect(y.id).await.unwrap();
    assert_eq!(
        x.next_event().await.unwrap(),
        ServerEvent::UserLeft {
            label: Some("b@x.com".into()),
            id: y.id
        }
    );

    hub.client_event(
        x.id,
        ClientEvent::CallEnd {
            to: None,
            room: Some(room),
        },
    )
    .await
    .unwrap();

    assert_eq!(hub.stats().await.unwrap(), RoomStats::default());
    x.assert_silent().await;
}
