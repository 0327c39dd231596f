//! End-to-end navigation through the dispatcher with a recording sink.

#![allow(clippy::unwrap_used)]

use routemap::assets::AssetResolver;
use routemap::catalog::Catalog;
use routemap::dispatcher::{Dispatcher, Inbound, MessageSink};
use routemap::error::{BotError, Result};
use routemap::event::Event;
use routemap::navigation::Navigator;
use routemap::presentation::{
    CONTROLS_CAPTION, Delivery, FAILURE_NOTICE, Outbound, ROOT_CAPTION, Renderer,
};
use routemap::session::{InMemorySessionStore, NavState, SessionId, SessionStore};
use routemap::telegram::Update;
use serde_json::json;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

const CHAT: i64 = 555;

#[derive(Debug, Clone, PartialEq)]
struct Sent {
    chat_id: i64,
    origin: Option<i64>,
    message: Outbound,
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<Sent>>,
    acknowledged: Mutex<Vec<String>>,
    fail_photos: bool,
    fail_edits: bool,
}

impl RecordingSink {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|s| match s.message {
                Outbound::Text { text, .. } => text,
                Outbound::Photo { caption, .. } => caption,
            })
            .collect()
    }
}

impl MessageSink for RecordingSink {
    async fn send(&self, chat_id: i64, origin: Option<i64>, message: &Outbound) -> Result<()> {
        let failing = match message {
            Outbound::Photo { .. } => self.fail_photos,
            Outbound::Text {
                delivery: Delivery::EditOrigin,
                ..
            } => self.fail_edits,
            Outbound::Text { .. } => false,
        };
        if failing {
            return Err(BotError::Api {
                code: Some(400),
                description: "Bad Request".to_string(),
            });
        }

        self.sent.lock().unwrap().push(Sent {
            chat_id,
            origin,
            message: message.clone(),
        });
        Ok(())
    }

    async fn acknowledge(&self, callback_query_id: &str) -> Result<()> {
        self.acknowledged
            .lock()
            .unwrap()
            .push(callback_query_id.to_string());
        Ok(())
    }
}

fn dispatcher(photos: &TempDir) -> Dispatcher<'static, InMemorySessionStore> {
    let navigator = Navigator::new(
        Catalog::builtin(),
        AssetResolver::new(photos.path()),
        Renderer::new(true),
    );
    Dispatcher::new(navigator, InMemorySessionStore::new())
}

fn start_update(update_id: i64) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "message": {
            "message_id": 1,
            "chat": { "id": CHAT },
            "from": { "id": CHAT },
            "text": "/start"
        }
    }))
    .unwrap()
}

fn callback_update(update_id: i64, message_id: i64, data: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb-{update_id}"),
            "from": { "id": CHAT },
            "message": { "message_id": message_id, "chat": { "id": CHAT } },
            "data": data
        }
    }))
    .unwrap()
}

#[test]
fn test_inbound_from_start_command() {
    let inbound = Inbound::from_update(&start_update(1)).unwrap();
    assert_eq!(inbound.event, Event::Start);
    assert_eq!(inbound.session, SessionId(CHAT));
    assert_eq!(inbound.origin, None);
}

#[test]
fn test_inbound_ignores_other_text_and_orphan_callbacks() {
    let chatter: Update = serde_json::from_value(json!({
        "update_id": 1,
        "message": { "message_id": 1, "chat": { "id": CHAT }, "text": "привет" }
    }))
    .unwrap();
    assert!(Inbound::from_update(&chatter).is_none());

    let orphan: Update = serde_json::from_value(json!({
        "update_id": 2,
        "callback_query": { "id": "x", "from": { "id": CHAT }, "data": "route_1201" }
    }))
    .unwrap();
    assert!(Inbound::from_update(&orphan).is_none());
}

#[tokio::test]
async fn test_full_navigation_flow() {
    let photos = tempfile::tempdir().unwrap();
    fs::write(photos.path().join("2201.png"), b"png").unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink::default();

    dispatcher.dispatch(&start_update(1), &sink).await;
    dispatcher
        .dispatch(&callback_update(2, 10, "district_Центр"), &sink)
        .await;
    dispatcher
        .dispatch(&callback_update(3, 10, "route_2201"), &sink)
        .await;

    assert_eq!(
        dispatcher.sessions().get(SessionId(CHAT)).state(),
        NavState::RouteDetail {
            district: "Центр".to_string(),
            route: "2201".to_string()
        }
    );

    let sent = sink.sent();
    assert_eq!(sent.len(), 4);
    assert!(sent.iter().all(|s| s.chat_id == CHAT));

    // Root menu as a new message.
    assert!(matches!(
        &sent[0].message,
        Outbound::Text { text, delivery: Delivery::NewMessage, .. } if text == ROOT_CAPTION
    ));
    // Route list replaces the pressed message.
    assert_eq!(sent[1].origin, Some(10));
    assert!(matches!(
        &sent[1].message,
        Outbound::Text { delivery: Delivery::EditOrigin, .. }
    ));
    // Photo first, controls second.
    assert!(matches!(&sent[2].message, Outbound::Photo { path, .. } if path.ends_with("2201.png")));
    assert!(matches!(
        &sent[3].message,
        Outbound::Text { text, delivery: Delivery::NewMessage, .. } if text == CONTROLS_CAPTION
    ));

    assert_eq!(
        *sink.acknowledged.lock().unwrap(),
        vec!["cb-2".to_string(), "cb-3".to_string()]
    );
}

#[tokio::test]
async fn test_back_to_districts_after_detail() {
    let photos = tempfile::tempdir().unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink::default();

    dispatcher
        .dispatch(&callback_update(1, 10, "district_Ленина"), &sink)
        .await;
    dispatcher
        .dispatch(&callback_update(2, 10, "route_2105"), &sink)
        .await;
    dispatcher
        .dispatch(&callback_update(3, 12, "back_to_districts"), &sink)
        .await;

    assert_eq!(
        dispatcher.sessions().get(SessionId(CHAT)).state(),
        NavState::DistrictList
    );
    let last = sink.sent().pop().unwrap();
    assert_eq!(last.origin, Some(12));
    assert!(matches!(last.message, Outbound::Text { text, .. } if text == ROOT_CAPTION));
}

#[tokio::test]
async fn test_photo_failure_sends_notice_and_skips_controls() {
    let photos = tempfile::tempdir().unwrap();
    fs::write(photos.path().join("1201.jpg"), b"jpg").unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink {
        fail_photos: true,
        ..RecordingSink::default()
    };

    dispatcher
        .dispatch(&callback_update(1, 10, "route_1201"), &sink)
        .await;

    assert_eq!(sink.texts(), vec![FAILURE_NOTICE.to_string()]);
}

#[tokio::test]
async fn test_failed_edit_is_only_logged() {
    let photos = tempfile::tempdir().unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink {
        fail_edits: true,
        ..RecordingSink::default()
    };

    dispatcher
        .dispatch(&callback_update(1, 10, "district_Сельмаш"), &sink)
        .await;

    assert!(sink.sent().is_empty());
    // The state still advanced.
    assert_eq!(
        dispatcher.sessions().get(SessionId(CHAT)).district.as_deref(),
        Some("Сельмаш")
    );
}

#[tokio::test]
async fn test_forged_payload_keeps_session() {
    let photos = tempfile::tempdir().unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink::default();

    dispatcher
        .dispatch(&callback_update(1, 10, "district_Центр"), &sink)
        .await;
    dispatcher
        .dispatch(&callback_update(2, 10, "route_0000"), &sink)
        .await;

    assert_eq!(
        dispatcher.sessions().get(SessionId(CHAT)).state(),
        NavState::RouteList {
            district: "Центр".to_string()
        }
    );
    let texts = sink.texts();
    assert!(texts[1].starts_with("⚠️ Маршрут 0000 не найден"));
    assert!(texts[1].contains("📍 Район: Центр"));
}

#[tokio::test]
async fn test_sessions_do_not_leak_between_users() {
    let photos = tempfile::tempdir().unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink::default();

    dispatcher
        .dispatch(&callback_update(1, 10, "district_Центр"), &sink)
        .await;

    assert_eq!(
        dispatcher.sessions().get(SessionId(CHAT + 1)).state(),
        NavState::DistrictList
    );
    assert_eq!(dispatcher.sessions().len(), 1);
}

#[tokio::test]
async fn test_callback_without_message_is_acknowledged_only() {
    let photos = tempfile::tempdir().unwrap();
    let dispatcher = dispatcher(&photos);
    let sink = RecordingSink::default();

    let inline: Update = serde_json::from_value(json!({
        "update_id": 9,
        "callback_query": {
            "id": "inline-9",
            "from": { "id": CHAT },
            "inline_message_id": "AAA",
            "data": "route_1201"
        }
    }))
    .unwrap();
    dispatcher.dispatch(&inline, &sink).await;

    assert!(sink.sent().is_empty());
    assert_eq!(
        *sink.acknowledged.lock().unwrap(),
        vec!["inline-9".to_string()]
    );
    assert!(dispatcher.sessions().is_empty());
}
