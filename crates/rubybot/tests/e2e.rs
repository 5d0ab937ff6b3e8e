// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: raw Telegram webhook JSON through the gateway router,
//! update conversion, and the dispatcher, into mock collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use rubybot_core::UserStore;
use rubybot_core::types::{ConversationState, TextFormat};
use rubybot_engine::{
    AdminAllowlist, Dispatcher, GenerationSettings, ResponseGenerator, Stores, counters, templates,
};
use rubybot_gateway::router;
use rubybot_telegram::TelegramWebhook;
use rubybot_test_utils::{MemoryStore, MockCompletion, MockTransport};
use serde_json::json;
use tower::ServiceExt;

const USER: i64 = 4242;
const ADMIN: i64 = 1;

struct Bot {
    app: Router,
    store: Arc<MemoryStore>,
    transport: Arc<MockTransport>,
    completion: Arc<MockCompletion>,
    next_update: AtomicU32,
}

impl Bot {
    fn new(completion: MockCompletion) -> Self {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(MockTransport::new());
        let completion = Arc::new(completion);

        let dispatcher = Dispatcher::new(
            Stores::from_single(store.clone()),
            transport.clone(),
            ResponseGenerator::new(completion.clone(), GenerationSettings::default()),
            Arc::new(AdminAllowlist::from_ids([ADMIN])),
        );
        let app = router(Arc::new(TelegramWebhook::new(Arc::new(dispatcher))), None);

        Self {
            app,
            store,
            transport,
            completion,
            next_update: AtomicU32::new(1),
        }
    }

    fn update_id(&self) -> u32 {
        self.next_update.fetch_add(1, Ordering::SeqCst)
    }

    async fn post(&self, body: String) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send_text(&self, from: i64, text: &str) -> (StatusCode, String) {
        let update = json!({
            "update_id": self.update_id(),
            "message": {
                "message_id": 100 + self.transport.sent_count().await,
                "date": 1700000000,
                "chat": {"id": from, "type": "private", "first_name": "Grace"},
                "from": {
                    "id": from,
                    "is_bot": false,
                    "first_name": "Grace",
                    "username": "grace"
                },
                "text": text,
            }
        });
        self.post(update.to_string()).await
    }

    async fn press(&self, from: i64, data: &str, message_id: i32) -> (StatusCode, String) {
        let update = json!({
            "update_id": self.update_id(),
            "callback_query": {
                "id": format!("cbq-{message_id}"),
                "from": {"id": from, "is_bot": false, "first_name": "Grace"},
                "chat_instance": "42",
                "data": data,
                "message": {
                    "message_id": message_id,
                    "date": 1700000000,
                    "chat": {"id": from, "type": "private", "first_name": "Grace"},
                    "from": {"id": 999, "is_bot": true, "first_name": "Ruby"},
                    "text": "pitch",
                }
            }
        });
        self.post(update.to_string()).await
    }
}

#[tokio::test]
async fn start_then_three_messages_reaches_call_to_action() {
    let bot = Bot::new(MockCompletion::with_replies(vec![
        "Nice to meet you!".into(),
        "That sounds great.".into(),
        "You'd love it here.".into(),
    ]));

    let (status, body) = bot.send_text(USER, "/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    assert_eq!(
        bot.transport.last_sent_to(USER).await.unwrap().text,
        templates::WELCOME
    );

    bot.send_text(USER, "I build bots").await;
    bot.send_text(USER, "Mostly in Rust").await;
    bot.send_text(USER, "What is TopV1?").await;

    let sent = bot.transport.sent_to(USER).await;
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[1].text, "Nice to meet you!");
    assert!(sent[1].options.menu.is_none());
    assert_eq!(sent[2].text, "That sounds great.");
    assert!(sent[2].options.menu.is_none());
    assert!(sent[3].text.starts_with("You'd love it here."));
    let ids: Vec<&str> = sent[3]
        .options
        .menu
        .as_ref()
        .unwrap()
        .action_ids()
        .collect();
    assert_eq!(ids, vec!["join_community", "learn_more"]);

    assert_eq!(bot.completion.call_count().await, 3);
    assert_eq!(bot.store.counter(counters::TOTAL_USERS).await, 1);
    assert_eq!(bot.store.counter(counters::CONVERSATIONS_STARTED).await, 1);
}

#[tokio::test]
async fn join_button_via_webhook_converts_user() {
    let bot = Bot::new(MockCompletion::new());
    bot.send_text(USER, "/start").await;
    for _ in 0..3 {
        bot.send_text(USER, "hello").await;
    }
    let cta = bot.transport.last_sent_to(USER).await.unwrap();

    let (status, _) = bot
        .press(USER, "join_community", cta.message.message_id)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        bot.transport.answered().await,
        vec![format!("cbq-{}", cta.message.message_id)]
    );
    let edits = bot.transport.edits().await;
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message, cta.message);
    assert_eq!(edits[0].text, templates::JOIN_TEXT);
    assert_eq!(edits[0].options.format, TextFormat::Markdown);
    assert_eq!(bot.store.counter(counters::COMMUNITY_CONVERSIONS).await, 1);
}

#[tokio::test]
async fn text_before_start_only_prompts() {
    let bot = Bot::new(MockCompletion::new());
    let (status, _) = bot.send_text(USER, "hi there").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        bot.transport.last_sent_to(USER).await.unwrap().text,
        templates::START_PROMPT
    );
    assert_eq!(bot.store.user_count().await, 0);
    assert_eq!(bot.completion.call_count().await, 0);
}

#[tokio::test]
async fn admin_reset_via_webhook() {
    let bot = Bot::new(MockCompletion::new());
    bot.send_text(USER, "/start").await;
    bot.send_text(USER, "one").await;

    let (status, _) = bot.send_text(ADMIN, &format!("/reset {USER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        bot.transport.last_sent_to(ADMIN).await.unwrap().text,
        format!("User {USER} has been reset.")
    );
    assert_eq!(bot.store.user_count().await, 1);
}

#[tokio::test]
async fn reset_user_behaves_like_new_conversation() {
    let bot = Bot::new(MockCompletion::new());
    bot.send_text(USER, "/start").await;
    for _ in 0..3 {
        bot.send_text(USER, "more").await;
    }
    bot.send_text(ADMIN, &format!("/reset {USER}")).await;

    bot.send_text(USER, "back again").await;

    let last = bot.transport.last_sent_to(USER).await.unwrap();
    assert!(last.options.menu.is_none());
    let turns = bot.store.turns_for(USER).await;
    assert_eq!(turns.last().unwrap().content, last.text);
}

#[tokio::test]
async fn non_admin_commands_are_refused() {
    let bot = Bot::new(MockCompletion::new());
    bot.send_text(USER, "/broadcast hello everyone").await;

    assert_eq!(
        bot.transport.last_sent_to(USER).await.unwrap().text,
        templates::ADMIN_ONLY
    );
}

#[tokio::test]
async fn malformed_payload_is_internal_error() {
    let bot = Bot::new(MockCompletion::new());

    let (status, body) = bot.post("{\"update_id\":".to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");

    let (status, _) = bot.post(json!({"no": "update"}).to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(bot.transport.sent_count().await, 0);
}

#[tokio::test]
async fn unsupported_updates_are_acknowledged() {
    let bot = Bot::new(MockCompletion::new());
    let update = json!({
        "update_id": 77,
        "edited_message": {
            "message_id": 5,
            "date": 1700000000,
            "edit_date": 1700000100,
            "chat": {"id": USER, "type": "private", "first_name": "Grace"},
            "from": {"id": USER, "is_bot": false, "first_name": "Grace"},
            "text": "edited",
        }
    });

    let (status, body) = bot.post(update.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    assert_eq!(bot.transport.sent_count().await, 0);
}

#[tokio::test]
async fn transport_failure_surfaces_as_internal_error() {
    let bot = Bot::new(MockCompletion::new());
    bot.transport.set_failing(true);

    let (status, _) = bot.send_text(USER, "/start").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn reset_state_is_initial() {
    let bot = Bot::new(MockCompletion::new());
    bot.send_text(USER, "/start").await;
    bot.send_text(ADMIN, &format!("/reset {USER}")).await;

    let snapshot = bot.store.get_user(USER).await.unwrap().unwrap();
    assert_eq!(snapshot.conversation_state, ConversationState::Initial);
    assert_eq!(snapshot.exchange_count, 0);
}
