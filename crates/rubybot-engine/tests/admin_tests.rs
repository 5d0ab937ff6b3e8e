// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin command tests: authorization, `/stats`, `/reset`, `/broadcast`.

use std::sync::Arc;

use rubybot_core::types::{ConversationState, TextFormat};
use rubybot_engine::{Stores, templates};
use rubybot_test_utils::{MemoryStore, TestHarness};

const ADMIN: i64 = 1000;

async fn admin_harness() -> TestHarness {
    TestHarness::builder()
        .with_admins(vec![ADMIN])
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn non_admin_is_refused_without_side_effects() {
    let harness = admin_harness().await;
    harness.start(1).await.unwrap();
    harness.start(2).await.unwrap();
    harness.transport.clear().await;

    for (name, args) in [("stats", ""), ("reset", "2"), ("broadcast", "hi")] {
        harness.command(1, name, args).await.unwrap();
        assert_eq!(
            harness.last_reply(1).await.as_deref(),
            Some(templates::ADMIN_ONLY)
        );
    }

    assert_eq!(harness.transport.sent_count().await, 3);
    assert_eq!(harness.user(2).await.unwrap().exchange_count, 1);
    assert!(harness.storage.admin_actions(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_commands_are_ignored() {
    let harness = admin_harness().await;
    harness.command(ADMIN, "help", "").await.unwrap();
    harness.command(5, "settings", "x").await.unwrap();
    assert_eq!(harness.transport.sent_count().await, 0);
}

#[tokio::test]
async fn stats_reports_counters_in_markdown() {
    let harness = admin_harness().await;
    harness.start(1).await.unwrap();
    harness.start(2).await.unwrap();
    harness.say(1, "hi").await.unwrap();
    for _ in 0..2 {
        harness.say(1, "more").await.unwrap();
    }
    harness.click(1, "join_community").await.unwrap();

    harness.command(ADMIN, "stats", "").await.unwrap();

    let reply = harness.transport.last_sent_to(ADMIN).await.unwrap();
    assert_eq!(reply.options.format, TextFormat::Markdown);
    assert!(reply.text.starts_with("📊 **Ruby Bot Statistics**\n\n"));
    assert!(reply.text.contains("👥 Total Users: 2\n"));
    assert!(reply.text.contains("💬 Conversations Started: 2\n"));
    assert!(reply.text.contains("🌟 Community Conversions: 1\n"));
    assert!(reply.text.contains("🔥 Active Users (24h): 2\n"));
    assert!(!reply.text.contains("⚡ Bot Deployed: Unknown"));

    let actions = harness.storage.admin_actions(1).await.unwrap();
    assert_eq!(actions[0].action, "stats_requested");
    assert_eq!(actions[0].admin_id, ADMIN);
}

#[tokio::test]
async fn stats_read_failure_replies_with_error() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::builder()
        .with_admins(vec![ADMIN])
        .with_stores(Stores::from_single(store.clone()))
        .build()
        .await
        .unwrap();
    store.set_fail_reads(true);

    harness.command(ADMIN, "stats", "").await.unwrap();
    assert_eq!(
        harness.last_reply(ADMIN).await.as_deref(),
        Some(templates::STATS_ERROR)
    );
    assert!(store.actions().await.is_empty());
}

#[tokio::test]
async fn reset_returns_user_to_initial() {
    let harness = admin_harness().await;
    harness.start(42).await.unwrap();
    harness.say(42, "a").await.unwrap();
    harness.say(42, "b").await.unwrap();

    harness.command(ADMIN, "reset", "42").await.unwrap();

    assert_eq!(
        harness.last_reply(ADMIN).await.as_deref(),
        Some("User 42 has been reset.")
    );
    let user = harness.user(42).await.unwrap();
    assert_eq!(user.exchange_count, 0);
    assert_eq!(user.conversation_state, ConversationState::Initial);

    let actions = harness.storage.admin_actions(1).await.unwrap();
    assert_eq!(actions[0].action, "user_reset");
    assert_eq!(actions[0].target_user_id, Some(42));
}

#[tokio::test]
async fn reset_without_valid_id_shows_usage() {
    let harness = admin_harness().await;
    for args in ["", "abc", "0"] {
        harness.command(ADMIN, "reset", args).await.unwrap();
        assert_eq!(
            harness.last_reply(ADMIN).await.as_deref(),
            Some(templates::RESET_USAGE)
        );
    }
    assert!(harness.storage.admin_actions(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_of_unknown_user_still_confirms() {
    let harness = admin_harness().await;
    harness.command(ADMIN, "reset", "999").await.unwrap();
    assert_eq!(
        harness.last_reply(ADMIN).await.as_deref(),
        Some("User 999 has been reset.")
    );
    assert!(harness.user(999).await.is_none());
}

#[tokio::test]
async fn broadcast_reaches_every_user_and_tallies_failures() {
    let harness = admin_harness().await;
    for id in [1, 2, 3] {
        harness.start(id).await.unwrap();
    }
    harness.transport.fail_chat(2).await;

    harness
        .command(ADMIN, "broadcast", "Launch day!\nSee you there.")
        .await
        .unwrap();

    let to_admin = harness.transport.sent_to(ADMIN).await;
    assert_eq!(to_admin[0].text, "Starting broadcast to 3 users...");
    assert_eq!(
        to_admin[1].text,
        "Broadcast completed!\n✅ Sent: 2\n❌ Failed: 1"
    );

    let delivered = harness.transport.last_sent_to(3).await.unwrap();
    assert_eq!(
        delivered.text,
        "📢 **Message from TopV1 Team:**\n\nLaunch day!\nSee you there."
    );
    assert_eq!(delivered.options.format, TextFormat::Markdown);
    assert_eq!(harness.transport.sent_to(2).await.len(), 1);

    let actions = harness.storage.admin_actions(1).await.unwrap();
    assert_eq!(actions[0].action, "broadcast_sent");
    assert_eq!(
        actions[0].details.as_deref(),
        Some("Message: \"Launch day!\nSee you there.\", Success: 2, Errors: 1")
    );
}

#[tokio::test]
async fn broadcast_without_message_shows_usage() {
    let harness = admin_harness().await;
    harness.start(1).await.unwrap();
    harness.command(ADMIN, "broadcast", "   ").await.unwrap();

    assert_eq!(
        harness.last_reply(ADMIN).await.as_deref(),
        Some(templates::BROADCAST_USAGE)
    );
    assert_eq!(harness.transport.sent_to(1).await.len(), 1);
}

#[tokio::test]
async fn broadcast_with_unreadable_user_list_sends_nothing() {
    let store = Arc::new(MemoryStore::new());
    let harness = TestHarness::builder()
        .with_admins(vec![ADMIN])
        .with_stores(Stores::from_single(store.clone()))
        .build()
        .await
        .unwrap();
    harness.start(1).await.unwrap();
    store.set_fail_reads(true);

    harness.command(ADMIN, "broadcast", "hello").await.unwrap();

    let to_admin = harness.transport.sent_to(ADMIN).await;
    assert_eq!(to_admin[0].text, "Starting broadcast to 0 users...");
    assert_eq!(to_admin[1].text, "Broadcast completed!\n✅ Sent: 0\n❌ Failed: 0");
}
