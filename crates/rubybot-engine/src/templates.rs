// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed texts and menus Ruby sends.

use std::collections::BTreeMap;

use rubybot_core::types::{InlineMenu, MenuButton, UserSnapshot};

use crate::callback::CallbackAction;

pub const WELCOME: &str = "Hello there! 👋 I'm Ruby, and I'm absolutely thrilled to meet you!\n\n\
I'm here as a friendly face for the TopV1 community - think of me as your warm welcome into something pretty special we're building together.\n\n\
What brings you our way today? I'd love to hear a bit about what you're interested in! ✨";

pub const START_PROMPT: &str = "Hi! Please use /start to begin our conversation!";

/// Replies used when the completion service fails, indexed by exchange count.
pub const FALLBACK_RESPONSES: [&str; 3] = [
    "That's really interesting! I love learning about what motivates different people. What got you started with that?",
    "Thanks for sharing that with me! It sounds like you have some great insights. What's been the most exciting part for you?",
    "I really appreciate you telling me about that! You know, the TopV1 community has people with all kinds of fascinating backgrounds and interests...",
];

const CTA_PITCH: &str = "You know what? I think you'd really enjoy our TopV1 community! We're building something special - a place where technology feels human-first, and every voice matters.\n\n\
Would you like me to show you around? 🚀";

/// Marker appended to the logged copy of a call-to-action.
pub const CTA_LOG_SUFFIX: &str = " [CTA sent]";

pub const JOIN_TEXT: &str = "🎉 Fantastic! Welcome to TopV1!\n\n\
Here's how to get started:\n\
• Join our main community: [TopV1 Community](https://t.me/topv1community)  \n\
• Follow updates: [TopV1 Announcements](https://t.me/topv1announcements)\n\
• Check out our platform: https://topv1.com\n\n\
I'm excited to see you around! Feel free to mention that Ruby sent you 😊";

pub const LEARN_MORE_TEXT: &str = "TopV1 is where technology meets humanity! 🌟\n\n\
Here's what makes us different:\n\
✨ **Human-First Technology** - We believe tech should feel approachable and respectful\n\
🤝 **Community-Driven** - Every member has a voice in shaping our direction  \n\
🚀 **Innovation Focus** - We're building the next generation of community platforms\n\
🔒 **Safe & Inclusive** - A respectful space for meaningful conversations\n\n\
Ready to dive in?";

pub const UPDATES_TEXT: &str = "Perfect! Here's how to stay in the loop:\n\n\
📢 **TopV1 Announcements**: https://t.me/topv1announcements\n\
🌐 **Website**: https://topv1.com\n\
📧 **Newsletter**: Sign up at topv1.com/newsletter\n\n\
When you're ready to join the conversation, just let me know! I'll be here 😊";

// --- Admin ---

pub const ADMIN_ONLY: &str = "Sorry, this command is only available to admins.";
pub const STATS_ERROR: &str = "Error retrieving stats. Please try again.";
pub const RESET_USAGE: &str = "Usage: /reset [user_id]\nExample: /reset 123456789";
pub const BROADCAST_USAGE: &str = "Usage: /broadcast [message]\nExample: /broadcast Hello everyone!";

/// Generated reply followed by the community pitch.
pub fn call_to_action_text(generated: &str) -> String {
    format!("{generated}\n\n{CTA_PITCH}")
}

/// Two-button menu attached to the call-to-action.
pub fn cta_menu() -> InlineMenu {
    InlineMenu::single_row(vec![
        MenuButton::new("🌟 Yes, show me around!", CallbackAction::JoinCommunity.id()),
        MenuButton::new("💬 Tell me more first", CallbackAction::LearnMore.id()),
    ])
}

/// Menu shown under the feature overview.
pub fn learn_more_menu() -> InlineMenu {
    InlineMenu::single_row(vec![
        MenuButton::new("🚀 Yes, let's do this!", CallbackAction::JoinCommunity.id()),
        MenuButton::new("📧 Get updates first", CallbackAction::GetUpdates.id()),
    ])
}

/// Persona prompt for the completion service, reflecting the user's progress.
pub fn system_prompt(user: &UserSnapshot) -> String {
    let count = user.exchange_count;
    let state = &user.conversation_state;
    let next = u64::from(count) + 1;
    format!(
        "You are Ruby, a warm and engaging AI brand ambassador for TopV1 LLC, a community-driven technology platform. Your personality is:

- Warm, genuine, and approachable
- Curious about people and their interests
- Subtly enthusiastic about technology and community
- Professional but not stuffy - like talking to a friendly colleague
- Focused on making people feel welcomed and heard

Current conversation context:
- User has had {count} exchanges
- Current state: {state}
- This is exchange #{next}

Guidelines:
- Keep responses conversational and natural (2-3 sentences max)
- Ask engaging follow-up questions to learn about the user
- Show genuine interest in their responses
- If this is exchange 3-4, start building toward introducing TopV1 community
- Never be pushy or overly sales-y
- Match their communication style and energy level"
    )
}

/// Markdown statistics block for `/stats`.
pub fn stats_text(counters: &BTreeMap<String, i64>, active_24h: u64) -> String {
    let counter = |name: &str| counters.get(name).copied().unwrap_or(0);
    let deployed = counters
        .get("bot_deployed_at")
        .map(i64::to_string)
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        "📊 **Ruby Bot Statistics**\n\n\
👥 Total Users: {}\n\
💬 Conversations Started: {}\n\
🌟 Community Conversions: {}\n\
🔥 Active Users (24h): {active_24h}\n\
⚡ Bot Deployed: {deployed}\n",
        counter("total_users"),
        counter("conversations_started"),
        counter("community_conversions"),
    )
}

pub fn reset_done(user_id: i64) -> String {
    format!("User {user_id} has been reset.")
}

pub fn broadcast_started(recipients: usize) -> String {
    format!("Starting broadcast to {recipients} users...")
}

pub fn broadcast_message(message: &str) -> String {
    format!("📢 **Message from TopV1 Team:**\n\n{message}")
}

pub fn broadcast_summary(sent: usize, failed: usize) -> String {
    format!("Broadcast completed!\n✅ Sent: {sent}\n❌ Failed: {failed}")
}

/// Audit-log details for a finished broadcast.
pub fn broadcast_details(message: &str, sent: usize, failed: usize) -> String {
    format!("Message: \"{message}\", Success: {sent}, Errors: {failed}")
}
