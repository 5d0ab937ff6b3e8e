// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline-button routing.
//!
//! Button identifiers are resolved through a fixed lookup table into a
//! [`CallbackAction`], and each action renders to one [`CallbackView`]. The
//! view never depends on the user's history, so repeated clicks produce the
//! same message.

use rubybot_core::types::{InlineMenu, TextFormat};

use crate::templates;

/// A recognized inline-button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    JoinCommunity,
    LearnMore,
    GetUpdates,
}

const ACTIONS: [(&str, CallbackAction); 3] = [
    ("join_community", CallbackAction::JoinCommunity),
    ("learn_more", CallbackAction::LearnMore),
    ("get_updates", CallbackAction::GetUpdates),
];

impl CallbackAction {
    /// The identifier carried in the button's callback data.
    pub fn id(self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, action)| *action == self)
            .map(|(id, _)| *id)
            .unwrap_or_default()
    }

    /// The message the triggering button's message is edited into.
    pub fn view(self) -> CallbackView {
        match self {
            CallbackAction::JoinCommunity => CallbackView::markdown(templates::JOIN_TEXT, None),
            CallbackAction::LearnMore => CallbackView::markdown(
                templates::LEARN_MORE_TEXT,
                Some(templates::learn_more_menu()),
            ),
            CallbackAction::GetUpdates => CallbackView::markdown(templates::UPDATES_TEXT, None),
        }
    }
}

/// Result of resolving raw callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackRoute {
    Known(CallbackAction),
    /// Data no button of ours carries. Acknowledged and otherwise ignored.
    Unrecognized(String),
}

impl CallbackRoute {
    pub fn resolve(data: &str) -> Self {
        ACTIONS
            .iter()
            .find(|(id, _)| *id == data)
            .map(|(_, action)| CallbackRoute::Known(*action))
            .unwrap_or_else(|| CallbackRoute::Unrecognized(data.to_string()))
    }
}

/// Rendered content for an edited message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackView {
    pub text: &'static str,
    pub format: TextFormat,
    pub menu: Option<InlineMenu>,
}

impl CallbackView {
    fn markdown(text: &'static str, menu: Option<InlineMenu>) -> Self {
        Self {
            text,
            format: TextFormat::Markdown,
            menu,
        }
    }
}
