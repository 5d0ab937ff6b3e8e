// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for rubybot integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without Telegram or OpenAI.
//!
//! # Components
//!
//! - [`MockCompletion`] - Mock completion service with scripted replies and failures
//! - [`MockTransport`] - Mock transport capturing replies, edits, and callback answers
//! - [`MemoryStore`] - In-memory stores with failure injection
//! - [`TestHarness`] - A full dispatcher over temp SQLite and the mocks

pub mod harness;
pub mod memory_store;
pub mod mock_channel;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use mock_channel::{EditedMessage, MockTransport, SentMessage};
pub use mock_provider::{DEFAULT_REPLY, MockCompletion, MockReply};
