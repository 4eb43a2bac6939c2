//! # Chatwire
//!
//! A client for a newline-delimited plaintext chat protocol over TCP.
//!
//! [`ChatClient`] owns one connection at a time. Caller actions are encoded
//! into protocol lines and written immediately; a background read task
//! decodes every inbound line into a [`ChatEvent`] and fans it out to
//! registered [`ChatListener`]s in wire arrival order.
//!
//! Failures never cross the public API as errors: every operation reports
//! success as a boolean, and the most recent failure description is
//! retrievable via [`ChatClient::last_error`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chatwire::{ChatClient, ChatEvent, ChatListener};
//!
//! struct Printer;
//!
//! impl ChatListener for Printer {
//!     fn on_event(&self, event: &ChatEvent) {
//!         println!("{event:?}");
//!     }
//! }
//!
//! # async fn run() {
//! let client = ChatClient::new();
//! client.add_listener(Arc::new(Printer));
//! if client.connect("chat.example.com", 1300).await {
//!     client.try_login("alice").await;
//!     client.send_public_message("hello everyone").await;
//! }
//! # }
//! ```

mod client;
mod error;
mod listener;

pub use client::ChatClient;
pub use error::ClientError;
pub use listener::{ChatEvent, ChatListener};

// Wire-format types, re-exported so most consumers only need this crate.
pub use chatwire_protocol::{Command, ProtocolError, ServerEvent, TextMessage};
