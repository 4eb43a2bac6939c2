//! Wire format for the chat protocol Chatwire speaks.
//!
//! The protocol is newline-delimited UTF-8 text over a TCP stream: one
//! command or event per line, fields separated by a single space, and the
//! first token of every line is the **tag** naming its kind. There is no
//! escaping — everything after the expected field count is payload text and
//! is never re-tokenized, so message text may itself contain spaces or tag
//! words.
//!
//! ```text
//! client → server   msg <text>
//!                   privmsg <recipient> <text>
//!                   login <username>
//!                   users
//!                   help
//!
//! server → client   loginok / loginerr        (login outcome)
//!                   users <name> <name> ...   (user list)
//!                   msg <sender> <text>       (public message)
//!                   privmsg <sender> <text>   (private message)
//!                   msgerr / cmderr <detail>  (errors)
//!                   supported <cmd> ...       (supported commands)
//! ```
//!
//! This crate only knows how to turn caller actions into lines
//! ([`Command`]) and server lines into typed events ([`ServerEvent`]).
//! Connections, the read loop, and listener dispatch live in the `chatwire`
//! client crate.

mod command;
mod error;
mod event;

pub use command::Command;
pub use error::ProtocolError;
pub use event::{ServerEvent, TextMessage};
