//! Inbound server lines decoded into typed events.
//!
//! Decoding is strictly positional: the tag is the first space-delimited
//! token, and each tag has a fixed field count. Payload text is everything
//! after the last expected separator, carried verbatim — splitting never
//! searches for substrings, so a sender named `msg` or text containing the
//! tag word cannot corrupt the result.

use crate::ProtocolError;

/// A chat message received from the server, public or private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    /// Username of the sender.
    pub sender: String,
    /// True for a private message (`privmsg`), false for a public one.
    pub private: bool,
    /// Message text, verbatim — internal spacing is preserved.
    pub text: String,
}

/// One decoded server line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Outcome of a `login` attempt. `detail` is the whole server line.
    LoginResult {
        /// True for `loginok`, false for `loginerr`.
        success: bool,
        /// The raw server line, kept for display.
        detail: String,
    },

    /// The list of currently connected usernames.
    UserList(Vec<String>),

    /// A public or private chat message.
    Message(TextMessage),

    /// Our last message was not delivered.
    MessageError(String),

    /// The server did not understand our last command.
    CommandError(String),

    /// The list of commands the server supports.
    SupportedCommands(Vec<String>),
}

impl ServerEvent {
    /// Classifies one wire line by its first space-delimited token.
    ///
    /// Returns `Ok(None)` for tags this client does not understand —
    /// unknown traffic is ignored, not an error.
    ///
    /// # Errors
    /// [`ProtocolError::MalformedLine`] when a recognised tag carries a
    /// payload that cannot be parsed into its expected shape (e.g. a
    /// `msg` line with no sender).
    pub fn parse(line: &str) -> Result<Option<Self>, ProtocolError> {
        let (tag, rest) = match line.split_once(' ') {
            Some((tag, rest)) => (tag, Some(rest)),
            None => (line, None),
        };

        let event = match tag {
            "loginok" => ServerEvent::LoginResult {
                success: true,
                detail: line.to_string(),
            },
            "loginerr" => ServerEvent::LoginResult {
                success: false,
                detail: line.to_string(),
            },
            "users" => ServerEvent::UserList(split_names(rest)),
            "supported" => ServerEvent::SupportedCommands(split_names(rest)),
            "msg" => ServerEvent::Message(parse_message(false, rest)?),
            "privmsg" => ServerEvent::Message(parse_message(true, rest)?),
            "msgerr" => {
                ServerEvent::MessageError(rest.unwrap_or("").to_string())
            }
            "cmderr" => {
                ServerEvent::CommandError(rest.unwrap_or("").to_string())
            }
            _ => return Ok(None),
        };

        Ok(Some(event))
    }
}

/// Splits a name-list payload on single spaces. A bare tag is an empty list.
fn split_names(rest: Option<&str>) -> Vec<String> {
    match rest {
        Some(rest) if !rest.is_empty() => {
            rest.split(' ').map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}

/// Parses a `msg`/`privmsg` payload: the first token is the sender and
/// everything after the single separating space is the text.
fn parse_message(
    private: bool,
    rest: Option<&str>,
) -> Result<TextMessage, ProtocolError> {
    let tag = if private { "privmsg" } else { "msg" };

    let Some(rest) = rest else {
        return Err(ProtocolError::MalformedLine {
            tag,
            reason: "missing sender",
        });
    };

    // A message may legitimately have empty text (`msg alice`), but a
    // missing or empty sender has no meaning.
    let (sender, text) = match rest.split_once(' ') {
        Some((sender, text)) => (sender, text),
        None => (rest, ""),
    };
    if sender.is_empty() {
        return Err(ProtocolError::MalformedLine {
            tag,
            reason: "empty sender",
        });
    }

    Ok(TextMessage {
        sender: sender.to_string(),
        private,
        text: text.to_string(),
    })
}
