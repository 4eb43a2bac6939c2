//! Outgoing protocol commands and slash-directive parsing.

use crate::ProtocolError;

/// A single outgoing protocol command.
///
/// Each variant maps to exactly one wire line; [`Command::to_line`] produces
/// it without the trailing newline (the transport appends the terminator
/// when writing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `msg <text>` — public message to everyone on the server.
    PublicMessage(String),

    /// `privmsg <recipient> <text>` — message to a single user.
    PrivateMessage {
        /// Username of the recipient.
        recipient: String,
        /// Message text.
        text: String,
    },

    /// `login <username>` — claim a username on the server.
    Login(String),

    /// `users` — request the current user list.
    Users,

    /// `help` — request the list of commands the server supports.
    Help,
}

impl Command {
    /// Encodes the command as one wire line, without the trailing newline.
    pub fn to_line(&self) -> String {
        match self {
            Command::PublicMessage(text) => format!("msg {text}"),
            Command::PrivateMessage { recipient, text } => {
                format!("privmsg {recipient} {text}")
            }
            Command::Login(username) => format!("login {username}"),
            Command::Users => "users".to_string(),
            Command::Help => "help".to_string(),
        }
    }

    /// Interprets raw caller input as a command.
    ///
    /// Bare text becomes an implicit public message. Slash-prefixed input
    /// names a directive; exactly four are recognised: `login`, `privmsg`,
    /// `users`, `help`. An unknown directive is rejected rather than sent
    /// as literal text, so a typo like `/logni bob` never leaks onto the
    /// wire as a chat message. `users` and `help` take no arguments and
    /// ignore any trailing text.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownDirective`] for an unrecognised directive
    /// word, [`ProtocolError::IncompleteDirective`] when a recognised
    /// directive is missing a required argument.
    pub fn from_input(input: &str) -> Result<Self, ProtocolError> {
        let Some(directive) = input.strip_prefix('/') else {
            return Ok(Command::PublicMessage(input.to_string()));
        };

        let (word, rest) = match directive.split_once(' ') {
            Some((word, rest)) => (word, Some(rest)),
            None => (directive, None),
        };

        match word {
            "login" => match rest {
                Some(username) if !username.is_empty() => {
                    Ok(Command::Login(username.to_string()))
                }
                _ => Err(ProtocolError::IncompleteDirective {
                    word: "login",
                    reason: "expected a username",
                }),
            },
            "privmsg" => {
                let Some((recipient, text)) =
                    rest.and_then(|r| r.split_once(' '))
                else {
                    return Err(ProtocolError::IncompleteDirective {
                        word: "privmsg",
                        reason: "expected a recipient and a message",
                    });
                };
                if recipient.is_empty() {
                    return Err(ProtocolError::IncompleteDirective {
                        word: "privmsg",
                        reason: "expected a recipient",
                    });
                }
                Ok(Command::PrivateMessage {
                    recipient: recipient.to_string(),
                    text: text.to_string(),
                })
            }
            "users" => Ok(Command::Users),
            "help" => Ok(Command::Help),
            other => Err(ProtocolError::UnknownDirective(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Encoding — exact wire lines
    // =====================================================================

    #[test]
    fn test_public_message_encodes_msg_line() {
        let cmd = Command::PublicMessage("hello".into());
        assert_eq!(cmd.to_line(), "msg hello");
    }

    #[test]
    fn test_private_message_encodes_privmsg_line() {
        let cmd = Command::PrivateMessage {
            recipient: "bob".into(),
            text: "hi there".into(),
        };
        assert_eq!(cmd.to_line(), "privmsg bob hi there");
    }

    #[test]
    fn test_login_encodes_login_line() {
        assert_eq!(Command::Login("alice".into()).to_line(), "login alice");
    }

    #[test]
    fn test_users_and_help_are_bare_tags() {
        assert_eq!(Command::Users.to_line(), "users");
        assert_eq!(Command::Help.to_line(), "help");
    }

    #[test]
    fn test_message_text_is_not_retokenized() {
        // Internal spacing and tag-like words travel verbatim.
        let cmd = Command::PublicMessage("msg  with   gaps".into());
        assert_eq!(cmd.to_line(), "msg msg  with   gaps");
    }

    // =====================================================================
    // Directive parsing
    // =====================================================================

    #[test]
    fn test_bare_text_is_public_message() {
        let cmd = Command::from_input("hello world").unwrap();
        assert_eq!(cmd, Command::PublicMessage("hello world".into()));
    }

    #[test]
    fn test_login_directive() {
        let cmd = Command::from_input("/login alice").unwrap();
        assert_eq!(cmd, Command::Login("alice".into()));
    }

    #[test]
    fn test_privmsg_directive() {
        let cmd = Command::from_input("/privmsg bob hi there").unwrap();
        assert_eq!(
            cmd,
            Command::PrivateMessage {
                recipient: "bob".into(),
                text: "hi there".into(),
            }
        );
    }

    #[test]
    fn test_users_and_help_directives() {
        assert_eq!(Command::from_input("/users").unwrap(), Command::Users);
        assert_eq!(Command::from_input("/help").unwrap(), Command::Help);
    }

    #[test]
    fn test_users_directive_ignores_trailing_text() {
        assert_eq!(
            Command::from_input("/users please").unwrap(),
            Command::Users
        );
    }

    #[test]
    fn test_unknown_directive_is_rejected() {
        let err = Command::from_input("/frobnicate now").unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownDirective(ref w) if w == "frobnicate"));
        assert!(err.to_string().contains("/frobnicate"));
    }

    #[test]
    fn test_login_without_username_is_incomplete() {
        let err = Command::from_input("/login").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::IncompleteDirective { word: "login", .. }
        ));
    }

    #[test]
    fn test_privmsg_without_text_is_incomplete() {
        let err = Command::from_input("/privmsg bob").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::IncompleteDirective { word: "privmsg", .. }
        ));
    }

    #[test]
    fn test_slash_mid_text_is_still_a_message() {
        // Only a *leading* slash starts a directive.
        let cmd = Command::from_input("look at /this path").unwrap();
        assert_eq!(
            cmd,
            Command::PublicMessage("look at /this path".into())
        );
    }
}
