/// Errors that can occur in the wire-format layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The caller typed a slash directive this protocol does not know.
    #[error("unknown directive: /{0}")]
    UnknownDirective(String),

    /// A recognised directive was missing a required argument.
    #[error("incomplete directive /{word}: {reason}")]
    IncompleteDirective {
        /// The directive word, without the leading slash.
        word: &'static str,
        /// What was missing.
        reason: &'static str,
    },

    /// A server line carried a recognised tag but its payload could not
    /// be parsed into the expected shape.
    #[error("malformed `{tag}` line: {reason}")]
    MalformedLine {
        /// The tag of the offending line.
        tag: &'static str,
        /// Why the payload was rejected.
        reason: &'static str,
    },
}
