use chatwire_protocol::ProtocolError;

/// Errors that can occur while operating the chat client.
///
/// These never cross the public API directly — the client converts each
/// failure into a `false` return value and records the description as the
/// last-error string, retrievable via
/// [`ChatClient::last_error`](crate::ChatClient::last_error).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A connection to the server could not be established.
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    /// Reading or writing on an established connection failed.
    #[error("i/o failure: {0}")]
    Io(#[source] std::io::Error),

    /// An action was attempted while no connection exists.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called while a connection is already open.
    #[error("already connected")]
    AlreadyConnected,

    /// Caller input or a server line violated the wire format.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
