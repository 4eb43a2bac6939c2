//! The chat client: connection lifecycle, send operations, and the
//! background read loop.

use std::sync::{Arc, Mutex};

use chatwire_protocol::{Command, ServerEvent};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::task::JoinHandle;

use crate::ClientError;
use crate::listener::{ChatEvent, ChatListener, ListenerSet, lock};

/// State shared between the caller and the background read task.
struct Shared {
    /// The write half of the live connection; `None` means disconnected.
    ///
    /// This slot is the single close guard. Whichever side `take`s the
    /// handle performs the close and emits `Disconnected`; the other side
    /// sees `None` and does nothing, so a user-initiated disconnect and a
    /// read-failure disconnect cannot double-close or double-notify.
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,

    /// Handle of the read-loop task spawned by the latest `connect`.
    reader_task: Mutex<Option<JoinHandle<()>>>,

    listeners: ListenerSet,

    /// Most recent failure description, overwritten on every failure.
    last_error: Mutex<String>,
}

impl Shared {
    fn set_last_error(&self, message: String) {
        *lock(&self.last_error) = message;
    }
}

/// A client for one chat server connection.
///
/// Cheap to clone; clones share the same connection, listener set, and
/// last-error string. All operations report failure as a boolean plus a
/// retrievable last-error string — nothing here panics or returns an error
/// across the public boundary.
#[derive(Clone)]
pub struct ChatClient {
    shared: Arc<Shared>,
}

impl ChatClient {
    /// Creates a disconnected client with no listeners.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                writer: tokio::sync::Mutex::new(None),
                reader_task: Mutex::new(None),
                listeners: ListenerSet::new(),
                last_error: Mutex::new(String::new()),
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Connection lifecycle
    // ---------------------------------------------------------------------

    /// Opens a TCP connection to the chat server and starts the background
    /// read loop.
    ///
    /// Returns `true` on success. On failure the client stays disconnected,
    /// the reason lands in [`last_error`](Self::last_error), and `false` is
    /// returned. Connecting while already connected fails — this client
    /// speaks to one server at a time.
    pub async fn connect(&self, host: &str, port: u16) -> bool {
        match self.try_connect(host, port).await {
            Ok(()) => true,
            Err(error) => {
                self.record_error(&error);
                false
            }
        }
    }

    async fn try_connect(
        &self,
        host: &str,
        port: u16,
    ) -> Result<(), ClientError> {
        let mut slot = self.shared.writer.lock().await;
        if slot.is_some() {
            return Err(ClientError::AlreadyConnected);
        }

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(ClientError::Connect)?;
        let (read_half, write_half) = stream.into_split();
        *slot = Some(write_half);
        drop(slot);

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(read_loop(shared, read_half));
        *lock(&self.shared.reader_task) = Some(handle);

        tracing::info!(host, port, "connected");
        Ok(())
    }

    /// Closes the connection if one is open.
    ///
    /// Idempotent and safe against a concurrent close from the read loop:
    /// exactly one `Disconnected` event is emitted per connection, no
    /// matter which side closes it or how many times this is called.
    pub async fn disconnect(&self) {
        self.abort_reader();
        close_connection(&self.shared).await;
    }

    /// Returns `true` iff a connection handle is currently held.
    pub async fn is_connection_active(&self) -> bool {
        self.shared.writer.lock().await.is_some()
    }

    /// The most recent failure description, or `""` if nothing has failed.
    pub fn last_error(&self) -> String {
        lock(&self.shared.last_error).clone()
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    /// Registers a listener. Adding one that is already registered is a
    /// no-op. The listener receives every event generated from now until
    /// it is removed.
    pub fn add_listener(&self, listener: Arc<dyn ChatListener>) {
        self.shared.listeners.add(listener);
    }

    /// Unregisters a listener. Removing one that is not registered is a
    /// no-op.
    pub fn remove_listener(&self, listener: &Arc<dyn ChatListener>) {
        self.shared.listeners.remove(listener);
    }

    // ---------------------------------------------------------------------
    // Send operations
    // ---------------------------------------------------------------------

    /// Sends a public message (`msg <text>`) to everyone on the server.
    pub async fn send_public_message(&self, text: &str) -> bool {
        self.send(Command::PublicMessage(text.to_string())).await
    }

    /// Sends a private message (`privmsg <recipient> <text>`).
    pub async fn send_private_message(
        &self,
        recipient: &str,
        text: &str,
    ) -> bool {
        self.send(Command::PrivateMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
        })
        .await
    }

    /// Requests a login (`login <username>`). The outcome arrives later as
    /// a [`ChatEvent::LoginResult`].
    pub async fn try_login(&self, username: &str) -> bool {
        self.send(Command::Login(username.to_string())).await
    }

    /// Requests the current user list (`users`); answered by a
    /// [`ChatEvent::UserList`].
    pub async fn refresh_user_list(&self) -> bool {
        self.send(Command::Users).await
    }

    /// Asks which commands the server supports (`help`); answered by a
    /// [`ChatEvent::SupportedCommands`].
    pub async fn ask_supported_commands(&self) -> bool {
        self.send(Command::Help).await
    }

    /// Sends raw caller input: bare text as a public message, slash-prefixed
    /// input as a directive (`/login`, `/privmsg`, `/users`, `/help`).
    ///
    /// An unrecognised directive is rejected — nothing is written and the
    /// reason lands in [`last_error`](Self::last_error).
    pub async fn send_input(&self, input: &str) -> bool {
        match Command::from_input(input) {
            Ok(command) => self.send(command).await,
            Err(error) => {
                self.record_error(&error.into());
                false
            }
        }
    }

    /// Returns `true` iff the connection was active and the line was
    /// written. No network write is attempted while disconnected.
    async fn send(&self, command: Command) -> bool {
        match self.write_line(&command.to_line()).await {
            Ok(()) => true,
            Err(error) => {
                self.record_error(&error);
                false
            }
        }
    }

    async fn write_line(&self, line: &str) -> Result<(), ClientError> {
        let mut slot = self.shared.writer.lock().await;
        let writer = slot.as_mut().ok_or(ClientError::NotConnected)?;

        match write_terminated(writer, line).await {
            Ok(()) => Ok(()),
            Err(error) => {
                // A failed write means the connection is gone. Tear it
                // down under this same lock acquisition; dropping the
                // handle closes the socket and ends the read loop.
                slot.take();
                drop(slot);
                self.shared.listeners.emit(&ChatEvent::Disconnected);
                self.abort_reader();
                Err(ClientError::Io(error))
            }
        }
    }

    fn abort_reader(&self) {
        if let Some(handle) = lock(&self.shared.reader_task).take() {
            handle.abort();
        }
    }

    fn record_error(&self, error: &ClientError) {
        tracing::debug!(%error, "operation failed");
        self.shared.set_last_error(error.to_string());
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes one line plus the terminator and flushes, so a partial line
/// never lingers in an application-level buffer.
async fn write_terminated(
    writer: &mut OwnedWriteHalf,
    line: &str,
) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Closes the connection exactly once and emits `Disconnected`.
///
/// There is no await point between taking the handle and emitting the
/// event, so even if the calling task is aborted mid-close the event has
/// already gone out.
async fn close_connection(shared: &Shared) {
    let taken = shared.writer.lock().await.take();
    if let Some(mut writer) = taken {
        shared.listeners.emit(&ChatEvent::Disconnected);
        if let Err(error) = writer.shutdown().await {
            tracing::debug!(%error, "socket shutdown failed");
        }
        tracing::info!("disconnected");
    }
}

/// The background read loop; one instance per successful connect.
///
/// Blocks on the next line, decodes it, and fans the event out. The loop
/// has two states — reading and stopped — and the only way from reading to
/// stopped is EOF, a read error, or the socket being closed under it by an
/// explicit disconnect. There is no way back; a fresh `connect` spawns a
/// fresh loop.
async fn read_loop(shared: Arc<Shared>, read_half: OwnedReadHalf) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.is_empty() {
                    continue;
                }
                match ServerEvent::parse(&line) {
                    Ok(Some(event)) => {
                        shared.listeners.emit(&ChatEvent::from(event));
                    }
                    Ok(None) => {
                        tracing::debug!(
                            line = %line,
                            "ignoring unrecognised server line"
                        );
                    }
                    Err(error) => {
                        // One malformed line must not end the session.
                        tracing::warn!(
                            %error,
                            line = %line,
                            "dropping malformed server line"
                        );
                    }
                }
            }
            Ok(None) => {
                tracing::info!("server closed the connection");
                break;
            }
            Err(error) => {
                shared.set_last_error(error.to_string());
                tracing::debug!(%error, "read failed");
                break;
            }
        }
    }

    close_connection(&shared).await;
}
