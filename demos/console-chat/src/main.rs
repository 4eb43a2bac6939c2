//! Console harness for the Chatwire client.
//!
//! Connects to a chat server, prints every decoded event, and forwards
//! stdin lines (bare text or slash directives) to the server. `/quit` or
//! Ctrl-C exits.

use std::sync::Arc;

use chatwire::{ChatClient, ChatEvent, ChatListener};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "console-chat", about = "Minimal console chat client")]
struct Args {
    /// Chat server host name or IP address.
    host: String,

    /// Chat server TCP port.
    #[arg(default_value_t = 1300)]
    port: u16,

    /// Log in with this username right after connecting.
    #[arg(short, long)]
    username: Option<String>,
}

struct ConsolePrinter;

impl ChatListener for ConsolePrinter {
    fn on_event(&self, event: &ChatEvent) {
        match event {
            ChatEvent::Disconnected => println!("*** disconnected"),
            ChatEvent::LoginResult { success: true, .. } => {
                println!("*** login ok");
            }
            ChatEvent::LoginResult { detail, .. } => {
                println!("*** login failed: {detail}");
            }
            ChatEvent::UserList(names) => {
                println!("*** online: {}", names.join(", "));
            }
            ChatEvent::Message(msg) if msg.private => {
                println!("[{} -> you] {}", msg.sender, msg.text);
            }
            ChatEvent::Message(msg) => {
                println!("<{}> {}", msg.sender, msg.text);
            }
            ChatEvent::MessageError(detail) => {
                eprintln!("!!! message not delivered: {detail}");
            }
            ChatEvent::CommandError(detail) => {
                eprintln!("!!! command rejected: {detail}");
            }
            ChatEvent::SupportedCommands(commands) => {
                println!("*** server supports: {}", commands.join(", "));
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let client = ChatClient::new();
    client.add_listener(Arc::new(ConsolePrinter));

    if !client.connect(&args.host, args.port).await {
        eprintln!(
            "could not connect to {}:{}: {}",
            args.host,
            args.port,
            client.last_error()
        );
        std::process::exit(1);
    }
    println!("*** connected to {}:{}", args.host, args.port);

    if let Some(username) = &args.username {
        client.try_login(username).await;
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = stdin.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };

        match line {
            Ok(Some(line)) => {
                let input = line.trim_end();
                if input.is_empty() {
                    continue;
                }
                if input == "/quit" {
                    break;
                }
                if !client.send_input(input).await {
                    eprintln!("!!! {}", client.last_error());
                    if !client.is_connection_active().await {
                        break;
                    }
                }
            }
            Ok(None) | Err(_) => break,
        }
    }

    client.disconnect().await;
}
