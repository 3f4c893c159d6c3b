//! Terminal chat: host a session or join one, then type.
//!
//! ```text
//! terminal-chat          join if a host is found, otherwise host
//! terminal-chat host     always host
//! terminal-chat join     only join; exit if nobody is hosting
//! ```
//!
//! Lines you type are sent to the session; `/quit` leaves. Set
//! `RUST_LOG` for engine logs.

use std::error::Error;
use std::net::SocketAddr;

use banter::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

struct Terminal;

impl ChatEvents for Terminal {
    fn on_message_received(&self, line: &str) {
        println!("{line}");
    }

    fn on_roster_changed(&self, roster: &[PlayerEntry]) {
        let names: Vec<String> = roster
            .iter()
            .map(|entry| {
                if entry.is_host {
                    format!("{} (Host)", entry.name)
                } else {
                    entry.name.clone()
                }
            })
            .collect();
        println!("* online: {}", names.join(", "));
    }

    fn on_joined(&self) {
        println!("* joined the session");
    }

    fn on_host_found(&self, addr: SocketAddr) {
        println!("* found a host at {addr}");
    }

    fn on_disconnected(&self) {
        println!("* session ended, press Enter to exit");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "auto".to_string());
    let mut app = ChatApp::new(ChatConfig::default(), Terminal);

    match mode.as_str() {
        "host" => {
            let addr = app.start_as_host().await?;
            println!("* hosting on {addr}");
        }
        "join" => {
            app.try_auto_join().await?;
        }
        _ => {
            if app.try_auto_join().await.is_err() {
                println!("* nobody is hosting, starting a session");
                let addr = app.start_as_host().await?;
                println!("* hosting on {addr}");
            }
        }
    }

    match app.local_player().await {
        Ok(me) => println!("* you are {}", me.name),
        Err(_) => println!("* waiting for the roster..."),
    }
    println!("* type to chat, /quit to leave");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || app.role().await == Role::Unattached {
            break;
        }
        if let Err(e) = app.send_message(line).await {
            eprintln!("! send failed: {e}");
            break;
        }
    }

    app.shutdown().await;
    Ok(())
}
