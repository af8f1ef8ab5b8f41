use anyhow::Result;
use clap::Parser;
use client_core::{
    ActionDispatcher, ListClient, ListView, LongPressDetector, BULK_REMOVE_DELAY, CONFIRM_SLACK,
    REDUCE_QUANTITY_DELAY,
};
use shared::{
    domain::{Product, Unit},
    protocol::ClientAction,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::Duration,
};
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the list authority, e.g. http://127.0.0.1:8443
    #[arg(long)]
    server_url: String,
}

/// Renders the synced list as one line of output per change.
struct LineView;

fn row_label(product: &Product) -> String {
    match product.unit {
        Unit::None => product.name.clone(),
        unit => format!("{} ({unit})", product.name),
    }
}

impl ListView for LineView {
    type Handle = String;

    fn insert(&mut self, index: usize, product: &Product) -> Self::Handle {
        let row = row_label(product);
        println!("+ [{index}] {row}: {}", product.quantity_label());
        row
    }

    fn set_quantity_label(&mut self, handle: &mut Self::Handle, label: &str) {
        println!("~ {handle}: {label}");
    }

    fn set_taken(&mut self, handle: &mut Self::Handle, taken: bool) {
        let mark = if taken { "[x]" } else { "[ ]" };
        println!("{mark} {handle}");
    }

    fn remove(&mut self, handle: Self::Handle) {
        println!("- {handle}");
    }

    fn clear(&mut self) {
        println!("(list cleared)");
    }
}

/// Runs a destructive command through the long-press detector with a
/// simulated sustained hold, mirroring the confirmation gesture of a pointer
/// UI.
async fn hold_to_confirm(delay: Duration, action: ClientAction, dispatcher: &ActionDispatcher) {
    let detector = LongPressDetector::new(delay, action, dispatcher.clone());
    detector.press().await;
    tokio::time::sleep(delay + CONFIRM_SLACK).await;
    detector.release().await;
}

fn parse_target(mut parts: std::str::SplitWhitespace<'_>) -> Option<(String, Unit)> {
    let name = parts.next()?.to_string();
    let unit = match Unit::parse(parts.next().unwrap_or("")) {
        Ok(unit) => unit,
        Err(err) => {
            eprintln!("{err}");
            return None;
        }
    };
    Some((name, unit))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = ListClient::new(LineView);
    client.connect(&args.server_url).await?;
    info!(server_url = %args.server_url, "list client connected");
    let dispatcher = client.dispatcher();

    println!("commands: take <name> [unit] | reduce <name> [unit] | sweep | clear | show | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("take") => {
                if let Some((name, unit)) = parse_target(parts) {
                    dispatcher.toggle_taken(&name, unit);
                }
            }
            Some("reduce") => {
                if let Some((name, unit)) = parse_target(parts) {
                    let action = ClientAction::ReduceQuantity { name, unit };
                    hold_to_confirm(REDUCE_QUANTITY_DELAY, action, &dispatcher).await;
                }
            }
            Some("clear") => {
                hold_to_confirm(BULK_REMOVE_DELAY, ClientAction::RemoveAll, &dispatcher).await;
            }
            Some("sweep") => {
                hold_to_confirm(BULK_REMOVE_DELAY, ClientAction::RemoveTaken, &dispatcher).await;
            }
            Some("show") => {
                for product in client.snapshot().await {
                    let mark = if product.taken { "[x]" } else { "[ ]" };
                    println!("{mark} {}: {}", row_label(&product), product.quantity_label());
                }
            }
            Some("quit") => break,
            Some(other) => eprintln!("unknown command: {other}"),
            None => {}
        }
    }

    Ok(())
}
