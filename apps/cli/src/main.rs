use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use cart::Cart;
use clap::Parser;
use client_core::{
    load_settings, load_settings_from, CaptureOutcome, CartSession, PayloadEncoding, UploadClient,
};
use shared::{
    domain::{ImageHandle, PermissionState},
    error::ListError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod command;

use command::{parse_command, Command, HELP};

/// Photograph groceries, have them priced, and keep a running shopping list.
#[derive(Parser, Debug)]
struct Args {
    /// Settings file; defaults to ./cart.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    endpoint_url: Option<String>,
    /// Send photos as base64 data URIs instead of raw bytes.
    #[arg(long)]
    base64: bool,
}

fn render_list(cart: &Cart) -> String {
    let list = cart.list();
    let mut out = String::from("My Shopping Cart:\n");
    if list.is_empty() {
        out.push_str("  No Items Yet\n");
    }
    for (n, item) in list.items().iter().enumerate() {
        out.push_str(&format!("  {}. {} ${}\n", n + 1, item.food, item.price));
    }
    out.push_str(&format!("Total: ${}", list.total()));
    out
}

fn render_prompt(cart: &Cart) -> Option<String> {
    cart.pending()
        .map(|pending| format!("{} [yes/no]", pending.description))
}

/// Speaks in the one-based item numbers the list shows.
fn describe_list_error(err: &ListError) -> String {
    match err {
        ListError::IndexOutOfRange { index, len: 0 } => {
            format!("There is no item {}; the list is empty.", index + 1)
        }
        ListError::IndexOutOfRange { index, len } => {
            format!("There is no item {}; pick a number from 1 to {len}.", index + 1)
        }
    }
}

/// Returns `false` when the user asked to quit.
async fn run_command(session: &mut CartSession, command: Command) -> bool {
    match command {
        Command::Capture(path) => {
            let image = ImageHandle::new(path.to_string_lossy());
            println!("Classifying {image}...");
            match session.capture(image).await {
                Ok(CaptureOutcome::Proposed(_)) => {}
                Ok(CaptureOutcome::NonMatch) => println!("Could not recognise that item."),
                Ok(CaptureOutcome::Failed(err)) => println!("Upload failed: {err}"),
                Err(rejected) => println!("{rejected}"),
            }
        }
        Command::Delete(index) => {
            if let Err(err) = session.cart_mut().propose_delete(index) {
                println!("{}", describe_list_error(&err));
            }
        }
        Command::Reset => {
            session.cart_mut().propose_reset();
        }
        Command::Confirm => match session.cart_mut().confirm() {
            Ok(Some(_)) => println!("{}", render_list(session.cart())),
            Ok(None) => println!("Nothing to confirm."),
            Err(err) => println!("{}", describe_list_error(&err)),
        },
        Command::Cancel => {
            if session.cart_mut().cancel().is_none() {
                println!("Nothing to cancel.");
            }
        }
        Command::List => println!("{}", render_list(session.cart())),
        Command::ToggleCamera => println!("Camera: {:?}", session.toggle_facing()),
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }

    if let Some(prompt) = render_prompt(session.cart()) {
        println!("{prompt}");
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(url) = args.endpoint_url {
        settings.endpoint_url = url;
    }
    if args.base64 {
        settings.payload_encoding = PayloadEncoding::Base64DataUri;
    }

    let client =
        UploadClient::from_settings(&settings).context("failed to set up classification client")?;
    tracing::info!(endpoint = %client.endpoint(), "cli: ready");

    let mut session = CartSession::new(Arc::new(client), Cart::with_items(settings.seed_items));
    // Files on disk stand in for the camera, so there is no prompt to answer.
    session.set_permission(PermissionState::Granted);

    println!("{}", render_list(session.cart()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if !run_command(&mut session, command).await {
            break;
        }
    }

    Ok(())
}
