//! Headless Keybind Dump
//!
//! Fetches a platform's keybinds from the API and prints them grouped by
//! category, the same way the visualizer's list shows them.

use dotfolio::core::config::KeyboardConfig;
use dotfolio::keyboard::{FetchOutcome, KeybindClient, KeyboardViz, Platform};
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;

/// Print the keybinds served for a platform
#[derive(Parser, Debug)]
#[command(name = "keybinds")]
#[command(about = "Fetch and print keybinds grouped by category")]
struct Args {
    /// Platform to fetch (hyprland or yabai)
    #[arg(long, default_value = "yabai")]
    platform: Platform,

    /// Keybind API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct Group<'a> {
    category: &'a str,
    keybinds: Vec<Entry<'a>>,
}

#[derive(Serialize)]
struct Entry<'a> {
    combo: String,
    action: &'a str,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("dotfolio=warn")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let base_url = args
        .base_url
        .unwrap_or_else(|| KeyboardConfig::default().base_url);

    let client = match KeybindClient::new(&base_url, Duration::from_secs(args.timeout)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Could not build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut viz = KeyboardViz::new(args.platform);
    let ticket = viz.begin_fetch();
    let (ticket, result) = client.fetch_ticket(ticket).await;
    if let Err(e) = &result {
        eprintln!("Could not load {} keybinds: {}", ticket.platform, e);
    }
    if viz.complete_fetch(ticket, result) == FetchOutcome::Failed {
        return ExitCode::FAILURE;
    }

    let groups: Vec<Group> = viz
        .grouped_keybinds()
        .into_iter()
        .map(|(category, keybinds)| Group {
            category,
            keybinds: keybinds
                .into_iter()
                .map(|kb| Entry {
                    combo: kb.format(),
                    action: &kb.action,
                })
                .collect(),
        })
        .collect();

    if args.format == "json" {
        match serde_json::to_string_pretty(&groups) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Could not serialize keybinds: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("=== {} keybinds ===", viz.platform());
        for group in &groups {
            println!();
            println!("{}", group.category.to_uppercase());
            for entry in &group.keybinds {
                println!("  {:<28} {}", entry.combo, entry.action);
            }
        }
    }
    ExitCode::SUCCESS
}
