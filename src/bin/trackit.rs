// ABOUTME: trackit CLI - classify tracking numbers and normalize carrier responses offline
// ABOUTME: Subcommands guess, present, request and carriers print JSON to stdout
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
//!
//! Usage:
//! ```bash
//! # Which carriers could this tracking number belong to?
//! trackit guess "1Z 12345E 0205271686"
//!
//! # Normalize a saved LaserShip response
//! trackit present --carrier lasership --tracking-number LN12345678 --file response.json
//!
//! # Normalize a response piped on stdin, keeping the raw text
//! curl -s "$URL" | trackit present --carrier prestige --tracking-number PS80558274 --raw
//!
//! # Show the request a carrier lookup needs
//! trackit request --carrier usps --tracking-number 9400110200881234567896
//!
//! # List compiled-in carriers and whether they are configured
//! trackit carriers
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use trackit::identification::{guess_carrier, normalize_tracking_number};
use trackit::logging::LoggingConfig;
use trackit::registry::CarrierRegistry;
use trackit::{Carrier, TrackingRequest};

#[derive(Parser)]
#[command(
    name = "trackit",
    version,
    about = "Carrier-agnostic package tracking",
    long_about = "Identify candidate carriers for a tracking number and normalize raw carrier tracking responses. No network access is performed."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the candidate carriers for a tracking number
    Guess {
        /// Tracking number, whitespace allowed
        tracking_number: String,
    },

    /// Normalize a raw carrier response read from a file or stdin
    Present {
        #[command(flatten)]
        lookup: LookupArgs,

        /// Response file (reads stdin when omitted)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Print the outbound request a lookup needs
    Request {
        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// List compiled-in carriers
    Carriers,
}

#[derive(Args)]
struct LookupArgs {
    /// Carrier identifier (ups, fedex, usps, dhl, canadapost, a1intl, lasership, prestige)
    #[arg(long, short = 'c')]
    carrier: Carrier,

    /// Tracking number being looked up
    #[arg(long, short = 't')]
    tracking_number: String,

    /// Customer reference for carriers that echo one
    #[arg(long)]
    reference: Option<String>,

    /// Client IP for carriers that require one
    #[arg(long)]
    client_ip: Option<String>,

    /// Use the carrier's test endpoint
    #[arg(long)]
    test: bool,

    /// Include the raw response in the presented result
    #[arg(long)]
    raw: bool,

    /// Request timeout override in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl LookupArgs {
    fn tracking_request(&self) -> TrackingRequest {
        let mut request = TrackingRequest::new(self.tracking_number.trim())
            .with_test(self.test)
            .with_raw(self.raw);
        if let Some(reference) = &self.reference {
            request = request.with_reference(reference);
        }
        if let Some(client_ip) = &self.client_ip {
            request = request.with_client_ip(client_ip);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            request = request.with_timeout_ms(timeout_ms);
        }
        request
    }
}

#[derive(Serialize)]
struct CarrierListing {
    name: &'static str,
    display_name: &'static str,
    carrier: Carrier,
    capabilities: Vec<&'static str>,
    endpoint: &'static str,
    registered: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    match cli.command {
        Command::Guess { tracking_number } => guess(&tracking_number),
        Command::Present { lookup, file } => present(&lookup, file.as_deref()).await,
        Command::Request { lookup } => request(&lookup),
        Command::Carriers => carriers(),
    }
}

fn guess(tracking_number: &str) -> Result<()> {
    let candidates = guess_carrier(tracking_number);
    print_json(&json!({
        "tracking_number": normalize_tracking_number(tracking_number),
        "candidates": candidates,
    }))
}

async fn present(lookup: &LookupArgs, file: Option<&Path>) -> Result<()> {
    let registry = load_registry()?;
    let response = read_response(file).await?;
    let request = lookup.tracking_request();

    let presented = registry
        .present(lookup.carrier, &response, &request)
        .await
        .with_context(|| format!("{} could not present the response", lookup.carrier))?;
    info!(
        carrier = %lookup.carrier,
        status = ?presented.status,
        activities = presented.activities.len(),
        "Presented tracking response"
    );
    print_json(&presented)
}

fn request(lookup: &LookupArgs) -> Result<()> {
    let registry = load_registry()?;
    let built = registry
        .build_request(lookup.carrier, &lookup.tracking_request())
        .with_context(|| format!("{} could not build the request", lookup.carrier))?;
    print_json(&built)
}

fn carriers() -> Result<()> {
    let registry = load_registry()?;
    let listing: Vec<CarrierListing> = registry
        .catalog()
        .into_iter()
        .map(|(descriptor, registered)| CarrierListing {
            name: descriptor.name(),
            display_name: descriptor.display_name(),
            carrier: descriptor.carrier(),
            capabilities: descriptor.capabilities().labels(),
            endpoint: descriptor.api_base_url(),
            registered,
        })
        .collect();
    print_json(&listing)
}

fn load_registry() -> Result<CarrierRegistry> {
    CarrierRegistry::from_env().context("Failed to load configuration")
}

async fn read_response(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            debug!(path = %path.display(), "Reading carrier response");
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            debug!("Reading carrier response from stdin");
            let mut response = String::new();
            tokio::io::stdin()
                .read_to_string(&mut response)
                .await
                .context("Failed to read stdin")?;
            Ok(response)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
