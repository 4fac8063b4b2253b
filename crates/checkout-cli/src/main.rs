//! checkout-cli
//!
//! Headless driver for the checkout form. Loads a page snapshot, replays the
//! user's events against the controller and submits to the configured
//! payment endpoint.

mod cli;
mod terminal;

use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_core::CheckoutPage;
use checkout_runtime::{RuntimeConfig, build_controller, watch_status};

use crate::cli::Args;
use crate::terminal::{TerminalNotifier, print_page};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = RuntimeConfig::from_env()?;

    let raw = std::fs::read_to_string(&args.page)
        .with_context(|| format!("reading {}", args.page.display()))?;
    let page: CheckoutPage = serde_json::from_str(&raw)
        .with_context(|| format!("parsing page snapshot {}", args.page.display()))?;

    let notifier = Rc::new(TerminalNotifier);
    let mut controller = build_controller(page, &config, notifier.clone())?;

    if let Some(id) = &args.select {
        controller.select(id)?;
    }
    for (field_id, value) in &args.inputs {
        let stored = controller.input(field_id, value.as_str())?;
        tracing::debug!(field = %field_id, value = %stored, "Field updated");
    }

    print_page(controller.page());

    if args.dry_run {
        let payload = controller.prepare_submission();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    tracing::info!(url = %config.payment_url(), "Submitting to payment endpoint");
    let handoff = controller.submit().await.context("payment submission failed")?;

    println!("redirect: {}", handoff.url);

    if let (Some(subscription), true) = (handoff.status, args.wait_status > 0) {
        let wait = Duration::from_secs(args.wait_status);
        if tokio::time::timeout(wait, watch_status(subscription, notifier.as_ref()))
            .await
            .is_err()
        {
            tracing::warn!(seconds = args.wait_status, "No payment status received");
        }
    }

    Ok(())
}
