//! Command Line Arguments

use std::path::PathBuf;

use clap::Parser;

/// Drive a checkout page snapshot: select a payment method, fill fields, submit
#[derive(Debug, Parser)]
#[command(name = "checkout-cli", version, about)]
pub struct Args {
    /// Page snapshot (JSON) as rendered by the server
    #[arg(long, short)]
    pub page: PathBuf,

    /// Payment method identifier to select
    #[arg(long, short)]
    pub select: Option<String>,

    /// Field input as FIELD_ID=VALUE (repeatable); numeric fields are sanitized
    #[arg(long = "set", value_parser = parse_assignment)]
    pub inputs: Vec<(String, String)>,

    /// Print the payload instead of submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Seconds to wait for a payment status message after handoff (0 = don't wait)
    #[arg(long, default_value_t = 0)]
    pub wait_status: u64,
}

/// Parse `FIELD_ID=VALUE`
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD_ID=VALUE, got `{raw}`"))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing field id in `{raw}`"));
    }

    Ok((id.to_string(), value.to_string()))
}
