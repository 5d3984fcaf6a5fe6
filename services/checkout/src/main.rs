//! `ps-checkout`: check out a managed account password from Password Safe
//! and print it as JSON for the process that runs the remote command.

use anyhow::{Context, Result};
use checkout_cli::{Config, write_credential};
use clap::{Parser, ValueEnum};
use password_safe_client::{
    CheckoutParams, DEFAULT_DURATION_MINUTES, MatchPolicy, PasswordSafeClient,
};
use rust_common::init_tracing;
use std::{io, process::ExitCode};
use tracing::error;

#[derive(Parser)]
#[command(name = "ps-checkout")]
#[command(about = "Check out a managed account password from BeyondTrust Password Safe")]
#[command(version)]
struct Args {
    /// Account name as known to Password Safe (AccountName or UPN)
    #[arg(short, long)]
    account: String,

    /// Managed system the account belongs to
    #[arg(short, long)]
    system: String,

    /// Checkout length in minutes
    #[arg(short, long, default_value_t = DEFAULT_DURATION_MINUTES,
          value_parser = clap::value_parser!(u32).range(1..))]
    duration: u32,

    /// Rotate the password when the checkout ends
    #[arg(long)]
    rotate_on_checkin: bool,

    /// How outstanding requests are matched to the account
    #[arg(long, value_enum, default_value_t = PolicyArg::ExactThenPrefix)]
    match_policy: PolicyArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Only reuse requests whose account name is identical
    Exact,
    /// Prefer identical names, else accept a bare name that prefixes the UPN
    ExactThenPrefix,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Exact => Self::Exact,
            PolicyArg::ExactThenPrefix => Self::ExactThenPrefix,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ps-checkout: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.tracing);

    let client = PasswordSafeClient::new(
        config
            .password_safe
            .with_match_policy(args.match_policy.into()),
    )?;

    let params = CheckoutParams::new(args.account, args.system)
        .with_duration_minutes(args.duration)
        .with_rotate_on_checkin(args.rotate_on_checkin);

    let credential = client.checkout(&params).await.inspect_err(|err| {
        error!(step = ?err.step(), error = %err, "Checkout failed");
    })?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_credential(&mut handle, &credential).context("Failed to write credential")?;
    Ok(())
}
