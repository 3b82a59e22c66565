//! # tcn-sign
//!
//! Produce or check `Authorization: TCN <token>:<digest>` headers.
//!
//! Credentials come from `TCN_API_TOKEN` and `TCN_API_SECRET` (or
//! `TCN_API_SECRET_HEX`). See `tcn_runtime::config`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use tcn_crypto::{
    resolve_path_variables, CanonicalRequest, SecretKey, AUTHORIZATION_HEADER,
    DEFAULT_SECRET_LEN, TIMESTAMP_HEADER,
};
use tcn_runtime::logging::init_logging;
use tcn_runtime::SignerConfig;

/// Largest secret `keygen` will produce, in bytes.
const MAX_KEYGEN_BYTES: u64 = 4096;

/// tcn-sign: HMAC-SHA256 request signing for the TCN authorization scheme
#[derive(Parser, Debug)]
#[command(name = "tcn-sign", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print Authorization and X-Timestamp headers for a request
    Sign(RequestArgs),

    /// Check an Authorization header against a request
    Verify(VerifyArgs),

    /// Print a random hex secret
    Keygen {
        /// Secret length in bytes (1 to 4096)
        #[arg(
            long,
            default_value_t = DEFAULT_SECRET_LEN as u64,
            value_parser = clap::value_parser!(u64).range(1..=MAX_KEYGEN_BYTES)
        )]
        bytes: u64,
    },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// HTTP verb (upper-cased before signing)
    #[arg(short, long)]
    method: String,

    /// Request path (lower-cased before signing)
    #[arg(short, long)]
    path: String,

    /// Path variable substitution, `name=value` replaces `:name`
    #[arg(long = "var", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Timestamp to sign instead of the current time (YYYY-MM-DDTHH:MM:SS[.fff]Z)
    #[arg(short, long)]
    timestamp: Option<String>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Received Authorization header value
    #[arg(short, long)]
    authorization: String,
}

/// Parse a `name=value` pair.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

fn canonical_request(args: &RequestArgs) -> Result<Option<CanonicalRequest>> {
    let path = resolve_path_variables(&args.path, &args.vars);
    match &args.timestamp {
        Some(timestamp) => CanonicalRequest::normalized(&args.method, &path, timestamp)
            .map(Some)
            .context("Invalid request"),
        None => Ok(None),
    }
}

fn sign(args: RequestArgs) -> Result<()> {
    let config = SignerConfig::from_env().context("Missing signing credentials")?;
    let signer = config.signer()?;

    let signed = match canonical_request(&args)? {
        Some(request) => signer.sign(&request),
        None => {
            let path = resolve_path_variables(&args.path, &args.vars);
            signer
                .sign_now(&args.method, &path)
                .context("Invalid request")?
        }
    };

    info!(timestamp = signed.timestamp.as_str(), "Request signed");
    for (name, value) in signed.headers() {
        println!("{name}: {value}");
    }
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<()> {
    let config = SignerConfig::from_env().context("Missing signing credentials")?;
    let signer = config.signer()?;

    let request = canonical_request(&args.request)?.with_context(|| {
        format!("--timestamp is required for verify (the received {TIMESTAMP_HEADER} value)")
    })?;

    match signer.verify(&request, &args.authorization) {
        Ok(()) => {
            println!("{AUTHORIZATION_HEADER}: valid");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Verification failed");
            Err(e).context("Authorization header rejected")
        }
    }
}

fn keygen(bytes: u64) -> Result<()> {
    let len = usize::try_from(bytes).context("--bytes does not fit in memory")?;
    let secret = SecretKey::generate(len);
    println!("{}", secret.to_hex());
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Sign(args) => sign(args),
        Command::Verify(args) => verify(args),
        Command::Keygen { bytes } => keygen(bytes),
    }
}
