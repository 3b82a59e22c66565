//! # hmac-demo
//!
//! Signs `GET+/rest/sites/workinghours/urgent%20si+2021-03-10T14:23:23Z` with
//! a fixed key and prints the digest raw and base64-encoded.
//!
//! Takes no arguments; every input is a literal in `tcn_runtime::demo`.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use tcn_runtime::demo::DemoSignature;
use tcn_runtime::logging::init_logging;

fn main() -> Result<()> {
    init_logging()?;

    let demo = DemoSignature::compute();
    info!(digest = %demo.digest.to_base64(), "Reference signature computed");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    demo.write_report(&mut out)
        .context("Failed to write report to stdout")?;
    out.flush()?;

    Ok(())
}
