use anyhow::Result;
use tracing::info;

use corvid_uci::UciEngine;

fn main() -> Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!("corvid starting");
    UciEngine::new()?.run()?;
    Ok(())
}
