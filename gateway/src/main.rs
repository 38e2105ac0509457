/*
 * Responsibility
 * - start the tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

mod app;
mod config;
mod error;
mod middleware;
mod proxy;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
