use anyhow::Result;
use hookbin::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
