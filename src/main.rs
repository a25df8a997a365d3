// src/main.rs
use dotenvy::dotenv;
use finance_tracker::{cli, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = ApiConfig::from_env();
    cli::run(config).await?;
    Ok(())
}
