mod commands;
mod config;
mod error;
mod output;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bankdesk={level},client={level},engine={level}",
            level = config.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let client = client::Client::new(&config.base_url)?;
    commands::run(&client, &config, command).await
}
