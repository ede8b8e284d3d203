use clap::Parser;
use cockroach_poker::config::CliConfig;
use cockroach_poker::server::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = CliConfig::parse();
    run_server(config).await
}
