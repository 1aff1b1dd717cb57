use clap::Parser;
use matchstats::adapter::inbound::cli::command::Cli;
use matchstats::adapter::inbound::cli::{dispatch, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = dispatch::run(cli).await.map_err(anyhow::Error::from) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
