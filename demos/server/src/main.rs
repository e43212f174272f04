//! Standalone Gridline server. Point a few telnet or `gridline-client`
//! sessions at it and play.

use clap::Parser;
use gridline::Server;

#[derive(Parser, Debug)]
#[command(name = "gridline-server")]
#[command(about = "Multi-room tic-tac-toe server over line-oriented TCP")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let server = Server::bind(&format!("0.0.0.0:{}", args.port)).await?;
    server.run().await?;
    Ok(())
}
