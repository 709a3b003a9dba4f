//! A line-mode terminal client for the Headwins poker server.
//!
//! The client connects over WebSocket, joins the table under a display
//! name, prints the table as the server updates it, and sends the actions
//! typed at the prompt.

use anyhow::{Context, Result};
use env_logger::Env;
use pico_args::Arguments;

use hw_client::{app::App, config::ClientConfig};

const HELP: &str = "\
Connect to a Headwins poker server

USAGE:
  hw_client [OPTIONS]

OPTIONS:
  --server URL          WebSocket endpoint  [default: $HW_SERVER_URL or ws://localhost:8000/ws]
  --username NAME       Display name        [default: $HW_USERNAME or a random 'Player N']

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  RUST_LOG              Diagnostic log filter, written to stderr  [default: warn]
";

struct Args {
    server_url: Option<String>,
    username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .opt_value_from_str("--server")
            .context("Invalid --server value")?,
        username: pargs
            .opt_value_from_str("--username")
            .context("Invalid --username value")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        log::warn!("ignoring unexpected arguments: {remaining:?}");
    }

    let config = ClientConfig::from_env(args.server_url, args.username);
    config.validate()?;

    App::new(config).run().await?;

    println!("\nDisconnected from table.");
    Ok(())
}
