//! mc-bridge-send: send one command to a running bridge
//!
//! Usage: `mc-bridge-send [--url ws://host:port] <command> [key=text | key:=number ...]`
//!
//! `key=text` always sends a string, `key:=number` sends a finite number.
//! Prints the server's reply.

use anyhow::{Context, Result, bail};
use mc_bridge_client::{BridgeClient, DEFAULT_URL};
use mc_bridge_core::{ParamValue, Params};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn parse_param(arg: &str) -> Result<(String, ParamValue)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("Expected key=text or key:=number, got '{}'", arg))?;

    match key.strip_suffix(':') {
        Some(key) => {
            let n: f64 = value
                .parse()
                .with_context(|| format!("'{}' is not a number", value))?;
            if !n.is_finite() {
                bail!("'{}' is not a finite number", value);
            }
            Ok((key.to_string(), ParamValue::Number(n)))
        }
        None => Ok((key.to_string(), ParamValue::Text(value.to_string()))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; quiet unless RUST_LOG says otherwise
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1).peekable();

    let url = if args.peek().map(String::as_str) == Some("--url") {
        args.next();
        args.next().context("--url needs a value")?
    } else {
        DEFAULT_URL.to_string()
    };

    let Some(command) = args.next() else {
        bail!("Usage: mc-bridge-send [--url URL] <command> [key=text | key:=number ...]");
    };

    let mut params = Params::new();
    for arg in args {
        let (key, value) = parse_param(&arg)?;
        params.insert(key, value);
    }

    let mut client = BridgeClient::connect(&url).await?;
    eprintln!("{}", client.greeting());

    let result = client.send_command(&command, params).await?;
    println!("{}", result);

    client.close().await?;
    Ok(())
}
