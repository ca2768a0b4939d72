//! Stepviz command-line entry point
//!
//! `stepviz serve [port]` runs the HTTP API, `stepviz trace <algorithm> [input]`
//! prints a trace as JSON lines, and `stepviz catalogue` prints the grouped
//! algorithm catalogue.

use std::env;

use stepviz_trace::{catalogue, simulate_or_fallback, RawInput};
use stepviz_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: stepviz [serve [port] | trace <algorithm> [input] | catalogue]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepviz=info,stepviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("serve") => {
            let mut config = VisConfig::from_env()?;
            if let Some(port) = args.get(1) {
                config = config.with_port(port.parse()?);
            }
            tracing::info!(algorithm = %config.algorithm, speed = ?config.speed, "Starting stepviz");
            VisServer::new(config).serve().await?;
        }
        Some("trace") => {
            let algorithm = args.get(1).ok_or(USAGE)?;
            let input = match args.get(2) {
                Some(raw) => RawInput::Text(raw.clone()),
                None => catalogue::lookup(algorithm)
                    .map(|d| d.default_input())
                    .unwrap_or_else(|| RawInput::Text(String::new())),
            };
            let trace = simulate_or_fallback(algorithm, &input);
            for step in trace.steps() {
                println!("{}", serde_json::to_string(step)?);
            }
        }
        Some("catalogue") => {
            println!("{}", serde_json::to_string_pretty(&catalogue::grouped())?);
        }
        Some(_) => return Err(USAGE.into()),
    }

    Ok(())
}
