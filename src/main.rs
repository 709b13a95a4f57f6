use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planning_poker::client::SessionClient;
use planning_poker::config::ClientConfig;
use planning_poker::engine::Effect;
use planning_poker::script::{read_script, ScriptLine};
use planning_poker::transport::{LineTransport, Transport};

// Snapshots and local input share one logical thread
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // stdout carries outbound frames, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planning_poker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    let mut client = SessionClient::from_config(&config, LineTransport::stdout());
    if let Err(e) = client.join().await {
        tracing::error!("Failed to join session: {}", e);
        std::process::exit(1);
    }

    match std::env::args().nth(1) {
        Some(path) => {
            let lines = match read_script(&path).await {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::error!(%path, "{}", e);
                    std::process::exit(2);
                }
            };
            for line in lines {
                step(&mut client, line).await;
            }
        }
        None => {
            let mut stdin = BufReader::new(tokio::io::stdin()).lines();
            let mut line_no = 0;
            loop {
                let raw = match stdin.next_line().await {
                    Ok(Some(raw)) => raw,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                line_no += 1;
                match ScriptLine::parse(line_no, &raw) {
                    Ok(Some(line)) => step(&mut client, line).await,
                    Ok(None) => {}
                    Err(e) => tracing::warn!("{}", e),
                }
            }
        }
    }

    tracing::info!(state = ?client.state(), "Detached from session");
}

async fn step<T: Transport>(client: &mut SessionClient<T>, line: ScriptLine) {
    let effects = match line {
        ScriptLine::Inbound(frame) => client.handle_frame(&frame),
        ScriptLine::Local(intent) => match client.handle_intent(intent).await {
            Ok(effects) => effects,
            Err(e) => {
                tracing::error!("Failed to reach session authority: {}", e.source);
                e.effects
            }
        },
    };
    render(&effects);
}

fn render(effects: &[Effect]) {
    for effect in effects {
        match serde_json::to_string(effect) {
            Ok(json) => tracing::info!(effect = %json, "Effect"),
            Err(e) => tracing::warn!("Failed to encode effect: {}", e),
        }
    }
}
