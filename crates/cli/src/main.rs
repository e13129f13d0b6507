//! Marine Diagnosis CLI Entry Point
//!
//! Reads operator queries from stdin, one per line, as a single conversation
//! and prints every response as JSON.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use marine_diag_agent::Diagnoser;
use marine_diag_config::{load_settings, LogFormat, Settings};
use marine_diag_core::Subsystem;

/// One line of operator input
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Query {
        text: String,
        engine: Option<Subsystem>,
    },
    Reset,
    Quit,
    Skip,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Skip);
        }

        let Some(directive) = line.strip_prefix(':') else {
            return Ok(Self::Query {
                text: line.to_string(),
                engine: None,
            });
        };

        let (name, rest) = directive
            .split_once(char::is_whitespace)
            .unwrap_or((directive, ""));
        match name {
            "reset" => Ok(Self::Reset),
            "quit" | "q" => Ok(Self::Quit),
            "engine" => {
                let (engine, text) = rest
                    .trim()
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: :engine <main|aux> <query>".to_string())?;
                let engine = Subsystem::parse(engine)
                    .ok_or_else(|| format!("unknown engine '{}'", engine))?;
                Ok(Self::Query {
                    text: text.trim().to_string(),
                    engine: Some(engine),
                })
            },
            other => Err(format!("unknown command ':{}'", other)),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("MARINE_DIAG_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    init_tracing(&settings);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?settings.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Starting marine diagnosis"
    );

    let diagnoser = Diagnoser::from_settings(&settings)
        .await
        .context("failed to initialize diagnosis pipeline")?;

    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(session_id = %session_id, "Session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let output = match Command::parse(&line) {
            Ok(Command::Skip) => continue,
            Ok(Command::Quit) => break,
            Ok(Command::Reset) => {
                let ack = diagnoser.reset_conversation(&session_id).await?;
                serde_json::to_string_pretty(&ack)?
            },
            Ok(Command::Query { text, engine }) => {
                let response = diagnoser.diagnose(&session_id, &text, engine).await;
                serde_json::to_string_pretty(&response)?
            },
            Err(message) => serde_json::json!({ "error": message }).to_string(),
        };

        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!(session_id = %session_id, "Session ended");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("marine_diag={}", level).into()
    });

    let fmt_layer = match settings.observability.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_query() {
        assert_eq!(
            Command::parse("  main engine temp too high ").unwrap(),
            Command::Query {
                text: "main engine temp too high".to_string(),
                engine: None,
            }
        );
        assert_eq!(Command::parse("   ").unwrap(), Command::Skip);
    }

    #[test]
    fn test_parse_directives() {
        assert_eq!(Command::parse(":reset").unwrap(), Command::Reset);
        assert_eq!(Command::parse(":q").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse(":engine aux not starting").unwrap(),
            Command::Query {
                text: "not starting".to_string(),
                engine: Some(Subsystem::AuxiliaryEngine),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse(":engine").is_err());
        assert!(Command::parse(":engine boiler leaking").is_err());
        assert!(Command::parse(":frobnicate").is_err());
    }
}
