mod dispatcher;
mod i18n;

use boletim_core::{
    config,
    request::{IncomingRequest, OutgoingResponse, RequestKind},
    traits::CovidSource,
};
use boletim_data::{states, CovidClient};
use clap::{Parser, Subcommand, ValueEnum};
use dispatcher::Dispatcher;
use i18n::LocaleStore;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "boletim",
    version,
    about = "Boletim: spoken COVID-19 case and death counts for Brazil"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one request read as JSON from a file (or stdin) and print the
    /// response as JSON.
    Handle {
        /// Request file. Reads stdin when omitted.
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Build a request from flags and print the spoken answer.
    Ask {
        #[arg(short, long, value_enum, default_value = "intent")]
        kind: KindArg,
        /// Intent name (e.g. caseDeaths).
        #[arg(short, long)]
        intent: Option<String>,
        /// Slot value as name=value (repeatable).
        #[arg(short, long = "slot", value_parser = parse_slot)]
        slots: Vec<(String, String)>,
        #[arg(short, long, default_value = "pt-BR")]
        locale: String,
    },
    /// Validate locale tables, show handler order and probe the upstreams.
    Status,
    /// Print the latest figures for every state.
    States,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Launch,
    Intent,
    SessionEnded,
}

impl From<KindArg> for RequestKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Launch => RequestKind::Launch,
            KindArg::Intent => RequestKind::Intent,
            KindArg::SessionEnded => RequestKind::SessionEnded,
        }
    }
}

fn parse_slot(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    if name.trim().is_empty() {
        return Err(format!("empty slot name in '{s}'"));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    // Logs go to stderr so `handle` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.skill.log_level)),
        )
        .init();

    let i18n = Arc::new(LocaleStore::load(
        &cfg.skill.default_locale,
        cfg.skill.locales_dir.as_deref(),
    )?);
    let client = Arc::new(CovidClient::from_config(&cfg.data)?);
    let dispatcher = match Dispatcher::new(
        i18n.clone(),
        client.clone(),
        Duration::from_millis(cfg.skill.deadline_ms),
    ) {
        Ok(d) => d,
        Err(e) => anyhow::bail!("dispatcher misconfigured: {e}"),
    };

    match cli.command {
        Commands::Handle { file } => {
            let raw = match file {
                Some(ref path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let request: IncomingRequest = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid request JSON: {e}"))?;
            let response = dispatcher.dispatch(&request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Ask {
            kind,
            intent,
            slots,
            locale,
        } => {
            let kind = RequestKind::from(kind);
            if kind == RequestKind::Intent && intent.is_none() {
                anyhow::bail!("--intent is required for intent requests");
            }
            let request = IncomingRequest {
                kind,
                intent,
                slots: slots.into_iter().collect(),
                locale,
            };
            let response = dispatcher.dispatch(&request).await;
            print_response(&response);
        }
        Commands::Status => {
            println!("Boletim status\n");
            println!("Config: {}", cli.config);
            println!(
                "Locales: {} (default: {})",
                i18n.locales().join(", "),
                i18n.default_locale()
            );
            let order: Vec<&str> = dispatcher.handlers().iter().map(|h| h.name()).collect();
            println!("Handlers: {}", order.join(" → "));
            println!();

            let available = client.is_available().await;
            println!(
                "  {}: {}",
                client.name(),
                if available { "available" } else { "unreachable" }
            );
        }
        Commands::States => {
            let snapshots = client.latest_by_state().await?;
            info!("fetched {} state snapshots", snapshots.len());
            println!("{:<4} {:>12} {:>10}  date", "UF", "confirmed", "deaths");
            for s in &snapshots {
                let date = s
                    .as_of
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<4} {:>12} {:>10}  {date}", s.label(), s.confirmed, s.deaths);
            }
            let missing = states::missing_codes(snapshots.iter().map(|s| s.label()));
            if !missing.is_empty() {
                warn!("no upstream row for {}", missing.join(", "));
                println!("\nMissing: {}", missing.join(", "));
            }
        }
    }

    Ok(())
}

fn print_response(response: &OutgoingResponse) {
    println!("{}", response.speech);
    if let Some(ref reprompt) = response.reprompt {
        println!("  (reprompt) {reprompt}");
    }
    if let Some(ref card) = response.card {
        println!("  [{}] {}", card.title, card.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot() {
        assert_eq!(
            parse_slot("location=São Paulo").unwrap(),
            ("location".to_string(), "São Paulo".to_string())
        );
        assert_eq!(
            parse_slot("place=a=b").unwrap(),
            ("place".to_string(), "a=b".to_string())
        );
        assert!(parse_slot("location").is_err());
        assert!(parse_slot("=bahia").is_err());
    }

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from([
            "boletim",
            "ask",
            "--intent",
            "caseDeaths",
            "--slot",
            "location=bahia",
            "--locale",
            "en-US",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                kind,
                intent,
                slots,
                locale,
            } => {
                assert_eq!(RequestKind::from(kind), RequestKind::Intent);
                assert_eq!(intent.as_deref(), Some("caseDeaths"));
                assert_eq!(slots, vec![("location".to_string(), "bahia".to_string())]);
                assert_eq!(locale, "en-US");
            }
            _ => panic!("expected ask"),
        }
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_cli_parses_launch_kind() {
        let cli = Cli::try_parse_from(["boletim", "ask", "--kind", "session-ended"]).unwrap();
        match cli.command {
            Commands::Ask { kind, .. } => {
                assert_eq!(RequestKind::from(kind), RequestKind::SessionEnded)
            }
            _ => panic!("expected ask"),
        }
    }
}
