use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use inkcheck::config::{self, ClientConfig};
use inkcheck::{HasSeverity, Retryable, analyze_path};

/// Submit a signature image to the classification backend and print the
/// verdict. The same pipeline the desktop app drives, minus the window.
#[derive(Parser, Debug)]
#[command(name = "inkcheck")]
#[command(about = "Check a signature image against the forgery-detection backend")]
#[command(
    long_about = "Submit a signature image to the classification backend and print whether it \
was judged authentic or forged, with the model's confidence."
)]
struct Args {
    /// Image file to analyze (omit with --check to only probe the backend)
    #[arg(help = "Path to the signature image (PNG, JPEG, ...)")]
    image: Option<PathBuf>,

    /// Prediction endpoint URL
    #[arg(short, long, default_value = config::DEFAULT_ENDPOINT,
          help = "Prediction endpoint URL")]
    endpoint: String,

    /// Request timeout (supports seconds and minutes)
    #[arg(short, long, default_value = "30s",
          help = "Request timeout: 30 (seconds), 45s, 2m")]
    timeout: String,

    /// Probe the backend's health endpoint instead of analyzing
    #[arg(long, help = "Probe the backend's /health endpoint and exit")]
    check: bool,

    /// Print the raw result as JSON instead of human-readable text
    #[arg(long, help = "Emit the verdict as a JSON object")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let timeout_secs = config::parse_timeout(&args.timeout)?;
    let config = ClientConfig::new(args.endpoint, timeout_secs);
    config.validate()?;

    if args.check {
        return run_health_check(&config).await;
    }

    let Some(image) = args.image else {
        anyhow::bail!("no image given; pass a file path or use --check");
    };

    match analyze_path(&image, &config).await {
        Ok(result) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "result": result.label,
                        "confidence": format!("{:.1}", result.confidence),
                        "raw_score": result.raw_score,
                    })
                );
            } else {
                let mark = if result.verdict.is_success() { "✓" } else { "✗" };
                println!("{mark} {}: {}", result.verdict.title(), result.confidence_text());
                println!("{}", result.verdict.description());
            }
            Ok(())
        }
        Err(err) => {
            log::error!("analysis failed (severity {:?}): {err}", err.severity());
            eprintln!("{}", err.user_message());
            if err.is_retryable() {
                eprintln!("This looks transient; trying again may succeed.");
            }
            std::process::exit(1);
        }
    }
}

/// Probe `GET /health` and report the backend's state.
async fn run_health_check(config: &ClientConfig) -> Result<()> {
    let analyzer = inkcheck::Analyzer::new(config.clone())?;
    match analyzer.health().await {
        Ok(health) if health.is_healthy() => {
            println!("Backend at {} is healthy.", config.health_url());
            Ok(())
        }
        Ok(health) => {
            println!("Backend answered but reports status '{}'.", health.status);
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}
