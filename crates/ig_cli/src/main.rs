use clap::Parser;
use ig_cli::{deliver, init_logging, load_dotenv, CaptionAgent, Cli, DeliveryOutcome};
use ig_core::HistoryOutcome;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dotenv {
        Ok(Some(path)) => debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Could not load .env: {}", e),
    }

    match run(&cli).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            error!("{}", e);
            Err(e.into())
        }
        Err(e) => {
            warn!("{}", e);
            Ok(())
        }
    }
}

async fn run(cli: &Cli) -> ig_core::Result<()> {
    let agent = CaptionAgent::from_cli(cli).await?;
    let outcome = agent.run(&cli.url).await?;

    match &outcome.history {
        HistoryOutcome::Saved(_) => info!("💾 {}", outcome.history),
        HistoryOutcome::WriteFailed { .. } => warn!("{}", outcome.history),
        HistoryOutcome::NoAngle | HistoryOutcome::Unchanged(_) => debug!("{}", outcome.history),
    }

    println!("{}", outcome.result.to_pretty_json()?);

    let client = reqwest::Client::new();
    match deliver(&client, cli.webhook.as_deref(), cli.dry_run, &outcome.result).await {
        DeliveryOutcome::Skipped => debug!("Webhook delivery skipped"),
        delivered @ DeliveryOutcome::Delivered(_) => info!("📨 {}", delivered),
        failed => warn!("{}", failed),
    }

    Ok(())
}
