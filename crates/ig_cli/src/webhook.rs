use std::fmt;

use ig_core::GenerationResult;
use reqwest::Client;

/// Statuses the receiving workflow answers with on success.
const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 204];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// No webhook configured, or a dry run.
    Skipped,
    Delivered(u16),
    Rejected { status: u16, body: String },
    Failed(String),
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Skipped => write!(f, "delivery skipped"),
            DeliveryOutcome::Delivered(status) => write!(f, "webhook accepted payload ({})", status),
            DeliveryOutcome::Rejected { status, body } => {
                write!(f, "webhook returned status {}: {}", status, body)
            }
            DeliveryOutcome::Failed(error) => write!(f, "webhook connection error: {}", error),
        }
    }
}

/// Posts the result to `webhook` unless there is none or this is a dry run.
/// Never fails; the outcome says what happened.
pub async fn deliver(
    client: &Client,
    webhook: Option<&str>,
    dry_run: bool,
    result: &GenerationResult,
) -> DeliveryOutcome {
    let Some(webhook) = webhook.map(str::trim).filter(|w| !w.is_empty()) else {
        return DeliveryOutcome::Skipped;
    };
    if dry_run {
        return DeliveryOutcome::Skipped;
    }

    tracing::info!("Transmitting to webhook: {}", webhook);

    let response = match client.post(webhook).json(result).send().await {
        Ok(response) => response,
        Err(e) => return DeliveryOutcome::Failed(e.to_string()),
    };

    let status = response.status().as_u16();
    if ACCEPTED_STATUSES.contains(&status) {
        DeliveryOutcome::Delivered(status)
    } else {
        let body = response.text().await.unwrap_or_default();
        DeliveryOutcome::Rejected { status, body }
    }
}
