use super::{check, ui};
use crate::core::config::FormDefaults;
use crate::core::submission::{SubmissionId, SubmissionTracker};
use crate::core::{CheckError, FormCandidate, FormInput, PriceProvider, ProfitResult, Validator};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub type Outcome = Result<(FormInput, ProfitResult), CheckError>;

pub const USAGE: &str =
    "Enter '<amount> <date>' or '<amount> <currency> <asset> <date>', or 'quit' to exit.";

/// Parses one line of input. With two words the configured currency and asset
/// are used.
pub fn parse_line(line: &str, defaults: &FormDefaults) -> Option<FormCandidate> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [amount, date] => Some(FormCandidate {
            principal: amount.to_string(),
            currency: defaults.currency.clone(),
            asset: defaults.asset.clone(),
            past_date: date.to_string(),
        }),
        [amount, currency, asset, date] => Some(FormCandidate {
            principal: amount.to_string(),
            currency: currency.to_string(),
            asset: asset.to_string(),
            past_date: date.to_string(),
        }),
        _ => None,
    }
}

fn render_outcome(id: SubmissionId, outcome: &Outcome) -> String {
    let body = match outcome {
        Ok((input, result)) => check::render_result(input, result)
            .unwrap_or_else(|e| ui::style_text(&e.to_string(), ui::StyleType::Error)),
        Err(e) => check::render_error(e),
    };
    format!(
        "{}\n{body}",
        ui::style_text(&format!("Submission {id}"), ui::StyleType::Subtle)
    )
}

fn submit(
    candidate: FormCandidate,
    tracker: &Arc<SubmissionTracker<Outcome>>,
    validator: &Validator,
    provider: &Arc<dyn PriceProvider + Send + Sync>,
) -> JoinHandle<()> {
    let id = tracker.begin();
    let today = chrono::Utc::now().date_naive();
    debug!(submission = %id, ?candidate, "Starting submission");

    let tracker = Arc::clone(tracker);
    let validator = validator.clone();
    let provider = Arc::clone(provider);
    tokio::spawn(async move {
        let outcome =
            crate::core::check::check(&candidate, today, &validator, provider.as_ref()).await;
        if !tracker.publish(id, outcome) {
            return;
        }
        if let Some((published, outcome)) = tracker.current()
            && published == id
        {
            println!("{}", render_outcome(id, &outcome));
        }
    })
}

/// Reads submissions line by line. Each line supersedes the previous one, so
/// only the newest submission's outcome is shown.
pub async fn run_with_reader<R: AsyncRead + Unpin>(
    reader: R,
    provider: Arc<dyn PriceProvider + Send + Sync>,
    validator: Validator,
    defaults: &FormDefaults,
    tracker: Arc<SubmissionTracker<Outcome>>,
) -> Result<()> {
    let mut lines = BufReader::new(reader).lines();
    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match parse_line(line, defaults) {
            Some(candidate) => {
                pending.retain(|handle| !handle.is_finished());
                pending.push(submit(candidate, &tracker, &validator, &provider));
            }
            None => println!("{}", ui::style_text(USAGE, ui::StyleType::Error)),
        }
    }

    for joined in join_all(pending).await {
        if let Err(e) = joined {
            error!(error = %e, "Submission task failed");
        }
    }
    Ok(())
}

pub async fn run(
    provider: Arc<dyn PriceProvider + Send + Sync>,
    validator: Validator,
    defaults: &FormDefaults,
) -> Result<()> {
    println!("{}", ui::style_text(USAGE, ui::StyleType::Subtle));
    let tracker = Arc::new(SubmissionTracker::new());
    run_with_reader(tokio::io::stdin(), provider, validator, defaults, tracker).await
}
