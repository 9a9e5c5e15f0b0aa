//! `nurseai retry`: drive the client retry workflow from the terminal.

use super::RetryCommands;
use nurseai::{
    JsonError, NurseAiConfig, NurseAiResult, RetryCoordinator, RetryNotice, RetryState,
    SuggestionExtractor,
};
use std::sync::Arc;
use std::time::Duration;

/// Handle the `retry` subcommands
pub async fn handle_retry_command(config: &NurseAiConfig, command: RetryCommands) -> NurseAiResult<()> {
    let mut client = config.client().clone();
    if let Some(url) = command.backend_url() {
        client = client.with_backend_url(url);
    }
    let max_attempts = *client.max_attempts();

    let coordinator =
        RetryCoordinator::from_config(client, Arc::new(SuggestionExtractor::bundled()?))?;
    let state = coordinator.resume().await?;

    match command {
        RetryCommands::Status { json: true, .. } => {
            let rendered =
                serde_json::to_string_pretty(&state).map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", rendered);
        }
        RetryCommands::Status { .. } => {
            println!(
                "{}",
                describe_state(&state, coordinator.time_remaining(), max_attempts)
            );
        }
        RetryCommands::Now { .. } => {
            let notice = coordinator.retry_now().await?;
            println!("{}", notice.message());
            if let RetryNotice::Completed { suggestion, .. } = &notice {
                println!("\n{}", suggestion.content());
            }
        }
        RetryCommands::Clear { .. } => {
            coordinator.clear().await?;
            println!("Pending retry discarded.");
        }
    }
    Ok(())
}

fn describe_state(state: &RetryState, remaining: Duration, max_attempts: u32) -> String {
    match state {
        RetryState::Idle => RetryNotice::NoPendingRetry.message(),
        RetryState::RateLimited(ticket) => {
            let wait = if remaining.is_zero() {
                "ready to retry".to_string()
            } else {
                format!("retry in {}s", remaining.as_secs_f64().ceil() as u64)
            };
            format!(
                "Pending retry for {}: {} of {} retries used, {}, expires {}",
                ticket.target_id(),
                ticket.attempts(),
                max_attempts,
                wait,
                ticket.expires_at().to_rfc3339()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurseai::{RetryTicket, TargetId};

    #[test]
    fn idle_state_reads_as_nothing_pending() {
        assert_eq!(
            describe_state(&RetryState::Idle, Duration::ZERO, 3),
            "No retry is pending."
        );
    }

    #[test]
    fn pending_state_rounds_the_wait_up() {
        let now = "2026-01-05T10:00:00Z".parse().unwrap();
        let expires = "2026-01-05T10:30:00Z".parse().unwrap();
        let ticket = RetryTicket::new(TargetId::from("rec-7"), 1, now, expires);
        let state = RetryState::RateLimited(ticket);

        let waiting = describe_state(&state, Duration::from_millis(41_200), 3);
        assert_eq!(
            waiting,
            "Pending retry for rec-7: 1 of 3 retries used, retry in 42s, expires 2026-01-05T10:30:00+00:00"
        );

        let ready = describe_state(&state, Duration::ZERO, 3);
        assert!(ready.contains("ready to retry"));
    }
}
