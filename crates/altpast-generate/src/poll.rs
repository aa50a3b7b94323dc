//! Waiting for a prediction to reach a terminal state

use std::time::Duration;

use altpast_telemetry::metrics::record_generation;

use crate::{
    error::{GenerateError, Result},
    provider::PredictionProvider,
    types::{Prediction, PredictionStatus},
};

/// Pacing of status checks
#[derive(Debug, Clone, Copy)]
pub(crate) struct PollSettings {
    pub interval: Duration,
    /// Status checks allowed before giving up
    pub max_attempts: u32,
}

/// A prediction that finished with an image
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Completed {
    pub prediction_id: String,
    pub image_url: String,
}

/// Poll `prediction` until it leaves `starting`/`processing`
///
/// Status checks run strictly one after another, each preceded by a sleep of
/// `settings.interval`. A failed status check ends the loop.
pub(crate) async fn wait_for_output(
    provider: &dyn PredictionProvider,
    mut prediction: Prediction,
    settings: PollSettings,
) -> Result<Completed> {
    let mut attempts = 0;

    let outcome = loop {
        let status = prediction.status();

        match status {
            Some(status) if status.is_running() => {
                if attempts >= settings.max_attempts {
                    break Err(GenerateError::Timeout { attempts });
                }

                tokio::time::sleep(settings.interval).await;

                match provider.get_prediction(&prediction.id).await {
                    Ok(next) => prediction = next,
                    Err(e) => break Err(e),
                }

                attempts += 1;

                tracing::debug!(id = %prediction.id, status = %prediction.status, attempts, "polled prediction");
            }
            Some(PredictionStatus::Succeeded) => break completed(prediction),
            Some(PredictionStatus::Failed) => break Err(GenerateError::GenerationFailed(prediction.error_message())),
            _ => break Err(GenerateError::UnexpectedState(prediction.status)),
        }
    };

    record_generation(outcome_label(&outcome), attempts);

    outcome
}

fn completed(prediction: Prediction) -> Result<Completed> {
    let image_url = prediction
        .output
        .as_ref()
        .and_then(|output| output.first())
        .ok_or_else(|| GenerateError::UnexpectedState("succeeded without output".to_string()))?
        .to_string();

    Ok(Completed {
        prediction_id: prediction.id,
        image_url,
    })
}

fn outcome_label(outcome: &Result<Completed>) -> &'static str {
    match outcome {
        Ok(_) => "succeeded",
        Err(GenerateError::Timeout { .. }) => "timeout",
        Err(GenerateError::GenerationFailed(_)) => "failed",
        Err(GenerateError::UnexpectedState(_)) => "unexpected_state",
        Err(_) => "upstream_error",
    }
}
