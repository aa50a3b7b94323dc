use std::time::Instant;

use altpast_config::PredictionTarget;
use altpast_core::http_client;
use altpast_telemetry::metrics::record_upstream_call;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use url::Url;

use crate::{error::GenerateError, types::Prediction};

use super::PredictionProvider;

/// Replicate predictions API
pub(crate) struct ReplicateProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    target: PredictionTarget,
}

impl ReplicateProvider {
    pub fn new(api_key: SecretString, base_url: &Url, target: PredictionTarget) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
            target,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            http::header::AUTHORIZATION,
            format!("Token {}", self.api_key.expose_secret()),
        )
    }

    async fn send(&self, request: RequestBuilder, operation: &'static str) -> crate::error::Result<Response> {
        let start = Instant::now();

        let response = self.authorized(request).send().await.map_err(|e| {
            record_upstream_call("replicate", operation, start, "error");
            GenerateError::ConnectionError(format!("Failed to send request to Replicate: {e}"))
        })?;

        record_upstream_call("replicate", operation, start, response.status().as_str());

        Ok(response)
    }
}

async fn parse_prediction(response: Response) -> crate::error::Result<Prediction> {
    response
        .json()
        .await
        .map_err(|e| GenerateError::InvalidResponse(format!("Failed to parse prediction: {e}")))
}

#[async_trait]
impl PredictionProvider for ReplicateProvider {
    async fn create_prediction(&self, input: Map<String, Value>) -> crate::error::Result<Prediction> {
        let (url, body) = match &self.target {
            PredictionTarget::Version(version) => (
                format!("{}/predictions", self.base_url),
                serde_json::json!({ "version": version, "input": input }),
            ),
            PredictionTarget::Model { owner, name } => (
                format!("{}/models/{owner}/{name}/predictions", self.base_url),
                serde_json::json!({ "input": input }),
            ),
        };

        tracing::debug!(url = %url, "creating Replicate prediction");

        let response = self.send(self.client.post(&url).json(&body), "create_prediction").await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(GenerateError::ProviderApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let prediction = parse_prediction(response).await?;

        tracing::debug!(id = %prediction.id, status = %prediction.status, "prediction created");

        Ok(prediction)
    }

    async fn get_prediction(&self, id: &str) -> crate::error::Result<Prediction> {
        let url = format!("{}/predictions/{id}", self.base_url);

        let response = self.send(self.client.get(&url), "get_prediction").await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(GenerateError::StatusCheckFailed {
                status: status.as_u16(),
                message: error_text,
            });
        }

        parse_prediction(response).await
    }
}
