//! Mocked upstream AI services

use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mocked `OpenAI` API (Whisper and chat completions)
pub struct MockOpenAi {
    server: MockServer,
}

impl MockOpenAi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL including the `/v1` prefix
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Answer transcription requests with `text`
    pub async fn transcribes_as(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": text })))
            .mount(&self.server)
            .await;
    }

    /// Answer chat completions with `content` as the assistant message
    pub async fn completes_with(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail every request with `status`
    pub async fn fails_with(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far
    pub async fn request_bodies(&self) -> Vec<Vec<u8>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| request.body)
            .collect()
    }
}

/// Mocked Replicate predictions API
pub struct MockReplicate {
    server: MockServer,
}

impl MockReplicate {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL including the `/v1` prefix
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Accept prediction creation at `create_path`, returning `status`
    pub async fn creates(&self, create_path: &str, id: &str, status: &str) {
        Mock::given(method("POST"))
            .and(path(create_path))
            .and(header("authorization", "Token r8-test"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": id,
                "status": status
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer the next `times` status checks for `id` with `body`
    ///
    /// Later mounts take over once earlier ones are used up.
    pub async fn polls(&self, id: &str, body: serde_json::Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/predictions/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Answer every status check for `id` with `body`
    pub async fn always_polls(&self, id: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/predictions/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Number of status checks received
    pub async fn status_checks(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.as_str() == "GET")
            .count()
    }

    /// JSON body of the prediction creation request
    pub async fn created_with(&self) -> serde_json::Value {
        let requests = self.server.received_requests().await.unwrap_or_default();
        let create = requests
            .iter()
            .find(|request| request.url.path().ends_with("/predictions") && request.method.as_str() == "POST")
            .expect("a prediction was created");

        serde_json::from_slice(&create.body).expect("creation body is JSON")
    }

    /// Status checks for any prediction fail with `status`
    pub async fn status_checks_fail(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/v1/predictions/.+$"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}
