use altpast_config::Config;
use altpast_core::{ErrorReply, to_data_url};

use crate::{
    error::{AnalyzeError, Result},
    parse::parse_analysis,
    prompt::{SYSTEM_PROMPT, user_prompt},
    provider::{VisionProvider, openai::OpenAiVisionProvider},
    types::{AnalysisResult, AnalyzeRequest, VisionRequest},
};

/// Analysis server wrapping the configured vision provider
pub struct Server {
    /// `None` when no `OpenAI` key is configured
    provider: Option<Box<dyn VisionProvider>>,
    system_prompt: String,
    expose_details: bool,
}

impl Server {
    /// Read a photo and its story into an image generation prompt
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult> {
        let (Some(image), Some(transcription)) = (
            request.image.filter(|i| !i.is_empty()),
            request.transcription.filter(|t| !t.is_empty()),
        ) else {
            return Err(AnalyzeError::InvalidRequest(
                "Both image and transcription are required".to_string(),
            ));
        };

        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| AnalyzeError::ConfigError("OpenAI API key is not set".to_string()))?;

        let vision_request = VisionRequest {
            system_prompt: self.system_prompt.clone(),
            user_prompt: user_prompt(&transcription),
            image_url: to_data_url(&image).into_owned(),
        };

        let reply = provider.complete(vision_request).await?;

        tracing::debug!(chars = reply.len(), "analysis reply received");

        Ok(parse_analysis(&reply))
    }

    pub(crate) fn reply(&self, error: &AnalyzeError) -> ErrorReply {
        ErrorReply::new(error, self.expose_details)
    }
}

/// Builder for constructing the analysis server from configuration
pub(crate) struct AnalyzeServerBuilder<'a> {
    config: &'a Config,
}

impl<'a> AnalyzeServerBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Server {
        let openai = &self.config.openai;
        let analysis = &self.config.analysis;

        let provider = openai.credential().map(|api_key| {
            Box::new(OpenAiVisionProvider::new(api_key.clone(), &openai.base_url, analysis)) as Box<dyn VisionProvider>
        });

        if provider.is_none() {
            tracing::debug!("no OpenAI key configured, analysis requests will fail");
        }

        Server {
            provider,
            system_prompt: analysis
                .system_prompt
                .clone()
                .unwrap_or_else(|| SYSTEM_PROMPT.to_string()),
            expose_details: self.config.server.development,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;

    /// Replies with a canned completion and keeps the request
    struct Canned {
        reply: &'static str,
        seen: Mutex<Option<VisionRequest>>,
    }

    #[async_trait]
    impl VisionProvider for Arc<Canned> {
        async fn complete(&self, request: VisionRequest) -> Result<String> {
            *self.seen.lock().unwrap() = Some(request);
            Ok(self.reply.to_string())
        }
    }

    fn canned(reply: &'static str) -> Arc<Canned> {
        Arc::new(Canned {
            reply,
            seen: Mutex::new(None),
        })
    }

    fn server(provider: Option<Box<dyn VisionProvider>>) -> Server {
        Server {
            provider,
            system_prompt: SYSTEM_PROMPT.to_string(),
            expose_details: false,
        }
    }

    fn request(image: Option<&str>, transcription: Option<&str>) -> AnalyzeRequest {
        AnalyzeRequest {
            image: image.map(str::to_string),
            transcription: transcription.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn bare_base64_becomes_a_jpeg_data_url() {
        let provider = canned(r#"{"description":"d","prompt":"p","style":"s","mood":"m"}"#);
        let server = server(Some(Box::new(provider.clone())));

        let result = server.analyze(request(Some("QUJD"), Some("my story"))).await.unwrap();
        assert_eq!(result.prompt, "p");

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.image_url, "data:image/jpeg;base64,QUJD");
        assert!(seen.user_prompt.contains("\"my story\""));
        assert_eq!(seen.system_prompt, SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn data_url_is_passed_through() {
        let provider = canned("plain prompt");
        let server = server(Some(Box::new(provider.clone())));

        server
            .analyze(request(Some("data:image/png;base64,QUJD"), Some("story")))
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.image_url, "data:image/png;base64,QUJD");
    }

    #[tokio::test]
    async fn missing_or_empty_fields_are_rejected() {
        let server = server(Some(Box::new(canned("unused"))));

        for (image, transcription) in [(None, Some("story")), (Some("QUJD"), None), (Some(""), Some("story")), (Some("QUJD"), Some(""))] {
            let error = server.analyze(request(image, transcription)).await.unwrap_err();
            assert!(matches!(error, AnalyzeError::InvalidRequest(_)));
        }
    }

    #[tokio::test]
    async fn validation_comes_before_the_credential_check() {
        let server = server(None);

        let error = server.analyze(request(None, None)).await.unwrap_err();
        assert!(matches!(error, AnalyzeError::InvalidRequest(_)));

        let error = server.analyze(request(Some("QUJD"), Some("story"))).await.unwrap_err();
        assert!(matches!(error, AnalyzeError::ConfigError(_)));
    }
}
