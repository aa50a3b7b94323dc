//! One-shot analyze and generate for a local photo

use std::{path::Path, time::Instant};

use altpast_analyze::AnalyzeRequest;
use altpast_config::Config;
use altpast_generate::GenerateRequest;
use anyhow::Context;
use base64::Engine;

use crate::args::ReimagineArgs;

/// Run the analysis and generation stages and save the result
pub async fn run(config: &Config, args: &ReimagineArgs) -> anyhow::Result<()> {
    let analyzer = altpast_analyze::build_server(config)?;
    let generator = altpast_generate::build_server(config)?;

    let image = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("failed to read image {}", args.image.display()))?;

    let image = data_url(&args.image, &image);
    let total = Instant::now();

    let stage = Instant::now();
    let analysis = analyzer
        .analyze(AnalyzeRequest {
            image: Some(image.clone()),
            transcription: Some(args.story.clone()),
        })
        .await
        .context("image analysis failed")?;

    tracing::info!(
        elapsed_ms = stage.elapsed().as_millis(),
        prompt = %analysis.prompt,
        "analysis complete"
    );

    let stage = Instant::now();
    let generated = generator
        .generate(GenerateRequest {
            original_image: Some(image),
            prompt: Some(analysis.prompt),
        })
        .await
        .context("image generation failed")?;

    tracing::info!(
        elapsed_ms = stage.elapsed().as_millis(),
        prediction_id = %generated.prediction_id,
        image_url = %generated.image_url,
        "generation complete"
    );

    let bytes = altpast_core::http_client()
        .get(&generated.image_url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .context("failed to download generated image")?
        .bytes()
        .await
        .context("failed to read generated image")?;

    tokio::fs::write(&args.output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(
        total_ms = total.elapsed().as_millis(),
        output = %args.output.display(),
        bytes = bytes.len(),
        "reimagined image saved"
    );

    Ok(())
}

/// Encode a local image as a `data:` URL, typed by file extension
fn data_url(path: &Path, bytes: &[u8]) -> String {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    };

    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_follows_extension() {
        assert_eq!(data_url(Path::new("a.PNG"), b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(data_url(Path::new("a.webp"), b"abc"), "data:image/webp;base64,YWJj");
        assert_eq!(data_url(Path::new("a.jpeg"), b"abc"), "data:image/jpeg;base64,YWJj");
        assert_eq!(data_url(Path::new("photo"), b"abc"), "data:image/jpeg;base64,YWJj");
    }

    #[tokio::test]
    async fn missing_image_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let args = ReimagineArgs {
            image: dir.path().join("missing.jpg"),
            story: "story".to_string(),
            output: dir.path().join("out.png"),
        };

        let error = run(&Config::default(), &args).await.unwrap_err();

        assert!(format!("{error}").contains("missing.jpg"), "{error}");
    }
}
