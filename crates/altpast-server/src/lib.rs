mod cors;

use std::net::SocketAddr;

use altpast_config::Config;
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Handlers whose upstream credential is missing are still mounted and
    /// answer with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler fails to initialize
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let transcribe_state = altpast_transcribe::build_server(config)?;
        let analyze_state = altpast_analyze::build_server(config)?;
        let generate_state = altpast_generate::build_server(config)?;

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health));
        }

        app = app.merge(
            altpast_transcribe::endpoint_router(transcribe_state.max_upload_bytes()).with_state(transcribe_state),
        );

        // JSON endpoints carry base64 images
        let json_routes = Router::new()
            .merge(altpast_analyze::endpoint_router().with_state(analyze_state))
            .merge(altpast_generate::endpoint_router().with_state(generate_state))
            .layer(DefaultBodyLimit::max(config.server.body_limit));

        app = app.merge(json_routes);

        app = app.layer(TraceLayer::new_for_http());

        if config.server.cors.enabled {
            app = app.layer(cors::cors_layer(&config.server.cors));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

/// Liveness probe
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;

    const ENDPOINTS: [&str; 3] = ["/api/transcribe", "/api/analyze", "/api/generate"];

    fn router(toml: &str) -> Router {
        let config = Config::parse(toml).unwrap();
        Server::new(&config).unwrap().into_router()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn every_endpoint_answers_options_with_empty_200() {
        for uri in ENDPOINTS {
            let request = Request::builder()
                .method(Method::OPTIONS)
                .uri(uri)
                .body(Body::empty())
                .unwrap();

            let (status, _, body) = send(router(""), request).await;

            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body.is_empty(), "{uri}");
        }
    }

    #[tokio::test]
    async fn every_endpoint_rejects_get() {
        for uri in ENDPOINTS {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

            let (status, _, body) = send(router(""), request).await;

            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
            assert_eq!(body, br#"{"error":"Method not allowed"}"#, "{uri}");
        }
    }

    #[tokio::test]
    async fn browser_preflight_gets_cors_headers() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/analyze")
            .header(header::ORIGIN, "https://altpast.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let (status, headers, _) = send(router(""), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST") && methods.contains("OPTIONS"), "{methods}");

        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
        assert!(allowed.eq_ignore_ascii_case("content-type"), "{allowed}");
    }

    #[tokio::test]
    async fn error_responses_carry_allow_origin() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate")
            .header(header::ORIGIN, "https://altpast.example")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (status, headers, body) = send(router(""), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body, br#"{"error":"Both originalImage and prompt are required"}"#);
    }

    #[tokio::test]
    async fn cors_can_be_disabled() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate")
            .header(header::ORIGIN, "https://altpast.example")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (_, headers, _) = send(router("[server.cors]\nenabled = false"), request).await;

        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn health_endpoint() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, body) = send(router(""), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, _) = send(router("[server.health]\nenabled = false"), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_credentials_answer_with_config_errors() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/transcribe")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
            .body(Body::from("--x--\r\n"))
            .unwrap();

        let (status, _, body) = send(router(""), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            br#"{"error":"OpenAI API key not configured. Please set OPENAI_API_KEY environment variable."}"#
        );
    }
}
