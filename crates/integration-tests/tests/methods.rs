mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;

const ENDPOINTS: [&str; 3] = ["/api/transcribe", "/api/analyze", "/api/generate"];

#[tokio::test]
async fn options_is_an_empty_200() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    for endpoint in ENDPOINTS {
        let resp = server
            .client()
            .request(reqwest::Method::OPTIONS, server.url(endpoint))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200, "{endpoint}");
        assert_eq!(resp.text().await.unwrap(), "", "{endpoint}");
    }
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    for endpoint in ENDPOINTS {
        for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
            let resp = server
                .client()
                .request(method.clone(), server.url(endpoint))
                .send()
                .await
                .unwrap();

            assert_eq!(resp.status(), 405, "{method} {endpoint}");

            let body: serde_json::Value = resp.json().await.unwrap();
            assert_eq!(body, serde_json::json!({ "error": "Method not allowed" }));
        }
    }
}

#[tokio::test]
async fn preflight_advertises_policy() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .request(reqwest::Method::OPTIONS, server.url("/api/generate"))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let header = |name: &str| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_default()
    };

    assert_eq!(header("access-control-allow-origin"), "*");
    assert!(header("access-control-allow-methods").contains("POST"));
    assert!(header("access-control-allow-methods").contains("OPTIONS"));
    assert_eq!(header("access-control-allow-headers").to_lowercase(), "content-type");
}

#[tokio::test]
async fn rejections_carry_allow_origin() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .get(server.url("/api/analyze"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 405);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
