use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;
use travel_backend::{server, types::Environment, upload_storage::SharedSigner};

/// Setup test environment: tracing only, no storage variables are read
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router under test with an optional signer
pub struct TestSetup {
    pub router: Router,
    pub environment: Environment,
}

impl TestSetup {
    pub fn new(upload_signer: Option<SharedSigner>) -> Self {
        Self::with_environment(
            Environment::Development {
                presign_expiry_override: None,
            },
            upload_signer,
        )
    }

    pub fn with_environment(environment: Environment, upload_signer: Option<SharedSigner>) -> Self {
        setup_test_env();

        let router = server::router(&environment, upload_signer);

        Self {
            router,
            environment,
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_raw_post_request(route, "application/json", payload.to_string())
            .await
    }

    pub async fn send_raw_post_request(
        &self,
        route: &str,
        content_type: &str,
        body: String,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
