//! Registration service client.
//!
//! This crate provides a lightweight client for the remote registration
//! endpoint. It focuses on:
//!
//! - Constructing an HTTP client with a request timeout and default headers
//! - Resolving the bearer token from configuration or secret storage
//! - Validating the configured base URL for safety
//! - Classifying responses into logical outcomes or transport failures
//!
//! The primary entry point is [`RegistrationClient`], which implements the
//! [`RegistrationService`] seam the wizard engine submits through.

use std::env;

use async_trait::async_trait;
use enroll_types::{RegistrationResponse, SubmissionPayload};
use enroll_util::{ClientConfig, ConfigError};
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Hostnames allowed to use plain HTTP, for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];
/// Longest response body excerpt kept in error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors raised while building the client or talking to the service.
///
/// Every variant other than [`ApiError::Config`] and
/// [`ApiError::InvalidBaseUrl`] is a transport failure from the wizard's
/// point of view: no logical answer was obtained.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid registration base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("registration token contains characters not allowed in a header")]
    InvalidToken,

    #[error("request to registration service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from registration service ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("registration request did not complete: {0}")]
    Interrupted(String),
}

/// The HTTP collaborator the submission lifecycle posts payloads to.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Post the payload and return the service's logical answer.
    async fn register(&self, payload: &SubmissionPayload) -> Result<RegistrationResponse, ApiError>;
}

/// Thin wrapper around a configured `reqwest::Client` for the registration endpoint.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    pub register_url: String,
    pub http: Client,
    pub user_agent: String,
    /// Whether an `Authorization` header is installed on every request.
    pub authenticated: bool,
}

impl RegistrationClient {
    /// Build a client from loaded configuration.
    ///
    /// The base URL must use HTTPS unless it points at localhost. The bearer
    /// token is resolved once here and installed as a default header.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        let token = config.resolve_token()?;
        let authenticated = token.is_some();
        match token {
            Some(api_token) => {
                let authorization_header_value = format!("Bearer {}", api_token);
                let mut value =
                    header::HeaderValue::from_str(&authorization_header_value).map_err(|_| ApiError::InvalidToken)?;
                value.set_sensitive(true);
                default_headers.insert(header::AUTHORIZATION, value);
            }
            None => warn!("no registration token configured; requests will be unauthenticated"),
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            register_url: config.register_url(),
            http,
            user_agent: format!("enroll/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            authenticated,
        })
    }

    /// Build the registration POST without sending it.
    ///
    /// Used directly by dry runs so the exact request can be previewed. The
    /// default headers (including `Authorization`) are applied by the client
    /// at send time and are not part of the built request.
    pub fn request(&self, payload: &SubmissionPayload) -> RequestBuilder {
        debug!(url = %self.register_url, "building registration request");
        self.http
            .post(&self.register_url)
            .header(header::USER_AGENT, &self.user_agent)
            .json(payload)
    }
}

#[async_trait]
impl RegistrationService for RegistrationClient {
    async fn register(&self, payload: &SubmissionPayload) -> Result<RegistrationResponse, ApiError> {
        let response = self.request(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "registration service responded");
        classify_response(status, &body)
    }
}

/// Turn a raw HTTP answer into a logical response or a transport failure.
///
/// A JSON object carrying `success` or `msg` is a logical answer whatever the
/// status code, so the server's message reaches the user. Only a 2xx status
/// can be a success; on any other status the answer is a failure even when
/// the body claims `success: true`. Any other object is accepted only on a
/// 2xx status; everything else is unexpected.
fn classify_response(status: StatusCode, body: &str) -> Result<RegistrationResponse, ApiError> {
    let unexpected = || ApiError::UnexpectedResponse {
        status: status.as_u16(),
        body: body.chars().take(BODY_EXCERPT_LEN).collect(),
    };

    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) else {
        return Err(unexpected());
    };
    let has_known_keys = object.contains_key("success") || object.contains_key("msg");
    if !status.is_success() && !has_known_keys {
        return Err(unexpected());
    }
    let mut response: RegistrationResponse = serde_json::from_value(Value::Object(object)).map_err(|_| unexpected())?;
    if !status.is_success() && response.is_success() {
        warn!(status = status.as_u16(), "error status reported success; treating as failure");
        response.success = Some(false);
    }
    Ok(response)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed_base_url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("must include a host".to_string()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::net::TcpListener;
    use serde_json::json;

    fn config_for(base_url: String, token: Option<&str>) -> ClientConfig {
        ClientConfig {
            base_url,
            token: token.map(str::to_string),
            timeout_secs: 5,
            ..ClientConfig::default()
        }
    }

    fn sample_payload() -> SubmissionPayload {
        SubmissionPayload {
            email: "a@b.com".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            password: "abcde".into(),
            kind: "dealer".into(),
            company: "Acme".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
            country: "US".into(),
            user_type: "admin".into(),
        }
    }

    #[tokio::test]
    async fn register_posts_payload_with_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/users/register")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJson(json!({
                "email": "a@b.com",
                "firstName": "A",
                "type": "dealer",
                "userType": "admin"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"msg":"Created"}"#)
            .create_async()
            .await;

        let client = RegistrationClient::from_config(&config_for(server.url(), Some("test-token"))).expect("client builds");
        let response = client.register(&sample_payload()).await.expect("service answers");

        mock.assert_async().await;
        assert!(response.is_success());
        assert_eq!(response.message(), "Created");
    }

    #[tokio::test]
    async fn logical_failure_on_error_status_keeps_server_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/users/register")
            .with_status(409)
            .with_body(r#"{"success":false,"msg":"Email taken"}"#)
            .create_async()
            .await;

        let client = RegistrationClient::from_config(&config_for(server.url(), Some("t"))).expect("client builds");
        let response = client.register(&sample_payload()).await.expect("logical answer");
        assert!(!response.is_success());
        assert_eq!(response.message(), "Email taken");
    }

    #[tokio::test]
    async fn non_json_body_is_a_transport_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/users/register")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = RegistrationClient::from_config(&config_for(server.url(), None)).expect("client builds");
        let error = client.register(&sample_payload()).await.expect_err("malformed body");
        assert!(matches!(error, ApiError::UnexpectedResponse { status: 502, .. }));
    }

    #[tokio::test]
    async fn error_status_never_counts_as_success() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/users/register")
            .with_status(500)
            .with_body(r#"{"success":true,"msg":"boom"}"#)
            .create_async()
            .await;

        let client = RegistrationClient::from_config(&config_for(server.url(), Some("t"))).expect("client builds");
        let response = client.register(&sample_payload()).await.expect("logical answer");
        assert!(!response.is_success());
        assert_eq!(response.message(), "boom");
    }

    #[tokio::test]
    async fn unresponsive_server_times_out() {
        // Bound but never accepted: the connection queues and no reply arrives.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let config = ClientConfig {
            timeout_secs: 1,
            ..config_for(base_url, None)
        };

        let client = RegistrationClient::from_config(&config).expect("client builds");
        let error = client.register(&sample_payload()).await.expect_err("request times out");
        assert!(matches!(error, ApiError::Transport(_)), "expected transport error, got {error:?}");
        drop(listener);
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let address = listener.local_addr().expect("local addr");
        drop(listener);

        let client =
            RegistrationClient::from_config(&config_for(format!("http://{address}"), None)).expect("client builds");
        let error = client.register(&sample_payload()).await.expect_err("connection refused");
        assert!(matches!(error, ApiError::Transport(_)));
    }

    #[test]
    fn classify_forces_failure_on_error_status() {
        let response =
            classify_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"success":true,"msg":"boom"}"#).expect("logical");
        assert_eq!(response.success, Some(false));
        assert_eq!(response.message(), "boom");
    }

    #[test]
    fn classify_accepts_object_without_flag_on_success_status() {
        let response = classify_response(StatusCode::OK, "{}").expect("object accepted");
        assert!(!response.is_success());
    }

    #[test]
    fn classify_rejects_unknown_object_on_error_status() {
        let error = classify_response(StatusCode::NOT_FOUND, r#"{"error":"missing"}"#).expect_err("rejected");
        assert!(matches!(error, ApiError::UnexpectedResponse { status: 404, .. }));
    }

    #[test]
    fn plain_http_is_rejected_for_remote_hosts() {
        assert!(validate_base_url("https://renting-api.onrender.com").is_ok());
        assert!(validate_base_url("http://localhost:3000").is_ok());
        let error = validate_base_url("http://renting-api.onrender.com").expect_err("http rejected");
        assert!(matches!(error, ApiError::InvalidBaseUrl { .. }));
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn request_preview_targets_register_endpoint() {
        let client = RegistrationClient::from_config(&config_for("http://localhost:4000/".into(), Some("tok")))
            .expect("client builds");
        let request = client.request(&sample_payload()).build().expect("request builds");
        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:4000/users/register");
        assert!(request.headers().contains_key(header::USER_AGENT));
        assert!(client.authenticated);
    }
}
