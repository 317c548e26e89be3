use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::{Context, OptionExt, Result, eyre};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use url::Url;

pub mod auth;
pub mod parsers;
pub mod playlist;
pub mod search;
pub mod types;

pub use auth::{BrowserCredentials, SetupError};

pub const YTM_DOMAIN: &str = "https://music.youtube.com";
pub const YTM_BASE_API: &str = "https://music.youtube.com/youtubei/v1/";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:88.0) Gecko/20100101 Firefox/88.0";

/// Authenticated session against the YouTube Music web API.
///
/// Holds nothing mutable: a pooled `reqwest::Client` and the credential
/// headers. Safe to share between concurrent requests.
pub struct YtMusic {
    client: Client,
    credentials: BrowserCredentials,
    headers: HeaderMap,
    sapisid: String,
    timeout: Duration,
}

impl YtMusic {
    pub fn new(credentials: BrowserCredentials, timeout: Duration) -> Result<Self> {
        let sapisid = credentials
            .sapisid()
            .ok_or_eyre("Credentials cookie is missing __Secure-3PAPISID")?;
        let headers = credentials.header_map()?;
        let client = Client::builder()
            .user_agent(credentials.get("user-agent").unwrap_or(USER_AGENT))
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            client,
            credentials,
            headers,
            sapisid,
            timeout,
        })
    }

    pub fn from_credentials_file(path: &Path, timeout: Duration) -> Result<Self> {
        if !path.exists() {
            return Err(eyre!(
                "{} not found. Please run setup first.",
                path.display()
            ));
        }
        let credentials = BrowserCredentials::from_file(path)?;
        Self::new(credentials, timeout)
    }

    fn context() -> Value {
        json!({
            "client": {
                "clientName": "WEB_REMIX",
                "clientVersion": format!("1.{}.01.00", Utc::now().format("%Y%m%d")),
                "hl": "en"
            },
            "user": {}
        })
    }

    fn request_headers(&self) -> Result<HeaderMap> {
        let timestamp = Utc::now().timestamp();
        let origin = self.credentials.origin();
        let mut headers = self.headers.clone();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth::sapisid_authorization(
                &self.sapisid,
                origin,
                timestamp,
            ))?,
        );
        headers.insert("x-origin", HeaderValue::from_str(origin)?);
        headers.insert(
            "x-goog-request-time",
            HeaderValue::from_str(&timestamp.to_string())?,
        );
        Ok(headers)
    }

    /// POST `body` (plus the client context) to `youtubei/v1/{endpoint}`.
    pub(crate) async fn send_request(
        &self,
        endpoint: &str,
        mut body: Value,
        params: &[(&str, &str)],
    ) -> Result<Value> {
        let mut url = Url::parse(YTM_BASE_API)?.join(endpoint)?;
        url.query_pairs_mut()
            .append_pair("alt", "json")
            .extend_pairs(params);

        if let Some(object) = body.as_object_mut() {
            object.insert("context".to_string(), Self::context());
        }

        tracing::debug!(endpoint, "Sending YouTube Music request");
        let response = self
            .client
            .post(url)
            .headers(self.request_headers()?)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .wrap_err_with(|| format!("Request to {endpoint} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|error| {
                    error
                        .pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(eyre!(
                "Server returned HTTP {}: {}",
                status.as_u16(),
                message
            ));
        }

        response
            .json::<Value>()
            .await
            .wrap_err_with(|| format!("Failed to decode {endpoint} response"))
    }
}
