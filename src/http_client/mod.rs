mod sites;

use log::debug;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use sites::{Site, SitesList};

pub const DEFAULT_API_URL: &'static str = "https://api.kinsta.com/v2";

#[derive(Error, Debug)]
pub enum KinstaError {
    #[error("{0}")]
    Request(reqwest::Error),
    #[error("Failed to read response: {0}")]
    Body(reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("Unexpected or malformed response from Kinsta: {0}")]
    Decode(#[from] serde_json::Error)
}

type Result<T> = std::result::Result<T, KinstaError>;

/// Fields every Kinsta response may carry next to its payload
#[derive(Deserialize, Debug)]
struct ApiEnvelope {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(flatten)]
    payload: Map<String, Value>
}

impl ApiEnvelope {
    /// error reported by the API, if any.
    /// `message` only counts on a non-200 status; `error` always does
    fn error_message(&self, status: StatusCode) -> Option<&str> {
        fn non_empty(v: &Option<Value>) -> Option<&str> {
            v.as_ref()
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        }

        if status != StatusCode::OK {
            if let Some(msg) = non_empty(&self.message) {
                return Some(msg);
            }
        }
        non_empty(&self.error)
    }
}

/// Decode a response body, surfacing API-reported errors first
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    let envelope: ApiEnvelope = serde_json::from_slice(body)?;
    if let Some(msg) = envelope.error_message(status) {
        return Err(KinstaError::Api(msg.to_string()));
    }
    Ok(serde_json::from_value(Value::Object(envelope.payload))?)
}

pub struct KinstaClient {
    client: Client,
    api_url: String
}

impl KinstaClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string()
        }
    }

    /// authenticated GET against `<api_url>/<path>`
    async fn get<T: DeserializeOwned>(&self, api_key: &str, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.api_url, path);
        debug!("GET {} {:?}", url, query);

        let res = self.client
            .get(&url)
            .query(query)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(KinstaError::Request)?;

        let status = res.status();
        debug!("Response status: {}", status);

        let body = res.bytes().await.map_err(KinstaError::Body)?;
        decode_response(status, &body)
    }

    /// all sites of a company
    pub async fn list_sites(&self, api_key: &str, company: &str) -> Result<SitesList> {
        self.get(api_key, "sites/", &[("company", company)]).await
    }
}
