use crate::config::{ClientConfig, Credentials};
use crate::models::responses::{ApiError, Response};
use crate::services::signer::{Signer, SignerError};
use log::{debug, error};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to encode request: {0}")]
    SerializationError(#[from] SignerError),

    #[error("HTTP request error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("HTTP status error: {status}")]
    HttpStatusError { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    DecodeError(#[source] serde_json::Error),
}

impl ClientError {
    /// The API's error document, when a non-200 response carried one.
    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            ClientError::HttpStatusError { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// Signed client for the REST API.
///
/// Cloning is cheap and clones share one connection pool, so a single client
/// can serve any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct Client {
    signer: Signer,
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_http_client(credentials, config, http))
    }

    /// Use a caller-built HTTP client. Only `base_url` is taken from `config`.
    pub fn with_http_client(
        credentials: Credentials,
        config: ClientConfig,
        http: reqwest::Client,
    ) -> Self {
        Client {
            signer: Signer::new(credentials),
            base_url: config
                .base_url
                .strip_suffix('/')
                .unwrap_or(config.base_url.as_str())
                .to_string(),
            http,
        }
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<P>(&self, endpoint: &str, params: &P) -> Result<Response, ClientError>
    where
        P: Serialize + ?Sized,
    {
        self.send(Method::GET, endpoint, params).await
    }

    pub async fn post<P>(&self, endpoint: &str, params: &P) -> Result<Response, ClientError>
    where
        P: Serialize + ?Sized,
    {
        self.send(Method::POST, endpoint, params).await
    }

    pub async fn delete<P>(&self, endpoint: &str, params: &P) -> Result<Response, ClientError>
    where
        P: Serialize + ?Sized,
    {
        self.send(Method::DELETE, endpoint, params).await
    }

    /// Sign `params` and call `endpoint`.
    ///
    /// POST sends the form values as a urlencoded body. Every other method
    /// puts them in the query string.
    pub async fn send<P>(
        &self,
        method: Method,
        endpoint: &str,
        params: &P,
    ) -> Result<Response, ClientError>
    where
        P: Serialize + ?Sized,
    {
        let form = self.signer.encode(params)?;
        let url = self.endpoint_url(endpoint);

        debug!("Sending {} request to {}", method, url);

        let builder = self.http.request(method.clone(), url.as_str());
        let builder = if method == Method::POST {
            builder.form(&form)
        } else {
            builder.query(&form)
        };

        self.execute(builder, &method, &url).await
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
        method: &Method,
        url: &str,
    ) -> Result<Response, ClientError> {
        // Query strings carry the signature, so errors drop the request URL.
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read error body from {}: {}", url, e.without_url());
                    String::new()
                }
            };
            error!("{} {} returned {}", method, url, status);
            return Err(ClientError::HttpStatusError { status, body });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        debug!("Received {} byte response from {}", body.len(), url);

        decode_body(&body)
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    ClientError::TransportError(err.without_url())
}

fn decode_body(body: &[u8]) -> Result<Response, ClientError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Response::default());
    }

    match serde_json::from_slice::<Value>(body).map_err(ClientError::DecodeError)? {
        Value::Object(map) => Ok(Response::from(map)),
        Value::Null => Ok(Response::default()),
        other => Err(ClientError::DecodeError(<serde_json::Error as serde::de::Error>::custom(
            format!("expected a JSON object, found {}", json_kind(&other)),
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
