//! Remote client for the products backend.

use crate::model::{BackendProduct, NewProduct};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or a non-success status.
    Network,
    /// The body did not match the expected shape.
    Decode,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{method} /products failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} /products -> {status}")]
    Status {
        method: &'static str,
        status: StatusCode,
    },

    #[error("{method} /products returned an unexpected body: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } | ApiError::Status { .. } => ErrorKind::Network,
            ApiError::Decode { .. } => ErrorKind::Decode,
        }
    }
}

/// The two operations the screen needs from a backend.
pub trait ProductApi: Send + Sync {
    fn list_products(&self) -> Result<Vec<BackendProduct>, ApiError>;

    /// The server assigns the id of the returned record.
    fn create_product(&self, product: &NewProduct) -> Result<BackendProduct, ApiError>;
}

/// HTTP implementation over a blocking reqwest client.
pub struct HttpProductApi {
    client: reqwest::blocking::Client,
    products_url: String,
}

impl HttpProductApi {
    /// `base_url` is scheme, host and port, without a trailing slash.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::builder().build()?,
            products_url: format!("{}/products", base_url.trim_end_matches('/')),
        })
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }

    fn read_body<T: serde::de::DeserializeOwned>(
        method: &'static str,
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            log::warn!("{} {} -> {}", method, response.url(), status);
            return Err(ApiError::Status { method, status });
        }
        let body = response
            .text()
            .map_err(|source| ApiError::Transport { method, source })?;
        serde_json::from_str(&body).map_err(|source| {
            log::warn!("{} /products body did not decode: {}", method, source);
            ApiError::Decode { method, source }
        })
    }
}

impl ProductApi for HttpProductApi {
    fn list_products(&self) -> Result<Vec<BackendProduct>, ApiError> {
        const METHOD: &str = "GET";
        log::debug!("{} {}", METHOD, self.products_url);
        let response = self
            .client
            .get(&self.products_url)
            .send()
            .map_err(|source| {
                log::warn!("{} {} failed: {}", METHOD, self.products_url, source);
                ApiError::Transport {
                    method: METHOD,
                    source,
                }
            })?;
        Self::read_body(METHOD, response)
    }

    fn create_product(&self, product: &NewProduct) -> Result<BackendProduct, ApiError> {
        const METHOD: &str = "POST";
        log::debug!("{} {} ({})", METHOD, self.products_url, product.title);
        let body = serde_json::to_vec(product).map_err(|source| ApiError::Decode {
            method: METHOD,
            source,
        })?;
        let response = self
            .client
            .post(&self.products_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|source| {
                log::warn!("{} {} failed: {}", METHOD, self.products_url, source);
                ApiError::Transport {
                    method: METHOD,
                    source,
                }
            })?;
        Self::read_body(METHOD, response)
    }
}
