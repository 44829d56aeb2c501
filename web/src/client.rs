use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("could not reach the counter service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("counter service answered {status}: {message}")]
    Status { status: u16, message: String },
}

/// The two calls the landing page makes against `/api/counter`.
pub trait CounterApi {
    fn fetch_count(&self) -> impl Future<Output = Result<u64, ClientError>>;
    fn register_interest(&self) -> impl Future<Output = Result<u64, ClientError>>;
}

#[derive(Deserialize)]
struct CountBody {
    count: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct HttpCounterApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCounterApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/counter", base_url.trim_end_matches('/')),
        }
    }

    /// Talks to the server that delivered the page.
    #[cfg(target_arch = "wasm32")]
    pub fn same_origin() -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self::new(&origin)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn read_count(response: reqwest::Response) -> Result<u64, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<CountBody>().await?.count);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl CounterApi for HttpCounterApi {
    async fn fetch_count(&self) -> Result<u64, ClientError> {
        let response = self.client.get(&self.endpoint).send().await?;
        Self::read_count(response).await
    }

    async fn register_interest(&self) -> Result<u64, ClientError> {
        let response = self.client.post(&self.endpoint).send().await?;
        Self::read_count(response).await
    }
}
