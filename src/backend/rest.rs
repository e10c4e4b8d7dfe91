//! [`Backend`] over JSON/HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Backend, Histogram};
use crate::config::BackendConfig;
use crate::errors::BackendError;
use crate::style::{ColorPoint, Style};

pub struct RestBackend {
    client: Client,
    base_url: Url,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Base URL extended by percent-encoded path segments
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} answered {}", url, status);

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn create_style(&self, style: &Style) -> Result<Style, BackendError> {
        let url = self.endpoint(&["styles"])?;
        debug!("Creating style {} at {}", style.name, url);
        self.send_json(self.client.post(url.clone()).json(style), &url)
            .await
    }

    async fn update_style(&self, style: &Style) -> Result<Style, BackendError> {
        let url = self.endpoint(&["styles", style.name.as_str()])?;
        debug!("Updating style {} at {}", style.name, url);
        self.send_json(self.client.put(url.clone()).json(style), &url)
            .await
    }

    async fn get_palette(
        &self,
        style_name: &str,
        rule_name: &str,
        interval: u32,
    ) -> Result<Vec<ColorPoint>, BackendError> {
        let mut url = self.endpoint(&["styles", style_name, "rules", rule_name, "palette"])?;
        url.query_pairs_mut()
            .append_pair("interval", &interval.to_string());
        self.send_json(self.client.get(url.clone()), &url).await
    }

    async fn get_histogram(&self, data_id: &str) -> Result<Histogram, BackendError> {
        let url = self.endpoint(&["data", data_id, "histogram"])?;
        self.send_json(self.client.get(url.clone()), &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> RestBackend {
        RestBackend::new(&BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoints_encode_segments() {
        let backend = backend("http://localhost:8180/API/");
        let url = backend.endpoint(&["styles", "my style"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8180/API/styles/my%20style");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = RestBackend::new(&BackendConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn unreachable_server_reports_transport_error() {
        let backend = backend("http://127.0.0.1:9/API");
        let err = backend.get_histogram("dem").await.unwrap_err();
        assert!(!err.is_rejection());
    }
}
