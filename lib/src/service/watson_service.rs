
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE}, Client};
use serde_json::json;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use super::normalizer::RawServiceResponse;

const MODEL_ID_HEADER: &str = "grpc-metadata-mm-model-id";


/// Network side of emotion detection: sends text, hands back the raw answer.
#[async_trait]
pub trait EmotionPredictor: Send + Sync {
    async fn predict(&self, text: &str) -> Result<RawServiceResponse>;
}


#[derive(Debug, Clone)]
pub struct WatsonService {
    client: Client,
    endpoint: String,
    headers: HeaderMap
}

impl WatsonService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(MODEL_ID_HEADER),
            HeaderValue::from_str(&config.model_id).context("Invalid model id header value")?
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Error building http client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.to_owned(),
            headers
        })
    }
}

#[async_trait]
impl EmotionPredictor for WatsonService {
    async fn predict(&self, text: &str) -> Result<RawServiceResponse> {
        let body = json!({
            "raw_document": {
                "text": text
            }
        });

        let response = self.client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .body(serde_json::to_string(&body)?)
            .send()
            .await
            .with_context(|| format!("Error calling emotion service at {}", self.endpoint))?;

        let status_code = response.status().as_u16();
        let body_string = response.text().await.context("Error reading emotion service response")?;
        info!(status_code, "emotion service responded");
        debug!("response_body: {}", body_string);

        Ok(RawServiceResponse::new(status_code, body_string))
    }
}
