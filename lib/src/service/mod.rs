pub mod common_structs;
pub mod normalizer;
pub mod watson_service;

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::config::ServiceConfig;
use common_structs::EmotionReport;
use normalizer::{normalize, NormalizeError};
use watson_service::{EmotionPredictor, WatsonService};


#[derive(Debug, Error)]
pub enum DetectionError {
    /// The emotion service could not be reached or did not answer in time.
    #[error(transparent)]
    Service(#[from] anyhow::Error),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}


#[derive(Clone)]
pub struct CommonService {
    pub predictor: Arc<dyn EmotionPredictor>,
}

impl CommonService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let watson = WatsonService::new(config)?;
        Ok(Self::with_predictor(Arc::new(watson)))
    }

    pub fn with_predictor(predictor: Arc<dyn EmotionPredictor>) -> Self {
        Self { predictor }
    }

    pub async fn emotion_detector(&self, text: &str) -> Result<EmotionReport, DetectionError> {
        let response = self.predictor.predict(text).await?;
        let report = normalize(&response)?;
        info!(dominant = ?report.dominant_emotion(), "emotion detection finished");
        Ok(report)
    }
}
