use std::time::Duration;

use anyhow::{Context, Result};

use crate::env_keys::{BIND_ADDRESS, EMOTION_ENDPOINT, EMOTION_MODEL_ID, EMOTION_TIMEOUT_SECS};

pub const DEFAULT_ENDPOINT: &str =
    "https://sn-watson-emotion.labs.skills.network/v1/watson.runtime.nlp.v1/NlpService/EmotionPredict";
pub const DEFAULT_MODEL_ID: &str = "emotion_aggregated-workflow_lang_en_stock";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub model_id: String,
    pub timeout: Duration,
    pub bind_address: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model_id: DEFAULT_MODEL_ID.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
        }
    }
}

impl ServiceConfig {
    /// Reads the process environment (and a `.env` file, if one was loaded).
    /// Unset keys fall back to the defaults; a timeout that is not a whole
    /// number of seconds is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = match lookup(EMOTION_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .with_context(|| format!("{} must be a positive whole number of seconds, got {:?}", EMOTION_TIMEOUT_SECS, raw))?;
                Duration::from_secs(secs)
            },
            None => defaults.timeout,
        };

        Ok(Self {
            endpoint: lookup(EMOTION_ENDPOINT).unwrap_or(defaults.endpoint),
            model_id: lookup(EMOTION_MODEL_ID).unwrap_or(defaults.model_id),
            timeout,
            bind_address: lookup(BIND_ADDRESS).unwrap_or(defaults.bind_address),
        })
    }
}
