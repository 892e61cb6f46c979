pub static EMOTION_ENDPOINT: &str = "EMOTION_ENDPOINT";
pub static EMOTION_MODEL_ID: &str = "EMOTION_MODEL_ID";
pub static EMOTION_TIMEOUT_SECS: &str = "EMOTION_TIMEOUT_SECS";

pub static BIND_ADDRESS: &str = "BIND_ADDRESS";
