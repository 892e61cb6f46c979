//! Turns a raw `EmotionPredict` response into an [`EmotionReport`].
//!
//! The service payload is loosely shaped: scores may sit at several nesting
//! depths, the whole document may be JSON encoded inside a `text` string, and
//! individual fields may be missing or mistyped. Only a body that is not JSON
//! at all is treated as a failure.

use std::borrow::Cow;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::common_structs::{EmotionReport, EmotionScores};

/// Status the service answers with when the text is blank or unanalyzable.
pub const BLANK_INPUT_STATUS: u16 = 400;

/// Candidate score locations relative to the score root, first match wins.
pub const SCORE_PATHS: [&str; 4] = [
    "/emotion/document/emotion",
    "/emotion/document",
    "/document/emotion",
    "/emotion",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawServiceResponse {
    pub status_code: u16,
    pub body: String,
}

impl RawServiceResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("emotion service response is not valid JSON: {0}")]
    UndecodableResponse(#[source] serde_json::Error),
}


pub fn normalize(response: &RawServiceResponse) -> Result<EmotionReport, NormalizeError> {
    if response.status_code == BLANK_INPUT_STATUS {
        debug!("service rejected the text as blank");
        return Ok(EmotionReport::BlankInput);
    }

    let data: Value = serde_json::from_str(&response.body).map_err(|error| {
        warn!(status = response.status_code, "undecodable emotion response: {}", error);
        NormalizeError::UndecodableResponse(error)
    })?;

    let root = score_root(&data);
    let source = resolve_scores(&root);

    let scores = EmotionScores::new(
        coerce_score(source.get("anger")),
        coerce_score(source.get("disgust")),
        coerce_score(source.get("fear")),
        coerce_score(source.get("joy")),
        coerce_score(source.get("sadness")),
    );
    debug!(dominant = %scores.dominant_emotion, "normalized emotion scores");

    Ok(EmotionReport::Scored(scores))
}


/// Picks the value the score paths are resolved against.
///
/// A string `text` field is decoded once more; anything in it that is not a
/// mapping leaves an empty root. Without a `text` field the body itself is used.
fn score_root(data: &Value) -> Cow<'_, Value> {
    match data.get("text") {
        None => Cow::Borrowed(data),
        Some(text @ Value::Object(_)) => Cow::Borrowed(text),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(decoded @ Value::Object(_)) => Cow::Owned(decoded),
            Ok(_) | Err(_) => {
                debug!("`text` field does not hold an encoded mapping");
                Cow::Owned(Value::Object(Map::new()))
            },
        },
        Some(_) => Cow::Owned(Value::Object(Map::new())),
    }
}

fn resolve_scores<'a>(root: &'a Value) -> ScoreSource<'a> {
    for path in SCORE_PATHS {
        if let Some(Value::Object(map)) = root.pointer(path) {
            debug!(path, "resolved score mapping");
            return ScoreSource::Mapping(map);
        }
    }
    match root {
        Value::Object(map) => ScoreSource::Mapping(map),
        _ => ScoreSource::Empty,
    }
}

enum ScoreSource<'a> {
    Mapping(&'a Map<String, Value>),
    Empty,
}

impl<'a> ScoreSource<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        match self {
            ScoreSource::Mapping(map) => map.get(key),
            ScoreSource::Empty => None,
        }
    }
}

/// Reads one score, falling back to `0.0` for anything that is not a finite number.
pub fn coerce_score(value: Option<&Value>) -> f64 {
    let score = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(string)) => string.trim().parse::<f64>().ok(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    score.filter(|s| s.is_finite()).unwrap_or(0.0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::common_structs::Emotion;
    use serde_json::json;

    fn scores_json() -> Value {
        json!({"anger": 0.01, "disgust": 0.02, "fear": 0.01, "joy": 0.95, "sadness": 0.02})
    }

    fn ok(body: Value) -> RawServiceResponse {
        RawServiceResponse::new(200, body.to_string())
    }

    fn scored(response: &RawServiceResponse) -> EmotionScores {
        match normalize(response).unwrap() {
            EmotionReport::Scored(scores) => scores,
            EmotionReport::BlankInput => panic!("expected scores, got blank input"),
        }
    }

    #[test]
    fn test_all_nested_variants_agree() {
        let inner = scores_json();
        let double_encoded = json!({"emotion": {"document": {"emotion": inner.clone()}}}).to_string();

        let variants = vec![
            json!({"text": double_encoded}),
            json!({"emotion": {"document": {"emotion": inner.clone()}}}),
            json!({"emotion": {"document": inner.clone()}}),
            json!({"document": {"emotion": inner.clone()}}),
            json!({"emotion": inner.clone()}),
            inner.clone(),
        ];

        let expected = EmotionScores::new(0.01, 0.02, 0.01, 0.95, 0.02);
        for variant in variants {
            assert_eq!(scored(&ok(variant.clone())), expected, "variant: {}", variant);
        }
        assert_eq!(expected.dominant_emotion, Emotion::Joy);
    }

    #[test]
    fn test_unlisted_prediction_shape_is_all_zero() {
        let body = json!({"emotionPredictions": [{"emotion": {"joy": 0.9}}]});
        let scores = scored(&ok(body));
        assert_eq!(scores, EmotionScores::new(0.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(scores.dominant_emotion, Emotion::Anger);
    }

    #[test]
    fn test_earlier_path_wins() {
        let body = json!({
            "emotion": {
                "document": {"emotion": {"fear": 0.9}},
                "sadness": 0.8,
            }
        });
        let scores = scored(&ok(body));
        assert_eq!(scores.fear, 0.9);
        assert_eq!(scores.sadness, 0.0);
        assert_eq!(scores.dominant_emotion, Emotion::Fear);
    }

    #[test]
    fn test_non_mapping_path_is_skipped() {
        // `emotion.document` is a number, so `emotion` itself is the mapping
        let body = json!({"emotion": {"document": 3, "disgust": 0.7}});
        let scores = scored(&ok(body));
        assert_eq!(scores.disgust, 0.7);
        assert_eq!(scores.dominant_emotion, Emotion::Disgust);
    }

    #[test]
    fn test_blank_input_regardless_of_body() {
        for body in ["", "not json", r#"{"emotion": {"joy": 1.0}}"#] {
            let report = normalize(&RawServiceResponse::new(400, body)).unwrap();
            assert_eq!(report, EmotionReport::BlankInput);
            assert!(report.dominant_emotion().is_none());
        }
    }

    #[test]
    fn test_undecodable_body_fails() {
        for body in ["", "<html>Bad Gateway</html>", "{\"anger\": "] {
            let result = normalize(&RawServiceResponse::new(200, body));
            assert!(matches!(result, Err(NormalizeError::UndecodableResponse(_))), "body: {:?}", body);
        }
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let scores = scored(&ok(json!({"emotion": {"fear": 0.3, "sadness": 0.6}})));
        assert_eq!(scores.anger, 0.0);
        assert_eq!(scores.disgust, 0.0);
        assert_eq!(scores.joy, 0.0);
        assert_eq!(scores.fear, 0.3);
        assert_eq!(scores.dominant_emotion, Emotion::Sadness);
    }

    #[test]
    fn test_no_scores_anywhere_is_all_zero() {
        let scores = scored(&ok(json!({"status": "ok"})));
        assert_eq!(scores, EmotionScores::new(0.0, 0.0, 0.0, 0.0, 0.0));

        let scores = scored(&ok(json!([1, 2, 3])));
        assert_eq!(scores, EmotionScores::new(0.0, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_text_field_variants() {
        // plain text echoed back is not an encoded document
        let scores = scored(&ok(json!({"text": "I love this", "joy": 0.9})));
        assert_eq!(scores.joy, 0.0);

        let scores = scored(&ok(json!({"text": {"emotion": {"joy": 0.4}}})));
        assert_eq!(scores.joy, 0.4);

        let scores = scored(&ok(json!({"text": "[0.1, 0.2]"})));
        assert_eq!(scores, EmotionScores::new(0.0, 0.0, 0.0, 0.0, 0.0));

        let scores = scored(&ok(json!({"text": 12, "joy": 0.9})));
        assert_eq!(scores.joy, 0.0);
    }

    #[test]
    fn test_coerce_score() {
        assert_eq!(coerce_score(Some(&json!(0.25))), 0.25);
        assert_eq!(coerce_score(Some(&json!(1))), 1.0);
        assert_eq!(coerce_score(Some(&json!(" 0.5 "))), 0.5);
        assert_eq!(coerce_score(Some(&json!(true))), 1.0);
        assert_eq!(coerce_score(Some(&json!(false))), 0.0);
        assert_eq!(coerce_score(Some(&json!("high"))), 0.0);
        assert_eq!(coerce_score(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_score(Some(&json!(null))), 0.0);
        assert_eq!(coerce_score(Some(&json!([0.5]))), 0.0);
        assert_eq!(coerce_score(Some(&json!({"value": 0.5}))), 0.0);
        assert_eq!(coerce_score(None), 0.0);
    }

    #[test]
    fn test_malformed_fields_do_not_fail() {
        let body = json!({"emotion": {"anger": "0.2", "disgust": null, "fear": [1], "joy": "lots", "sadness": 0.1}});
        let scores = scored(&ok(body));
        assert_eq!(scores, EmotionScores::new(0.2, 0.0, 0.0, 0.0, 0.1));
        assert_eq!(scores.dominant_emotion, Emotion::Anger);
    }

    #[test]
    fn test_tie_break_is_stable() {
        let body = json!({"emotion": {"anger": 0.5, "disgust": 0.5, "fear": 0.0, "joy": 0.0, "sadness": 0.0}});
        let response = ok(body);
        for _ in 0..20 {
            assert_eq!(scored(&response).dominant_emotion, Emotion::Anger);
        }
    }

    #[test]
    fn test_error_status_with_json_body_is_scored() {
        let report = normalize(&RawServiceResponse::new(500, r#"{"code": 13}"#)).unwrap();
        assert_eq!(report, EmotionReport::Scored(EmotionScores::new(0.0, 0.0, 0.0, 0.0, 0.0)));
    }
}
