use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use emotion_detection::service::common_structs::{EmotionReport, EmotionScores};
use emotion_detection::service::{CommonService, DetectionError};
use serde::Deserialize;
use tracing::{error, info, warn};

pub const INVALID_TEXT_MESSAGE: &str = "Invalid text! Please try again!";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Emotion service unavailable. Please try again later.";

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Emotion Detector</title>
</head>
<body>
    <h1>Emotion Detector</h1>
    <form action="/emotionDetector" method="post">
        <textarea name="statement" rows="4" cols="60" placeholder="Enter a statement to analyze"></textarea>
        <br>
        <button type="submit">Run Sentiment Analysis</button>
    </form>
</body>
</html>
"#;


#[derive(Debug, Deserialize)]
pub struct DetectorQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectorForm {
    #[serde(default)]
    pub statement: String,
}


fn build_text_response(status: StatusCode, text: &str) -> Response {
    let mut text_header = HeaderMap::new();
    text_header.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));

    let mut response = Response::new(text.to_owned());
    *response.status_mut() = status;
    (text_header, response).into_response()
}

// Shortest round-trip digits. Exponent form below 1e-4 and from 1e16 up,
// written as `1.234e-05`; integral values keep one decimal.
fn format_score(score: f64) -> String {
    let scientific = format!("{:e}", score);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if score != 0.0 && (exponent < -4 || exponent >= 16) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        score.to_string()
    }
}

pub fn format_response_text(scores: &EmotionScores) -> String {
    format!(
        "For the given statement, the system response is 'anger': {}, 'disgust': {}, 'fear': {}, 'joy': {} and 'sadness': {}. The dominant emotion is {}.",
        format_score(scores.anger),
        format_score(scores.disgust),
        format_score(scores.fear),
        format_score(scores.joy),
        format_score(scores.sadness),
        scores.dominant_emotion
    )
}


pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn emotion_detector_query(
    State(service): State<CommonService>,
    params: Option<Query<DetectorQuery>>
) -> Response {
    let text = params.map(|Query(params)| params.q).unwrap_or_default();
    detect(&service, &text).await
}

pub async fn emotion_detector_form(
    State(service): State<CommonService>,
    params: Option<Form<DetectorForm>>
) -> Response {
    let text = params.map(|Form(params)| params.statement).unwrap_or_default();
    detect(&service, &text).await
}

async fn detect(service: &CommonService, text: &str) -> Response {
    info!(length = text.len(), "emotion detection requested");

    match service.emotion_detector(text).await {
        Ok(EmotionReport::Scored(scores)) => build_text_response(StatusCode::OK, &format_response_text(&scores)),
        Ok(EmotionReport::BlankInput) => build_text_response(StatusCode::BAD_REQUEST, INVALID_TEXT_MESSAGE),
        Err(DetectionError::Normalize(error)) => {
            warn!("Error normalizing emotion response: {}", error);
            build_text_response(StatusCode::BAD_REQUEST, INVALID_TEXT_MESSAGE)
        },
        Err(DetectionError::Service(error)) => {
            error!("Error calling emotion service: {:?}", error);
            build_text_response(StatusCode::BAD_GATEWAY, SERVICE_UNAVAILABLE_MESSAGE)
        },
    }
}
