
use std::fmt;

use serde::{Deserialize, Serialize};


#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Joy,
    Sadness,
}

impl Emotion {
    /// Canonical order. Also the tie-break priority when picking the dominant emotion.
    pub const ALL: [Emotion; 5] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Sadness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct EmotionScores {
    pub anger: f64,
    pub disgust: f64,
    pub fear: f64,
    pub joy: f64,
    pub sadness: f64,
    pub dominant_emotion: Emotion,
}

impl EmotionScores {
    pub fn new(anger: f64, disgust: f64, fear: f64, joy: f64, sadness: f64) -> Self {
        let mut scores = Self {
            anger,
            disgust,
            fear,
            joy,
            sadness,
            dominant_emotion: Emotion::Anger,
        };
        scores.dominant_emotion = scores.pick_dominant();
        scores
    }

    pub fn score(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Anger => self.anger,
            Emotion::Disgust => self.disgust,
            Emotion::Fear => self.fear,
            Emotion::Joy => self.joy,
            Emotion::Sadness => self.sadness,
        }
    }

    // strictly greater: on a tie the earlier emotion in `Emotion::ALL` keeps the lead
    fn pick_dominant(&self) -> Emotion {
        Emotion::ALL
            .into_iter()
            .fold(Emotion::Anger, |best, emotion| {
                if self.score(emotion) > self.score(best) { emotion } else { best }
            })
    }
}


/// Outcome of normalizing one service response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmotionReport {
    Scored(EmotionScores),
    /// The service rejected the text as unanalyzable (HTTP 400).
    BlankInput,
}

impl EmotionReport {
    pub fn scores(&self) -> Option<&EmotionScores> {
        match self {
            EmotionReport::Scored(scores) => Some(scores),
            EmotionReport::BlankInput => None,
        }
    }

    pub fn dominant_emotion(&self) -> Option<Emotion> {
        self.scores().map(|s| s.dominant_emotion)
    }
}
