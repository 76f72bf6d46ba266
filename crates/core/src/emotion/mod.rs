mod analyzer;
mod classifier;
mod fallback;
mod keyword;
mod lexicon;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use analyzer::{EmotionAnalyzer, EmotionError};
pub use classifier::{Classifier, EngineKind};
pub use fallback::FallbackAnalyzer;
pub use keyword::KeywordAnalyzer;
pub use lexicon::{Lexicon, LexiconAnalyzer, LexiconError, BUILTIN_LEXICON};

/// Decimal places kept in scores that leave the classifier.
pub const SCORE_DECIMALS: i32 = 3;

/// Emotion labels, declared in tie-break priority order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Calm,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 6] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Fear,
        EmotionLabel::Surprise,
        EmotionLabel::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Calm => "calm",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent per-label confidences in `[0.0, 1.0]`.
///
/// Every label is always present; a label without evidence scores `0.0`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EmotionScores(BTreeMap<EmotionLabel, f64>);

impl EmotionScores {
    pub fn zeroed() -> Self {
        Self(EmotionLabel::ALL.iter().map(|label| (*label, 0.0)).collect())
    }

    /// Turns raw per-label counts into shares of the total.
    ///
    /// All-zero counts produce all-zero scores.
    pub fn from_counts(counts: &BTreeMap<EmotionLabel, u32>) -> Self {
        let total: u32 = counts.values().sum();
        let mut scores = Self::zeroed();
        if total == 0 {
            return scores;
        }
        for (label, count) in counts {
            scores.set(*label, f64::from(*count) / f64::from(total));
        }
        scores
    }

    pub fn get(&self, label: EmotionLabel) -> f64 {
        self.0.get(&label).copied().unwrap_or(0.0)
    }

    /// Stores `value` clamped into `[0.0, 1.0]`; NaN becomes `0.0`.
    pub fn set(&mut self, label: EmotionLabel, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.0.insert(label, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f64)> + '_ {
        self.0.iter().map(|(label, score)| (*label, *score))
    }

    pub fn is_zero(&self) -> bool {
        self.0.values().all(|score| *score == 0.0)
    }

    /// Highest-scoring label. Ties go to the label declared first in
    /// [`EmotionLabel`]; `None` when every score is zero.
    pub fn top(&self) -> Option<(EmotionLabel, f64)> {
        let mut best: Option<(EmotionLabel, f64)> = None;
        for label in EmotionLabel::ALL {
            let score = self.get(label);
            if score <= 0.0 {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }
        best
    }

    pub fn rounded(&self, decimals: i32) -> Self {
        Self(
            self.0
                .iter()
                .map(|(label, score)| (*label, round_to(*score, decimals)))
                .collect(),
        )
    }
}

impl Default for EmotionScores {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Outcome of classifying one piece of text; this is also the `/analyze`
/// response body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub emotion: EmotionLabel,
    pub confidence: f64,
    pub all_emotions: EmotionScores,
}

impl ClassificationResult {
    /// Picks the dominant label from the unrounded scores, then rounds what
    /// goes out. No evidence at all reports [`EmotionLabel::Calm`] at `0.0`.
    ///
    /// A top score under `min_confidence` also reports calm, but keeps the
    /// weak label's score as `confidence`, so `confidence` can differ from
    /// `all_emotions["calm"]`. Clients read it as "how strong the strongest
    /// signal was".
    pub fn from_scores(scores: EmotionScores, min_confidence: f64) -> Self {
        let (emotion, confidence) = match scores.top() {
            Some((label, score)) if score >= min_confidence => (label, score),
            Some((_, score)) => (EmotionLabel::Calm, score),
            None => (EmotionLabel::Calm, 0.0),
        };
        Self {
            emotion,
            confidence: round_to(confidence, SCORE_DECIMALS),
            all_emotions: scores.rounded(SCORE_DECIMALS),
        }
    }

    pub fn neutral() -> Self {
        Self {
            emotion: EmotionLabel::Calm,
            confidence: 0.0,
            all_emotions: EmotionScores::zeroed(),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Lowercased word tokens. Apostrophes inside a word are kept ("don't").
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
