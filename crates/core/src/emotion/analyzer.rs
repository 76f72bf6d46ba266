use crate::emotion::EmotionScores;
use futures::future::BoxFuture;

#[derive(thiserror::Error, Debug)]
pub enum EmotionError {
    #[error("no emotional signal found in text")]
    NoSignal,
    #[error("emotion analysis failed: {0}")]
    AnalysisFailed(String),
}

/// A strategy that scores text against every [`EmotionLabel`](crate::emotion::EmotionLabel).
pub trait EmotionAnalyzer: Send + Sync {
    /// Short engine name reported by the health endpoint.
    fn name(&self) -> &'static str;

    fn analyze_text(&self, text: String) -> BoxFuture<'_, Result<EmotionScores, EmotionError>>;
}
