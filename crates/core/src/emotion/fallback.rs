use crate::emotion::{EmotionAnalyzer, EmotionError, EmotionScores};
use futures::future::BoxFuture;
use futures::FutureExt;

const LOG_TARGET: &str = "emotion::fallback";

/// Runs `primary` and substitutes `fallback` whenever it errors or finds
/// nothing to score. Reports the primary's engine name.
#[derive(Clone, Debug)]
pub struct FallbackAnalyzer<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackAnalyzer<P, F>
where
    P: EmotionAnalyzer,
    F: EmotionAnalyzer,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> EmotionAnalyzer for FallbackAnalyzer<P, F>
where
    P: EmotionAnalyzer,
    F: EmotionAnalyzer,
{
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn analyze_text(&self, text: String) -> BoxFuture<'_, Result<EmotionScores, EmotionError>> {
        async move {
            match self.primary.analyze_text(text.clone()).await {
                Ok(scores) => Ok(scores),
                Err(EmotionError::NoSignal) => {
                    tracing::debug!(
                        target: LOG_TARGET,
                        primary = self.primary.name(),
                        fallback = self.fallback.name(),
                        "no signal from primary analyzer"
                    );
                    self.fallback.analyze_text(text).await
                }
                Err(e) => {
                    tracing::warn!(
                        target: LOG_TARGET,
                        primary = self.primary.name(),
                        fallback = self.fallback.name(),
                        "primary analyzer failed, falling back for this request: {e}"
                    );
                    self.fallback.analyze_text(text).await
                }
            }
        }
        .boxed()
    }
}
