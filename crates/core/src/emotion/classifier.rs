use crate::config::{ClassifierConfig, EngineChoice};
use crate::emotion::keyword::KEYWORD_ENGINE_NAME;
use crate::emotion::lexicon::LEXICON_ENGINE_NAME;
use crate::emotion::{
    ClassificationResult, EmotionAnalyzer, FallbackAnalyzer, KeywordAnalyzer, Lexicon,
    LexiconAnalyzer, LexiconError,
};
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "emotion::classifier";

/// Classification strategy selected at startup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// Lexicon scoring with the keyword matcher as per-request fallback.
    Lexicon,
    /// Keyword matching only.
    KeywordBased,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Lexicon => LEXICON_ENGINE_NAME,
            EngineKind::KeywordBased => KEYWORD_ENGINE_NAME,
        }
    }
}

/// Maps text to a [`ClassificationResult`]. Never fails: analyzer errors are
/// absorbed and the worst outcome is the neutral result.
pub struct Classifier {
    analyzer: Box<dyn EmotionAnalyzer>,
    engine: EngineKind,
    min_confidence: f64,
}

impl Classifier {
    pub fn new(
        analyzer: impl EmotionAnalyzer + 'static,
        engine: EngineKind,
        min_confidence: f64,
    ) -> Self {
        Self {
            analyzer: Box::new(analyzer),
            engine,
            min_confidence,
        }
    }

    pub fn keyword(min_confidence: f64) -> Self {
        Self::new(KeywordAnalyzer::new(), EngineKind::KeywordBased, min_confidence)
    }

    pub fn lexicon(lexicon: Lexicon, min_confidence: f64) -> Self {
        Self::new(
            FallbackAnalyzer::new(LexiconAnalyzer::new(lexicon), KeywordAnalyzer::new()),
            EngineKind::Lexicon,
            min_confidence,
        )
    }

    /// Builds the classifier once for the process lifetime.
    ///
    /// With [`EngineChoice::Auto`] a lexicon that fails to load degrades to
    /// the keyword engine; [`EngineChoice::Lexicon`] turns that into an error.
    pub fn from_config(cfg: &ClassifierConfig) -> Result<Self, LexiconError> {
        let load = || match &cfg.lexicon_path {
            Some(path) => Lexicon::from_path(path),
            None => Lexicon::builtin(),
        };

        let classifier = match cfg.engine {
            EngineChoice::Keyword => Self::keyword(cfg.min_confidence),
            EngineChoice::Lexicon => Self::lexicon(load()?, cfg.min_confidence),
            EngineChoice::Auto => match load() {
                Ok(lexicon) => Self::lexicon(lexicon, cfg.min_confidence),
                Err(e) => {
                    tracing::warn!(
                        target: LOG_TARGET,
                        "lexicon unavailable, using keyword-based detection: {e}"
                    );
                    Self::keyword(cfg.min_confidence)
                }
            },
        };

        tracing::info!(
            target: LOG_TARGET,
            engine = classifier.engine.as_str(),
            min_confidence = classifier.min_confidence,
            "emotion engine ready"
        );
        Ok(classifier)
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let text = text.trim();
        tracing::debug!(target: LOG_TARGET, chars = text.chars().count(), "classifying text");

        match self.analyzer.analyze_text(text.to_owned()).await {
            Ok(scores) => ClassificationResult::from_scores(scores, self.min_confidence),
            Err(e) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    analyzer = self.analyzer.name(),
                    "emotion analysis failed, returning neutral result: {e}"
                );
                ClassificationResult::neutral()
            }
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("analyzer", &self.analyzer.name())
            .field("engine", &self.engine)
            .field("min_confidence", &self.min_confidence)
            .finish()
    }
}
