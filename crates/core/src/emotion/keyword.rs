use crate::emotion::{tokenize, EmotionAnalyzer, EmotionError, EmotionLabel, EmotionScores};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::BTreeMap;

pub const KEYWORD_ENGINE_NAME: &str = "keyword-based";

const KEYWORDS: &[(EmotionLabel, &[&str])] = &[
    (
        EmotionLabel::Happy,
        &[
            "happy", "joy", "excited", "great", "amazing", "wonderful", "fantastic", "awesome",
            "good", "love", "smile", "laugh", "cheerful", "delighted",
        ],
    ),
    (
        EmotionLabel::Sad,
        &[
            "sad", "depressed", "unhappy", "miserable", "upset", "down", "blue", "grief",
            "sorrow", "cry", "tears", "lonely", "heartbroken",
        ],
    ),
    (
        EmotionLabel::Angry,
        &[
            "angry", "mad", "furious", "rage", "hate", "annoyed", "frustrated", "irritated",
            "pissed", "outraged", "livid", "enraged",
        ],
    ),
    (
        EmotionLabel::Fear,
        &[
            "afraid", "scared", "fear", "terrified", "worried", "anxious", "panic", "nervous",
            "frightened", "alarmed", "concerned",
        ],
    ),
    (
        EmotionLabel::Surprise,
        &[
            "surprised", "shocked", "amazed", "astonished", "stunned", "bewildered", "confused",
            "wow", "unbelievable",
        ],
    ),
];

/// Dependency-free classifier matching whole words against fixed trigger
/// lists. Each label scores its share of all matched keyword occurrences.
#[derive(Clone, Debug)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> EmotionScores {
        let mut counts: BTreeMap<EmotionLabel, u32> = BTreeMap::new();
        for token in tokenize(text) {
            for (label, keywords) in KEYWORDS {
                if keywords.contains(&token.as_str()) {
                    *counts.entry(*label).or_default() += 1;
                }
            }
        }
        EmotionScores::from_counts(&counts)
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionAnalyzer for KeywordAnalyzer {
    fn name(&self) -> &'static str {
        KEYWORD_ENGINE_NAME
    }

    fn analyze_text(&self, text: String) -> BoxFuture<'_, Result<EmotionScores, EmotionError>> {
        async move { Ok(self.score(&text)) }.boxed()
    }
}
