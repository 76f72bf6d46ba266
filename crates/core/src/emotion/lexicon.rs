use crate::emotion::{tokenize, EmotionAnalyzer, EmotionError, EmotionLabel, EmotionScores};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub const LEXICON_ENGINE_NAME: &str = "lexicon";

/// Word list compiled into the binary, used when no lexicon file is configured.
pub const BUILTIN_LEXICON: &str = include_str!("lexicon.json");

const LOG_TARGET: &str = "emotion::lexicon";
const MIN_STEM_CHARS: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum LexiconError {
    #[error("failed to read lexicon {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lexicon json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lexicon contains no words")]
    Empty,
}

/// Emotion word dictionary: each word maps to one or more labels.
///
/// The JSON form is an object keyed by label name holding word arrays:
/// `{ "happy": ["joy", "glad"], "fear": ["dread"] }`.
#[derive(Clone, Debug)]
pub struct Lexicon {
    entries: HashMap<String, Vec<EmotionLabel>>,
}

impl Lexicon {
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_json_str(BUILTIN_LEXICON)
    }

    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_json_str(&json)?;
        tracing::info!(
            target: LOG_TARGET,
            path = %path.display(),
            words = lexicon.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let raw: BTreeMap<EmotionLabel, Vec<String>> = serde_json::from_str(json)?;
        let mut entries: HashMap<String, Vec<EmotionLabel>> = HashMap::new();
        for (label, words) in raw {
            for word in words {
                let word = word.trim().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                let labels = entries.entry(word).or_default();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        if entries.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels for `word`, trying its inflected forms ("loved" -> "love")
    /// when the word itself is not listed.
    pub fn lookup(&self, word: &str) -> Option<&[EmotionLabel]> {
        word_forms(word)
            .iter()
            .find_map(|form| self.entries.get(form.as_str()))
            .map(Vec::as_slice)
    }
}

fn word_forms(word: &str) -> Vec<String> {
    let mut forms = vec![word.to_owned()];
    let mut stems = Vec::new();

    for suffix in ["ily", "ies", "ied"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            stems.push(format!("{stem}y"));
        }
    }
    for suffix in ["ing", "ed"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            stems.push(stem.to_owned());
            stems.push(format!("{stem}e"));
            if let Some(single) = undouble(stem) {
                stems.push(single);
            }
        }
    }
    for suffix in ["es", "s", "ly"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            stems.push(stem.to_owned());
        }
    }

    forms.extend(
        stems
            .into_iter()
            .filter(|stem| stem.chars().count() >= MIN_STEM_CHARS),
    );
    forms
}

/// "hugg" -> "hug"
fn undouble(stem: &str) -> Option<String> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let before = chars.next()?;
    if last == before && !"aeiou".contains(last) {
        let mut single = stem.to_owned();
        single.pop();
        Some(single)
    } else {
        None
    }
}

/// Primary classification strategy: counts lexicon hits per label and
/// scores each label by its share of all hits.
#[derive(Clone, Debug)]
pub struct LexiconAnalyzer {
    lexicon: Lexicon,
}

impl LexiconAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn score(&self, text: &str) -> Result<EmotionScores, EmotionError> {
        let mut counts: BTreeMap<EmotionLabel, u32> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(labels) = self.lexicon.lookup(&token) {
                for label in labels {
                    *counts.entry(*label).or_default() += 1;
                }
            }
        }
        if counts.is_empty() {
            return Err(EmotionError::NoSignal);
        }
        Ok(EmotionScores::from_counts(&counts))
    }
}

impl EmotionAnalyzer for LexiconAnalyzer {
    fn name(&self) -> &'static str {
        LEXICON_ENGINE_NAME
    }

    fn analyze_text(&self, text: String) -> BoxFuture<'_, Result<EmotionScores, EmotionError>> {
        async move { self.score(&text) }.boxed()
    }
}
