use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.1;
pub const ENV_HOST: &str = "EMOTION_PAL_HOST";
pub const ENV_PORT: &str = "EMOTION_PAL_PORT";
pub const ENV_ENGINE: &str = "EMOTION_PAL_ENGINE";
pub const ENV_LEXICON: &str = "EMOTION_PAL_LEXICON";
pub const ENV_MAX_TEXT_CHARS: &str = "EMOTION_PAL_MAX_TEXT_CHARS";

/// Requested classification engine.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    /// Lexicon when it loads, keyword matching otherwise.
    #[default]
    Auto,
    Lexicon,
    Keyword,
}

impl EngineChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineChoice::Auto => "auto",
            EngineChoice::Lexicon => "lexicon",
            EngineChoice::Keyword => "keyword",
        }
    }
}

impl FromStr for EngineChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(EngineChoice::Auto),
            "lexicon" => Ok(EngineChoice::Lexicon),
            "keyword" | "keyword-based" => Ok(EngineChoice::Keyword),
            other => Err(ConfigError::UnknownEngine(other.to_owned())),
        }
    }
}

impl fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    pub engine: EngineChoice,
    /// External lexicon file; the built-in word list is used when unset.
    pub lexicon_path: Option<PathBuf>,
    /// Top scores below this report the neutral label.
    pub min_confidence: f64,
}

impl ClassifierConfig {
    pub fn new(
        engine: EngineChoice,
        lexicon_path: Option<PathBuf>,
        min_confidence: f64,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(ConfigError::InvalidMinConfidence(min_confidence));
        }
        Ok(Self {
            engine,
            lexicon_path,
            min_confidence,
        })
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            engine: EngineChoice::default(),
            lexicon_path: None,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Longest accepted `/analyze` text, in characters. `None` accepts any length.
    pub max_text_chars: Option<usize>,
    pub classifier: ClassifierConfig,
}

impl ServerConfig {
    pub fn new(
        host: String,
        port: u16,
        max_text_chars: Option<usize>,
        classifier: ClassifierConfig,
    ) -> Result<Self, ConfigError> {
        if host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if max_text_chars == Some(0) {
            return Err(ConfigError::ZeroMaxTextChars);
        }
        Ok(Self {
            host,
            port,
            max_text_chars,
            classifier,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            max_text_chars: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,
    #[error("port must be > 0")]
    ZeroPort,
    #[error("max text length must be > 0 characters")]
    ZeroMaxTextChars,
    #[error("min confidence must be within [0, 1], got {0}")]
    InvalidMinConfidence(f64),
    #[error("unknown emotion engine: {0} (expected auto, lexicon or keyword)")]
    UnknownEngine(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

/// CLI value, else the parsed environment variable, else `None`.
pub fn resolve_parsed<T: FromStr>(
    cli_value: Option<T>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<T>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(v)),
        None => match env.var(env_key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: env_key.to_owned(),
                    value: raw,
                }),
            None => Ok(None),
        },
    }
}

/// Engine name from the CLI or `EMOTION_PAL_ENGINE`, defaulting to `auto`.
pub fn resolve_engine(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<EngineChoice, ConfigError> {
    match resolve_optional_string(cli_value, ENV_ENGINE, env) {
        Some(name) => name.parse(),
        None => Ok(EngineChoice::default()),
    }
}
