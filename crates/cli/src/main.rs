#![deny(warnings)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use emotion_pal_core::config::{
    resolve_engine, resolve_parsed, resolve_string_with_default, ClassifierConfig, Env,
    ServerConfig, StdEnv, DEFAULT_HOST, DEFAULT_MIN_CONFIDENCE, DEFAULT_PORT, ENV_HOST,
    ENV_LEXICON, ENV_MAX_TEXT_CHARS, ENV_PORT,
};
use emotion_pal_core::emotion::Classifier;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emotion-pal")]
#[command(about = "Privacy-focused text emotion analysis API")]
#[command(version)]
struct Args {
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Classify a piece of text and print the result as JSON
    Classify(ClassifyArgs),
}

#[derive(clap::Args, Debug)]
struct EngineArgs {
    /// auto, lexicon or keyword
    #[arg(long)]
    engine: Option<String>,

    /// JSON lexicon file replacing the built-in word list
    #[arg(long)]
    lexicon: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f64,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    max_text_chars: Option<usize>,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(clap::Args, Debug)]
struct ClassifyArgs {
    #[command(flatten)]
    engine: EngineArgs,

    text: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    match args.command {
        Command::Serve(serve) => run_server(serve, &env).await,
        Command::Classify(classify) => run_classify(classify, &env).await,
    }
}

async fn run_server(args: ServeArgs, env: &impl Env) -> anyhow::Result<()> {
    let cfg = build_server_config(args, env)?;

    tracing::info!(
        "Starting emotion-pal v{} on {}",
        env!("CARGO_PKG_VERSION"),
        cfg.bind_addr()
    );
    tracing::info!(
        engine = %cfg.classifier.engine,
        max_text_chars = ?cfg.max_text_chars,
        "config loaded"
    );

    let classifier =
        Classifier::from_config(&cfg.classifier).context("failed to initialize emotion engine")?;
    emotion_pal_core::server::serve(&cfg, classifier).await?;

    Ok(())
}

async fn run_classify(args: ClassifyArgs, env: &impl Env) -> anyhow::Result<()> {
    let cfg = build_classifier_config(args.engine, env)?;
    let classifier =
        Classifier::from_config(&cfg).context("failed to initialize emotion engine")?;

    let result = classifier.classify(&args.text).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    // stdout is reserved for `classify` output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_classifier_config(args: EngineArgs, env: &impl Env) -> anyhow::Result<ClassifierConfig> {
    let engine = resolve_engine(args.engine, env)?;
    let lexicon_path = args
        .lexicon
        .or_else(|| env.var(ENV_LEXICON).map(PathBuf::from));

    Ok(ClassifierConfig::new(engine, lexicon_path, args.min_confidence)?)
}

fn build_server_config(args: ServeArgs, env: &impl Env) -> anyhow::Result<ServerConfig> {
    let host = resolve_string_with_default(args.host, ENV_HOST, env, DEFAULT_HOST);
    let port = resolve_parsed(args.port, ENV_PORT, env)?.unwrap_or(DEFAULT_PORT);
    let max_text_chars = resolve_parsed(args.max_text_chars, ENV_MAX_TEXT_CHARS, env)?;
    let classifier = build_classifier_config(args.engine, env)?;

    Ok(ServerConfig::new(host, port, max_text_chars, classifier)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotion_pal_core::config::{EngineChoice, MapEnv, ENV_ENGINE};

    fn serve_args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["emotion-pal", "serve"];
        full.extend_from_slice(argv);
        match Args::parse_from(full).command {
            Command::Serve(args) => args,
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let cfg = build_server_config(serve_args(&[]), &MapEnv::default()).unwrap();
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn env_fills_in_missing_flags() {
        let env = MapEnv::default()
            .with_var(ENV_PORT, "9100")
            .with_var(ENV_ENGINE, "keyword")
            .with_var(ENV_LEXICON, "/etc/emotion/lexicon.json")
            .with_var(ENV_MAX_TEXT_CHARS, "1000");
        let cfg = build_server_config(serve_args(&["--host", "127.0.0.1"]), &env).unwrap();

        assert_eq!(cfg.bind_addr(), "127.0.0.1:9100");
        assert_eq!(cfg.max_text_chars, Some(1000));
        assert_eq!(cfg.classifier.engine, EngineChoice::Keyword);
        assert_eq!(
            cfg.classifier.lexicon_path,
            Some(PathBuf::from("/etc/emotion/lexicon.json"))
        );
    }

    #[test]
    fn flags_take_precedence_over_env() {
        let env = MapEnv::default()
            .with_var(ENV_PORT, "9100")
            .with_var(ENV_ENGINE, "keyword");
        let args = serve_args(&["--port", "8080", "--engine", "lexicon"]);
        let cfg = build_server_config(args, &env).unwrap();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.classifier.engine, EngineChoice::Lexicon);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let env = MapEnv::default().with_var(ENV_PORT, "not-a-port");
        assert!(build_server_config(serve_args(&[]), &env).is_err());

        let args = serve_args(&["--min-confidence", "2.0"]);
        assert!(build_server_config(args, &MapEnv::default()).is_err());

        let args = serve_args(&["--engine", "neural"]);
        assert!(build_server_config(args, &MapEnv::default()).is_err());
    }
}
