mod logging;
mod output;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mqa_core::ComplianceLevel;
use mqa_eval::{
    ConformanceEngine, EvalError, ReqwestProbe, ScoringEngine, StaticLabels,
    UnavailableConformanceEngine, render_markdown,
};
use mqa_load::{ContentSource, GraphSource, LoadError, UrlSource};
use mqa_profile::{ConfigurationError, ProfileCatalog, profile_json_schema};
use thiserror::Error;

use logging::init_logging;
use output::write_atomic;
use settings::Settings;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("graph load error: {0}")]
    Load(#[from] LoadError),
    #[error("probe error: {0}")]
    Probe(#[from] mqa_eval::ProbeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "mqa",
    version,
    about = "Metadata quality assessment for DCAT catalogs"
)]
struct Cli {
    /// Emit JSON logs.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a catalog against a profile.
    Evaluate(EvaluateArgs),
    /// List the available profiles.
    Profiles(ConfigArgs),
    /// Print the JSON Schema of a profile definition.
    ProfileSchema,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Catalog location to fetch.
    #[arg(long)]
    url: Option<String>,
    /// Local catalog file.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Settings file (defaults to ./mqa.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// MIME type of --file when the extension is not enough.
    #[arg(long, requires = "file")]
    content_type: Option<String>,
    /// Profile name.
    #[arg(long, default_value = mqa_profile::DCAT_AP_ES)]
    profile: String,
    /// Shape validation level (1-3).
    #[arg(long, default_value_t = 2)]
    level: u8,
    #[command(flatten)]
    config: ConfigArgs,
    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Profiles(args) => run_profiles(args),
        Command::ProfileSchema => {
            println!("{}", serde_json::to_string_pretty(&profile_json_schema())?);
            Ok(())
        }
    }
}

fn load_catalog(settings: &Settings) -> Result<ProfileCatalog, CliError> {
    let mut catalog = ProfileCatalog::builtin();
    if let Some(path) = &settings.paths.profiles_file {
        catalog.extend_from_file(path)?;
        tracing::info!(path = %path.display(), "custom profiles loaded");
    }
    Ok(catalog)
}

fn run_profiles(args: ConfigArgs) -> Result<(), CliError> {
    let settings = Settings::load(args.config.as_deref())?;
    let catalog = load_catalog(&settings)?;
    for profile in catalog.profiles() {
        println!(
            "{}\tmax_score={}\tcompliance={}",
            profile.name(),
            profile.max_score(),
            profile.compliance_metric()
        );
    }
    Ok(())
}

async fn run_evaluate(args: EvaluateArgs) -> Result<(), CliError> {
    let EvaluateArgs {
        input,
        content_type,
        profile,
        level,
        config,
        out,
        format,
    } = args;

    let level = ComplianceLevel::from_number(level).ok_or_else(|| {
        CliError::InvalidArgument(format!("level must be 1, 2 or 3, got {level}"))
    })?;
    let settings = Settings::load(config.config.as_deref())?;
    let catalog = load_catalog(&settings)?;
    let max_score = catalog.get(&profile)?.max_score();

    let source: Box<dyn GraphSource> = match (input.url, input.file) {
        (Some(url), None) => Box::new(UrlSource::new(url)),
        (None, Some(path)) => Box::new(ContentSource::from_file(
            &path,
            content_type.as_deref(),
        )?),
        _ => {
            return Err(CliError::InvalidArgument(
                "use exactly one of --url or --file".to_string(),
            ));
        }
    };

    let timer = Instant::now();
    tracing::info!(source = %source.describe(), profile = %profile, "loading graph");
    let loaded = source.load(&settings.load_options()).await?;

    let options = settings.evaluate_options();
    let probe = ReqwestProbe::new(&options.reachability)?;
    let conformance: Arc<dyn ConformanceEngine> = match settings.conformance_engine() {
        Some(engine) => Arc::new(engine),
        None => {
            tracing::warn!("no conformance engine configured, compliance metrics will score zero");
            Arc::new(UnavailableConformanceEngine)
        }
    };
    let labels = StaticLabels::builtin().with_overrides(&settings.labels.overrides);
    let language = options
        .label_languages
        .first()
        .cloned()
        .unwrap_or_else(|| "en".to_string());

    let engine = ScoringEngine::new(options, Arc::new(probe), conformance)
        .with_catalog(catalog)
        .with_labels(Arc::new(labels));
    let report = engine
        .evaluate(&loaded.graph, loaded.source.as_deref(), &profile, level)
        .await?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Markdown => render_markdown(&report, max_score, &language),
    };
    match out {
        Some(path) => {
            write_atomic(&path, rendered.as_bytes())?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    tracing::info!(
        total_score = report.total_score,
        rating = %report.rating,
        duration_ms = timer.elapsed().as_millis() as u64,
        "run finished"
    );
    Ok(())
}
