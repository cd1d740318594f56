use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corpus_eval::data::{load_item_pairs, load_text_examples};
use corpus_eval::{
    AggregationMode, CaseMode, DegeneratePolicy, Evaluator, LengthUnit, RougeConfig,
    RougeScorer, TracingObserver, TruncationTarget,
};

#[derive(Parser)]
#[command(name = "corpus-eval")]
#[command(about = "Corpus-level set F1 and ROUGE-N scoring of candidates against references", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory for per-run log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    /// Do not write a log file
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputPaths {
    /// JSON array of references, one entry per example
    #[arg(long)]
    ref_path: PathBuf,

    /// JSON array of candidates, parallel to the references
    #[arg(long)]
    cand_path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Macro F1 over exact-match item sets
    F1 {
        #[command(flatten)]
        paths: InputPaths,

        /// Handling of examples with an empty reference or candidate set
        #[arg(long, value_enum, default_value = "abort")]
        on_empty: OnEmpty,
    },

    /// Macro ROUGE-N over whitespace-tokenized texts
    Rouge {
        #[command(flatten)]
        paths: InputPaths,

        /// Highest n-gram order to report
        #[arg(long, default_value = "1")]
        max_n: usize,

        /// Length limit applied before scoring
        #[arg(long, default_value = "100")]
        length_limit: usize,

        /// Disable the length limit
        #[arg(long)]
        no_length_limit: bool,

        /// Unit of the length limit
        #[arg(long, value_enum, default_value = "words")]
        length_unit: Unit,

        /// Which texts the length limit applies to
        #[arg(long, value_enum, default_value = "candidate")]
        truncate: Truncate,

        /// Multi-reference aggregation
        #[arg(long, value_enum, default_value = "average")]
        aggregation: Aggregation,

        /// Precision weight of the F blend (1 = precision only, 0 = recall only, 0.5 = F1)
        #[arg(long, default_value = "0.5")]
        alpha: f64,

        /// Lowercase texts before tokenizing
        #[arg(long)]
        lowercase: bool,

        /// Print precision and recall per order
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OnEmpty {
    Abort,
    Skip,
    Zero,
}

#[derive(Clone, Copy, ValueEnum)]
enum Unit {
    Words,
    Bytes,
}

#[derive(Clone, Copy, ValueEnum)]
enum Truncate {
    Candidate,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
enum Aggregation {
    Average,
    Best,
}

impl From<OnEmpty> for DegeneratePolicy {
    fn from(value: OnEmpty) -> Self {
        match value {
            OnEmpty::Abort => DegeneratePolicy::Abort,
            OnEmpty::Skip => DegeneratePolicy::Skip,
            OnEmpty::Zero => DegeneratePolicy::Zero,
        }
    }
}

impl From<Unit> for LengthUnit {
    fn from(value: Unit) -> Self {
        match value {
            Unit::Words => LengthUnit::Words,
            Unit::Bytes => LengthUnit::Bytes,
        }
    }
}

impl From<Truncate> for TruncationTarget {
    fn from(value: Truncate) -> Self {
        match value {
            Truncate::Candidate => TruncationTarget::CandidateOnly,
            Truncate::Both => TruncationTarget::Both,
        }
    }
}

impl From<Aggregation> for AggregationMode {
    fn from(value: Aggregation) -> Self {
        match value {
            Aggregation::Average => AggregationMode::Average,
            Aggregation::Best => AggregationMode::Best,
        }
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::F1 { .. } => "eval_f1",
            Commands::Rouge { .. } => "eval_rouge",
        }
    }
}

fn init_logging(log_dir: &Path, command: &str, to_file: bool) -> Result<()> {
    let file_layer = if to_file {
        fs::create_dir_all(log_dir)
            .context(format!("Failed to create log directory: {}", log_dir.display()))?;
        let stamp = chrono::Local::now().format("%y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("{}-{}.log", command, stamp));
        let file = fs::File::create(&log_path)
            .context(format!("Failed to create log file: {}", log_path.display()))?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_eval=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

/// Prints a result line and records it in the log.
fn report(line: &str) {
    println!("{}", line);
    info!("{}", line);
}

async fn run_f1(paths: InputPaths, on_empty: OnEmpty) -> Result<()> {
    info!("Reference path: {}", paths.ref_path.display());
    info!("Candidate path: {}", paths.cand_path.display());

    let pairs = load_item_pairs(&paths.ref_path, &paths.cand_path)
        .context("Failed to load item-set inputs")?;
    info!("Loaded {} examples", pairs.len());

    let evaluator = Evaluator::new().with_observer(Arc::new(TracingObserver));
    let macro_f1 = evaluator
        .f1_corpus(pairs, on_empty.into())
        .await
        .context("Set-F1 scoring failed")?;

    report(&format!("Macro F1: {:5.4}", 100.0 * macro_f1));
    Ok(())
}

async fn run_rouge(paths: InputPaths, config: RougeConfig, verbose: bool) -> Result<()> {
    info!("Reference path: {}", paths.ref_path.display());
    info!("Candidate path: {}", paths.cand_path.display());
    info!("ROUGE config: {}", serde_json::to_string(&config)?);

    let examples = load_text_examples(&paths.ref_path, &paths.cand_path)
        .context("Failed to load text inputs")?;
    info!("Loaded {} examples", examples.len());

    let scorer = RougeScorer::new(config).context("Invalid ROUGE configuration")?;
    let evaluator = Evaluator::new().with_observer(Arc::new(TracingObserver));
    let corpus = evaluator
        .rouge_corpus(Arc::new(scorer), examples)
        .await
        .context("ROUGE scoring failed")?;

    for (n, score) in &corpus {
        if verbose {
            report(&format!(
                "\trouge-{}:\tP: {:5.2}\tR: {:5.2}\tF: {:5.2}",
                n,
                100.0 * score.precision,
                100.0 * score.recall,
                100.0 * score.f
            ));
        }
        report(&format!("ROUGE-{} F1: {:5.4}", n, 100.0 * score.f));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_dir, cli.command.name(), !cli.no_log_file)?;

    match cli.command {
        Commands::F1 { paths, on_empty } => run_f1(paths, on_empty).await,
        Commands::Rouge {
            paths,
            max_n,
            length_limit,
            no_length_limit,
            length_unit,
            truncate,
            aggregation,
            alpha,
            lowercase,
            verbose,
        } => {
            let config = RougeConfig {
                max_n,
                length_limit: (!no_length_limit).then_some(length_limit),
                length_unit: length_unit.into(),
                truncation: truncate.into(),
                aggregation: aggregation.into(),
                alpha,
                case: if lowercase {
                    CaseMode::Insensitive
                } else {
                    CaseMode::Sensitive
                },
            };
            run_rouge(paths, config, verbose).await
        }
    }
}
