mod display;
mod submit;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use salarium_ai::{EncodeError, InferenceError};
use salarium_core::request::{DEFAULT_MODEL, MIN_AGE, MIN_EXPERIENCE};
use salarium_core::{CategoricalField, PredictionRequest, Submission};
use salarium_store::{ArtifactStore, EvaluationSummary};
use tracing::Level;

#[derive(Parser)]
#[command(name = "salarium", version, about = "Salary prediction from trained model artifacts")]
struct Cli {
    /// Directory holding the model, encoder, and summary artifacts
    #[arg(long, global = true, env = "SALARIUM_ARTIFACTS", default_value = ".")]
    artifacts: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the selectable models and whether their artifacts are present
    Models,

    /// List the values accepted for categorical fields
    Options {
        /// Only this field (gender, education, job-title)
        #[arg(long)]
        field: Option<String>,
    },

    /// Estimate a salary
    Predict {
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        age: i32,

        #[arg(long)]
        gender: String,

        #[arg(long)]
        education: String,

        #[arg(long)]
        job_title: String,

        /// Years of experience
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        experience: i32,

        /// Model display name or slug
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Also print the encoded row passed to the model
        #[arg(long)]
        show_encoded: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the model evaluation summary
    Summary {
        /// Summary file (default: <artifacts>/model_evaluation_summary.csv)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Write the summary as CSV to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!("salarium v{}", env!("CARGO_PKG_VERSION"));

    let store = ArtifactStore::open(&cli.artifacts);

    match cli.command {
        Command::Models => cmd_models(&store),
        Command::Options { field } => cmd_options(&store, field.as_deref()),
        Command::Predict {
            age,
            gender,
            education,
            job_title,
            experience,
            model,
            show_encoded,
            json,
        } => {
            let submission = Submission {
                request: PredictionRequest {
                    age,
                    gender,
                    education,
                    job_title,
                    experience,
                },
                selected_model: model,
            };
            cmd_predict(&store, &submission, show_encoded, json)
        }
        Command::Summary { summary, export } => {
            let path = summary.unwrap_or_else(|| store.layout().summary_path());
            cmd_summary(&path, export.as_deref())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// ── Subcommands ──

fn cmd_models(store: &ArtifactStore) -> anyhow::Result<()> {
    println!("Models in {}", store.layout().root().display());
    display::print_models(store);
    Ok(())
}

fn cmd_options(store: &ArtifactStore, field: Option<&str>) -> anyhow::Result<()> {
    let fields = match field {
        Some(name) => match CategoricalField::from_name(name) {
            Some(field) => vec![field],
            None => bail!("unknown field '{name}' (expected gender, education, or job-title)"),
        },
        None => CategoricalField::ALL.to_vec(),
    };
    let bundle = store.load_encoders().context("loading encoders")?;
    display::print_options(&bundle, &fields);
    Ok(())
}

fn cmd_predict(
    store: &ArtifactStore,
    submission: &Submission,
    show_encoded: bool,
    json: bool,
) -> anyhow::Result<()> {
    let result = submit::run_submission(store, submission)
        .map_err(|err| explain_submission_error(store, err))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    display::print_result(&result);
    if show_encoded {
        display::print_encoded(&result.encoded);
    }
    Ok(())
}

/// Add user-facing guidance to request errors.
fn explain_submission_error(store: &ArtifactStore, err: anyhow::Error) -> anyhow::Error {
    let guidance = match err.downcast_ref::<InferenceError>() {
        Some(InferenceError::Validation(_)) => Some(format!(
            "Please enter valid inputs. Age must be ≥ {MIN_AGE} and experience ≥ {MIN_EXPERIENCE}."
        )),
        Some(InferenceError::Encode(EncodeError::UnknownCategory { field, .. })) => store
            .load_encoders()
            .ok()
            .map(|bundle| format!("valid {field} options: {}", bundle.options(*field).join(", "))),
        _ => None,
    };
    match guidance {
        Some(message) => err.context(message),
        None => err,
    }
}

fn cmd_summary(path: &Path, export: Option<&Path>) -> anyhow::Result<()> {
    let Some(summary) = EvaluationSummary::load_or_warn(path) else {
        println!("Model evaluation summary file not found.");
        return Ok(());
    };

    println!("{}", summary.render()?);

    if let Some(out) = export {
        let bytes = summary.to_csv_bytes()?;
        fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))?;
        eprintln!("  Exported {} rows to {}", summary.num_rows(), out.display());
    }
    Ok(())
}
