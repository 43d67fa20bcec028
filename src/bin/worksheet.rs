//! CLI binary for yt-worksheet.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `WorksheetConfig`, sweeps the artifact directory, then prints the status.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use yt_worksheet::config::{DEFAULT_SYNTHESIS_TIMEOUT_SECS, DEFAULT_TRANSCRIPT_TIMEOUT_SECS};
use yt_worksheet::{
    generate_to_file, process_video, sweep, PipelineProgressCallback, ProgressCallback, Stage,
    WorksheetArtifact, WorksheetConfig, WorksheetError, WorksheetOutcome,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one spinner whose message follows the stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Worksheet");
        bar.set_message("starting…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: &Stage) {
        if !stage.is_terminal() {
            self.bar.set_message(format!("{stage}…"));
        }
    }

    fn on_complete(&self, artifact: &WorksheetArtifact) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} rows  {}",
            green("✔"),
            bold(&artifact.row_count.to_string()),
            dim(&format!(
                "transcript {} chars ({})  ·  {:.1}s",
                artifact.stats.transcript_chars,
                artifact.transcript_language,
                artifact.stats.total_ms as f64 / 1000.0
            )),
        );
    }

    fn on_failure(&self, error: &WorksheetError) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", red("✘"), red(&error.kind().to_string()));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate a worksheet (path printed on success)
  worksheet https://www.youtube.com/watch?v=dQw4w9WgXcQ

  # Keep a copy somewhere permanent
  worksheet https://youtu.be/dQw4w9WgXcQ -o ~/worksheets/lesson1.docx

  # Prefer Korean captions, then English
  worksheet --languages ko,en https://youtu.be/dQw4w9WgXcQ

  # Another provider
  worksheet --provider openai --model gpt-4.1-mini https://youtu.be/dQw4w9WgXcQ

  # JSON outcome for scripting
  worksheet --json https://youtu.be/dQw4w9WgXcQ > outcome.json

  # Only remove expired worksheets
  worksheet --sweep-only

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  RUST_LOG                Override the log filter (e.g. yt_worksheet=debug)

ARTIFACTS:
  Worksheets are written to the artifact directory (default
  $TMPDIR/yt-worksheet) as worksheet_<random>.docx and removed after
  30 minutes. Every run sweeps expired files first. Use -o to keep one.
"#;

/// Turn a YouTube video into a fill-in-the-blank worksheet.
#[derive(Parser, Debug)]
#[command(
    name = "worksheet",
    version,
    about = "Turn a YouTube video into a fill-in-the-blank English worksheet (.docx)",
    long_about = "Fetch a YouTube video's captions, ask an LLM to blank one word or phrase per \
sentence and translate each sentence into Korean, and write the result as a three-column \
.docx table. Uses Google Gemini by default; any edgequake-llm provider works.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// YouTube URL (or any string containing the 11-character video ID).
    #[arg(required_unless_present = "sweep_only")]
    url: Option<String>,

    /// Also copy the worksheet to this file.
    #[arg(short, long, env = "WORKSHEET_OUTPUT")]
    output: Option<PathBuf>,

    /// Artifact directory (shared, swept).
    #[arg(long, env = "WORKSHEET_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// LLM provider: gemini, openai, anthropic, mistral, ollama.
    #[arg(long, env = "WORKSHEET_PROVIDER", default_value = "gemini")]
    provider: String,

    /// LLM model ID.
    #[arg(long, env = "WORKSHEET_MODEL", default_value = "gemini-1.5-pro")]
    model: String,

    /// Caption languages in order of preference.
    #[arg(long, env = "WORKSHEET_LANGUAGES", value_delimiter = ',', default_value = "en,ko")]
    languages: Vec<String>,

    /// Heading above the table.
    #[arg(long, env = "WORKSHEET_TITLE")]
    title: Option<String>,

    /// Transcript retrieval timeout in seconds.
    #[arg(long, env = "WORKSHEET_TRANSCRIPT_TIMEOUT", default_value_t = DEFAULT_TRANSCRIPT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    transcript_timeout: u64,

    /// Generation timeout in seconds.
    #[arg(long, env = "WORKSHEET_SYNTHESIS_TIMEOUT", default_value_t = DEFAULT_SYNTHESIS_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    synthesis_timeout: u64,

    /// Print the outcome as JSON on stdout.
    #[arg(long, env = "WORKSHEET_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "WORKSHEET_NO_PROGRESS")]
    no_progress: bool,

    /// Run one janitor sweep and exit.
    #[arg(long)]
    sweep_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WORKSHEET_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the status line and errors.
    #[arg(short, long, env = "WORKSHEET_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; keep INFO logs out of
    // its way unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.sweep_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PipelineProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Sweep expired artifacts ──────────────────────────────────────────
    let dir = config.output_dir.clone();
    let retention = config.retention();
    let removed = tokio::task::spawn_blocking(move || sweep(&dir, retention))
        .await
        .context("Sweep task failed")?;

    if cli.sweep_only {
        if cli.json {
            println!("{}", serde_json::json!({ "removed": removed }));
        } else {
            println!(
                "Removed {} expired worksheet(s) from {}",
                removed,
                config.output_dir.display()
            );
        }
        return Ok(());
    }

    // ── Run the request ──────────────────────────────────────────────────
    let url = cli.url.as_deref().unwrap_or_default();
    let outcome = match cli.output {
        Some(ref dest) => match generate_to_file(url, dest, &config).await {
            Ok(artifact) => {
                if !cli.quiet && !cli.json {
                    eprintln!("   copied to {}", bold(&dest.display().to_string()));
                }
                WorksheetOutcome::success(artifact)
            }
            Err(e) => WorksheetOutcome::failure(&e),
        },
        None => process_video(url, &config).await,
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        println!("{}", outcome.status);
        if let Some(ref artifact) = outcome.artifact {
            println!("{}", artifact.path.display());
        }
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn build_config(cli: &Cli, progress_cb: Option<ProgressCallback>) -> Result<WorksheetConfig> {
    let mut builder = WorksheetConfig::builder()
        .provider_name(&cli.provider)
        .model(&cli.model)
        .languages(cli.languages.iter().cloned())
        .transcript_timeout_secs(cli.transcript_timeout)
        .synthesis_timeout_secs(cli.synthesis_timeout);

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
