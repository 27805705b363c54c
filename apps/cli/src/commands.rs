//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tutorial_llms_core::discovery::scan_tutorials;
use tutorial_llms_core::hooks::HostHooks;
use tutorial_llms_core::pipeline::ProgressReporter;
use tutorial_llms_shared::{AppConfig, GenerateConfig, GenerateReport, init_config, load_config};

use crate::watch;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// tutorial-llms — render tutorial content into llms.txt files.
#[derive(Parser)]
#[command(
    name = "tutorial-llms",
    version,
    about = "Render a tutorial content tree into llms.txt, llms-full.txt and per-tutorial text files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./tutorial-llms.toml when present).
    #[arg(long, global = true, env = "TUTORIAL_LLMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate all output files once (run after a site build).
    Generate {
        /// Tutorial content root.
        #[arg(long)]
        content_root: Option<PathBuf>,

        /// Output directory (the site's build output).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the generation report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate once, then regenerate on every tutorial content change.
    Watch {
        /// Tutorial content root.
        #[arg(long)]
        content_root: Option<PathBuf>,

        /// Output directory for regenerated files.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List discovered tutorials and their lessons.
    List {
        /// Tutorial content root.
        #[arg(long)]
        content_root: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default tutorial-llms.toml into the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "tutorial_llms=info",
        1 => "tutorial_llms=debug",
        _ => "tutorial_llms=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Generate {
            content_root,
            out,
            json,
        } => {
            let config = resolve(config_path, content_root, out)?;
            cmd_generate(config, json).await
        }
        Command::Watch { content_root, out } => {
            let config = resolve(config_path, content_root, out)?;
            watch::run(config).await
        }
        Command::List { content_root } => {
            let config = resolve(config_path, content_root, None)?;
            cmd_list(&config).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config file and apply CLI overrides.
fn resolve(
    config_path: Option<&Path>,
    content_root: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<GenerateConfig> {
    let app = load_config(config_path)?;
    Ok(apply_overrides(GenerateConfig::from(&app), content_root, out))
}

fn apply_overrides(
    mut config: GenerateConfig,
    content_root: Option<PathBuf>,
    out: Option<PathBuf>,
) -> GenerateConfig {
    if let Some(root) = content_root {
        config.layout.root = root;
    }
    if let Some(out) = out {
        config.output_dir = out;
    }
    config
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(config: GenerateConfig, json: bool) -> Result<()> {
    info!(
        content_root = %config.layout.root.display(),
        out = %config.output_dir.display(),
        "generating llms.txt files"
    );

    let output_dir = config.output_dir.clone();
    let hooks = HostHooks::new(config);
    let reporter = CliProgress::new();
    let report = hooks.on_build_finished(&output_dir, &reporter).await;
    reporter.spinner.finish_and_clear();
    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("  Generated {} tutorial files", report.tutorial_count);
    println!("  Output: {}", output_dir.display());
    for file in &report.files {
        println!("    {:<40} {:>8} bytes", file.path, file.size_bytes);
    }
    println!("  Time:   {:.1}s", report.elapsed_ms as f64 / 1000.0);
    println!();

    Ok(())
}

async fn cmd_list(config: &GenerateConfig) -> Result<()> {
    let tutorials = scan_tutorials(&config.layout).await?;

    if tutorials.is_empty() {
        println!("No tutorials found under {}", config.layout.root.display());
        return Ok(());
    }

    for tutorial in &tutorials {
        println!("{} ({})", tutorial.title, tutorial.slug);
        for lesson in &tutorial.lessons {
            let marker = if lesson.solution_dir.is_some() {
                " [solution]"
            } else {
                ""
            };
            println!("  {:>3}. {}{marker}", lesson.number, lesson.title);
        }
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn tutorial_rendered(&self, slug: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {slug}"));
    }

    fn done(&self, _report: &GenerateReport) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let base = GenerateConfig::from(&AppConfig::default());
        let config = apply_overrides(
            base.clone(),
            Some(PathBuf::from("content")),
            Some(PathBuf::from("public")),
        );
        assert_eq!(config.layout.root, PathBuf::from("content"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.site_title, base.site_title);

        let untouched = apply_overrides(base.clone(), None, None);
        assert_eq!(untouched.output_dir, base.output_dir);
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "tutorial-llms",
            "-vv",
            "generate",
            "--out",
            "dist",
            "--json",
        ])
        .expect("parse");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Generate { json: true, out: Some(_), content_root: None }
        ));
    }
}
