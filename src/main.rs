use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use codegauge::config::{AnalysisConfig, ReportFormat};
use codegauge::io::output::{create_writer, render_terminal_summary};
use codegauge::io::ProgressReporter;
use codegauge::orchestrator::Orchestrator;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    /// Colored one-screen summary
    Terminal,
    Json,
    Html,
    Markdown,
}

#[derive(Parser, Debug)]
#[command(name = "codegauge")]
#[command(about = "Code quality analyzer with structural metrics and AI-assisted insights", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze the files matched by the given glob patterns
    Analyze {
        /// Glob patterns selecting the files to analyze
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Configuration file
        #[arg(short, long, default_value = "codegauge.toml")]
        config: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: CliFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable AI-assisted scoring and insight generation
        #[arg(long = "no-ai")]
        no_ai: bool,

        /// Disable the security analyzer
        #[arg(long = "no-security")]
        no_security: bool,

        /// Disable the performance analyzer
        #[arg(long = "no-performance")]
        no_performance: bool,

        /// Disable the documentation analyzer
        #[arg(long = "no-documentation")]
        no_documentation: bool,

        /// Disable the test analyzer
        #[arg(long = "no-tests")]
        no_tests: bool,

        /// Hide the progress counter
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write a default codegauge.toml to the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            patterns,
            config,
            format,
            output,
            no_ai,
            no_security,
            no_performance,
            no_documentation,
            no_tests,
            quiet,
        } => {
            let mut analysis_config = AnalysisConfig::load(&config)?;
            if no_ai {
                analysis_config.enable_ai = false;
            }
            if no_security {
                analysis_config.enable_security_scan = false;
            }
            if no_performance {
                analysis_config.enable_performance_analysis = false;
            }
            if no_documentation {
                analysis_config.enable_documentation_analysis = false;
            }
            if no_tests {
                analysis_config.enable_test_analysis = false;
            }
            if let Some(report_format) = report_format(format) {
                analysis_config.output.format = report_format;
            }
            run_analysis(analysis_config, &patterns, format, output.as_deref(), quiet)
        }
        Commands::Init { force } => init_config(force),
    }
}

fn report_format(format: CliFormat) -> Option<ReportFormat> {
    match format {
        CliFormat::Terminal => None,
        CliFormat::Json => Some(ReportFormat::Json),
        CliFormat::Html => Some(ReportFormat::Html),
        CliFormat::Markdown => Some(ReportFormat::Markdown),
    }
}

fn run_analysis(
    config: AnalysisConfig,
    patterns: &[String],
    format: CliFormat,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let output_config = config.output.clone();
    let progress = if quiet {
        ProgressReporter::hidden()
    } else {
        ProgressReporter::new()
    };
    let orchestrator = Orchestrator::new(config)?.with_observer(Arc::new(progress));
    let result = orchestrator.analyze(patterns)?;

    if matches!(format, CliFormat::Terminal) {
        print!("{}", render_terminal_summary(&result));
        return Ok(());
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            create_writer(file, &output_config).write_results(&result)?;
            log::info!("report written to {}", path.display());
        }
        None => {
            create_writer(std::io::stdout(), &output_config).write_results(&result)?;
        }
    }
    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = Path::new("codegauge.toml");
    if path.exists() && !force {
        anyhow::bail!("codegauge.toml already exists (use --force to overwrite)");
    }
    let contents =
        toml::to_string_pretty(&AnalysisConfig::default()).context("failed to render defaults")?;
    std::fs::write(path, contents).context("failed to write codegauge.toml")?;
    println!("wrote codegauge.toml");
    Ok(())
}
