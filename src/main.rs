use anyhow::Result;
use auditfmt::{
    config::Config,
    input::{load_records, load_reverse_deps},
    output::{formatter_for, FormatterOptions, OutputFormat},
    AuditRecord,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VULNERABLE: u8 = 3;
}

#[derive(Parser)]
#[command(name = "auditfmt")]
#[command(
    author,
    version,
    about = "Render dependency vulnerability audit results for the terminal"
)]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an audit result set
    Report {
        /// Audit service response (JSON array), or '-' for stdin
        #[arg(short, long)]
        records: PathBuf,

        /// Reverse dependency index (JSON object keyed by name-version)
        #[arg(short = 'd', long)]
        reverse_deps: Option<PathBuf>,

        /// Only show vulnerable packages and the summary
        #[arg(short, long)]
        quiet: bool,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Ecosystem prefix stripped from coordinates (default: pkg:gem/)
        #[arg(long)]
        prefix: Option<String>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with code 3 if any dependency is vulnerable
        #[arg(long)]
        fail_on_vulnerable: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Report {
            records,
            reverse_deps,
            quiet,
            format,
            no_color,
            prefix,
            output,
            fail_on_vulnerable,
        } => {
            let config = Config::load_from(&config_path)?;

            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
            let color = !no_color
                && config.color
                && output.is_none()
                && std::env::var_os("NO_COLOR").is_none();

            let options = FormatterOptions {
                quiet: quiet || config.quiet,
                color,
                prefix: prefix.unwrap_or_else(|| config.ecosystem_prefix.clone()),
            };

            let records = config.ignore.apply(load_records(&records)?);
            let reverse_deps = load_reverse_deps(reverse_deps.as_deref())?;

            let formatter = formatter_for(format, &options);
            let report = formatter.render(&records, &reverse_deps)?;

            if let Some(path) = output {
                std::fs::write(&path, format!("{}\n", report))?;
                debug!(path = %path.display(), "report written");
            } else {
                formatter.emit(&report);
            }

            Ok(determine_exit_code(&records, fail_on_vulnerable))
        }
        Commands::Config { init, path } => {
            handle_config(&config_path, init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("auditfmt=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Determine the exit code based on vulnerable records and --fail-on-vulnerable
fn determine_exit_code(records: &[AuditRecord], fail_on_vulnerable: bool) -> u8 {
    if fail_on_vulnerable && records.iter().any(AuditRecord::is_vulnerable) {
        exit_codes::VULNERABLE
    } else {
        exit_codes::SUCCESS
    }
}

fn handle_config(config_path: &Path, init: bool, show_path: bool) -> Result<()> {
    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save_to(config_path)?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'auditfmt config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
