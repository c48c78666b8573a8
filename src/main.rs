//! navio 命令行入口

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use navio::config::{config_file_exists, load_config, ConfigManager, NavioConfig};
use navio::core::{print_error_message, print_info_message, rewrite_document, PageState};
use navio::env::{core::LogLevel, core::NoColor, generate_env_docs, EnvVar};
use navio::error::NavioResult;
use navio::page::classify_url;
use navio::translator::translate;
use navio::utils::url::parse_absolute_url;

#[derive(Parser, Debug)]
#[command(
    name = "navio",
    version,
    about = "Rewrites Google Maps links into Apple Maps deep links"
)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate map URLs, printing `-` for URLs that cannot be translated
    Translate {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print how a page at URL would be handled
    Classify { url: String },

    /// Run the content script over an HTML document
    Rewrite {
        /// HTML file, or `-` for stdin
        input: String,

        /// Address the document is loaded from
        #[arg(long, value_name = "URL")]
        location: String,

        /// Write the document here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<String>,

        /// Document charset
        #[arg(short, long, value_name = "CHARSET")]
        encoding: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write a default configuration file to PATH instead
        #[arg(long, value_name = "PATH", conflicts_with = "env")]
        init: Option<String>,

        /// List the environment variables navio reads
        #[arg(long)]
        env: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        print_error_message(&format!("Error: {e}"));
        process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(LogLevel::get().unwrap_or_else(|_| "warn".to_string())),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!NoColor::get().unwrap_or(false))
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> NavioResult<()> {
    match cli.command {
        Command::Translate { urls } => {
            for url in urls {
                match translate(&url) {
                    Some(target) => print_info_message(&target),
                    None => print_info_message("-"),
                }
            }
            Ok(())
        }
        Command::Classify { url } => {
            let url = parse_absolute_url(&url)?;
            print_info_message(classify_url(&url).as_str());
            Ok(())
        }
        Command::Rewrite {
            input,
            location,
            output,
            encoding,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let location = parse_absolute_url(&location)?;

            let input_data = if input == "-" {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf)?;
                buf
            } else {
                fs::read(&input)?
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let report = runtime.block_on(rewrite_document(
                &input_data,
                encoding.as_deref(),
                location,
                config,
            ))?;

            match report.state {
                PageState::ScanningObserving { rewritten } => {
                    tracing::info!("Rewrote {} map links", rewritten)
                }
                state => tracing::info!("Page state: {:?}", state),
            }
            for url in &report.navigations {
                tracing::info!("Navigated to {}", url);
            }

            match output {
                Some(path) => fs::write(path, &report.html)?,
                None => io::stdout().write_all(&report.html)?,
            }
            Ok(())
        }
        Command::Config { init, env } => {
            if let Some(path) = init {
                ConfigManager::generate_example_config(&path)?;
                print_info_message(&format!("Wrote default configuration to {path}"));
                return Ok(());
            }

            if env {
                print!("{}", generate_env_docs());
                return Ok(());
            }

            if cli.config.is_none() && !config_file_exists() {
                tracing::info!("No configuration file found, showing defaults");
            }
            let config = resolve_config(cli.config.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// `--config` 指定的文件优先，仍然应用环境变量覆盖
fn resolve_config(path: Option<&str>) -> NavioResult<NavioConfig> {
    match path {
        Some(path) => {
            let mut config = ConfigManager::from_file(path)?.into_config();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
        None => Ok(load_config()),
    }
}
