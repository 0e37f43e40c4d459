//! `simpleui`: generate HTML, CSS and JavaScript from SimpleUi documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simpleui_ast::has_errors;
use simpleui_codegen::class_completions;

mod config;
mod generate;
mod logging;
mod watch;

use config::load_config;
use generate::{check_document, input_dir, load_base_stylesheet, load_document, Job};
use logging::init_logging;
use watch::FileWatcher;

#[derive(Parser)]
#[command(name = "simpleui")]
#[command(version)]
#[command(about = "Generate HTML, CSS and JavaScript from SimpleUi documents", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to simpleui.toml next to the input)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate index.html, stylesheet.css and script.js
    Generate {
        /// Document JSON
        file: PathBuf,
        /// Output directory
        #[arg(short, long)]
        destination: Option<PathBuf>,
        /// Regenerate whenever the input changes
        #[arg(short, long)]
        watch: bool,
        /// Base stylesheet classes are copied from
        #[arg(long)]
        base_css: Option<PathBuf>,
    },

    /// Validate a document and print its diagnostics
    Check {
        /// Document JSON
        file: PathBuf,
        /// Base stylesheet the class check runs against
        #[arg(long)]
        base_css: Option<PathBuf>,
    },

    /// List the classes the base stylesheet defines
    Classes {
        /// Base stylesheet to list
        #[arg(long)]
        base_css: Option<PathBuf>,
    },
}

impl Commands {
    /// Where an implicit `simpleui.toml` is looked up.
    fn config_dir(&self) -> PathBuf {
        match self {
            Commands::Generate { file, .. } | Commands::Check { file, .. } => input_dir(file),
            Commands::Classes { .. } => PathBuf::from("."),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref(), &cli.command.config_dir());
    let level = config.as_ref().ok().map(|c| c.log.level.as_str());
    init_logging(cli.verbose, level);
    let config = config?;

    match cli.command {
        Commands::Generate { file, destination, watch: keep_watching, base_css } => {
            let job = Job::new(file, destination, base_css, &config);
            if !keep_watching {
                generate::run(&job)?;
                return Ok(ExitCode::SUCCESS);
            }
            let watcher = FileWatcher::new(&job.input)
                .with_context(|| format!("watching {}", job.input.display()))?;
            if let Err(err) = generate::run(&job) {
                log::error!("{err:#}");
            }
            watch::watch(watcher, || {
                if let Err(err) = generate::run(&job) {
                    log::error!("{err:#}");
                }
            });
            Ok(ExitCode::FAILURE)
        }
        Commands::Check { file, base_css } => {
            let base_css = base_css.or(config.base_css);
            let clean = check(&file, base_css.as_deref())?;
            Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Classes { base_css } => {
            let base = load_base_stylesheet(base_css.or(config.base_css).as_deref())?;
            for item in class_completions(&base) {
                println!("{}\t{}", item.label, item.detail);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print diagnostics for `file`; `false` when any is an error.
fn check(file: &Path, base_css: Option<&Path>) -> Result<bool> {
    let doc = load_document(file)?;
    let base = load_base_stylesheet(base_css)?;
    let diags = check_document(&doc, &base);
    for d in &diags {
        println!("{}: {d}", file.display());
    }
    if has_errors(&diags) {
        return Ok(false);
    }
    log::info!("{}: no errors", file.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags() {
        let cli = Cli::parse_from(["simpleui", "generate", "page.json", "-d", "out", "-w"]);
        match cli.command {
            Commands::Generate { file, destination, watch, base_css } => {
                assert_eq!(file, PathBuf::from("page.json"));
                assert_eq!(destination, Some(PathBuf::from("out")));
                assert!(watch);
                assert!(base_css.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn config_is_searched_next_to_input() {
        let cli = Cli::parse_from(["simpleui", "check", "site/page.json"]);
        assert_eq!(cli.command.config_dir(), PathBuf::from("site"));
    }

    #[test]
    fn check_fails_on_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(
            &file,
            r#"{ "body": [ { "type": "UseComponent", "component": "Missing" } ] }"#,
        )
        .unwrap();
        assert!(!check(&file, None).unwrap());
    }
}
