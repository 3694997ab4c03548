//! File replace: find and replace a word across PDF, CSV, XML and XPT files

use clap::Parser;
use file_replace::cli::{self, Cli, Commands, ConfigAction};
use file_replace::config::Config;
use file_replace::error::{FileReplaceError, Result};
use file_replace::input::InputManager;
use file_replace::output::formatter::save_report_to_file;
use file_replace::output::{archive, ReplacementSummary, ReportGenerator};
use file_replace::processing::{Matcher, ReplaceEngine};
use file_replace::web;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

/// Exit status when at least one file could not be processed
const EXIT_PARTIAL_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    match run_command(cli.command, config, &config_path).await {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Command failed: {}", e);
            process::exit(1);
        }
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<i32> {
    match command {
        Commands::Replace {
            files,
            find,
            replace,
            case_sensitive,
            ignore_case,
            archive: archive_arg,
            out_dir,
            output,
            save,
            dry_run,
        } => {
            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(FileReplaceError::InvalidInput)?,
                None => config.output.format,
            };
            let matcher = Matcher::new(
                &find,
                &replace,
                cli::resolve_case_sensitivity(case_sensitive, ignore_case, config.replace.case_sensitive),
            )?;
            let engine = ReplaceEngine::new(&config)?;

            let mut input_manager = InputManager::new();
            let uploads = input_manager.load_all(files.as_slice()).await?;
            info!(
                "Loaded {} files ({} bytes)",
                uploads.len(),
                input_manager.loaded_bytes()
            );

            let progress = ProgressBar::new(uploads.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let mut outcomes = Vec::with_capacity(uploads.len());
            for upload in &uploads {
                progress.set_message(upload.name.clone());
                outcomes.push(engine.process_file(upload, &matcher));
                progress.inc(1);
            }
            progress.finish_and_clear();

            let mut summary = ReplacementSummary::from_outcomes(&matcher, &outcomes);

            if dry_run {
                summary = summary.as_dry_run();
            } else if summary.processed_count() == 0 {
                warn!("No supported files were processed; nothing written");
            } else {
                let archive_path =
                    archive_arg.unwrap_or_else(|| PathBuf::from(&config.output.archive_name));
                let format = cli::archive_format_for(&archive_path, config.output.archive_format);
                let bytes = archive::bundle(&outcomes, format)?;
                write_atomically(&archive_path, &bytes)?;
                info!("Wrote {} ({} bytes)", archive_path.display(), bytes.len());
                summary = summary.with_archive(archive_path.display().to_string());

                if let Some(dir) = out_dir {
                    let written = archive::write_directory(&dir, &outcomes)?;
                    info!("Wrote {} files to {}", written.len(), dir.display());
                }
            }

            let generator = ReportGenerator::with_options(config.output.color_output, true, true);
            let report = generator.generate_report(&summary, &output_format)?;
            println!("{}", report);

            if let Some(save_path) = save {
                // Saved reports never carry terminal colour codes
                let plain = ReportGenerator::with_options(false, true, true)
                    .generate_report(&summary, &output_format)?;
                save_report_to_file(&plain, &save_path)?;
                info!("Summary saved to {}", save_path.display());
            }

            if summary.failed_count() > 0 {
                Ok(EXIT_PARTIAL_FAILURE)
            } else {
                Ok(0)
            }
        }

        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.web.bind = bind;
            }
            web::start_server(config).await?;
            Ok(0)
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        FileReplaceError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("# {}\n", config_path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(config_path)?;
                    println!("Configuration reset: {}", config_path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
            Ok(0)
        }
    }
}

/// Write through a temp file in the target directory so a failed run never leaves a partial archive
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| FileReplaceError::Io(e.error))?;
    Ok(())
}
