//! rfpmerge - merge RFP documents and their response into a single PDF.

mod cli;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use rfpmerge::error::MergeError;
use rfpmerge::output::{OutputFormatter, display_archive_members, display_output};
use rfpmerge::utils::collect_paths_for_patterns;
use rfpmerge::config::ErrorPolicy;
use rfpmerge::{MergeMode, MergeSession};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        OutputFormatter::quiet().error(&format!("Error: {err:#}"));
        process::exit(exit_code(&err));
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rfpmerge=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<MergeError>()
        .map(MergeError::exit_code)
        .unwrap_or(1)
}

/// Main application logic.
async fn run(cli: Cli) -> anyhow::Result<()> {
    cli.validate()?;
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", rfpmerge::NAME, rfpmerge::VERSION));
        formatter.blank_line();
    }

    let mut session = MergeSession::start(&config).await?;
    formatter.debug(&format!("Scratch directory: {}", session.dir().display()));

    let paths = collect_paths_for_patterns(&cli.rfp)?;
    let batch = paths.len() > 1 || cli.archive.is_some();
    let skip_unreadable = config
        .error_policy
        .unwrap_or(if batch { ErrorPolicy::SkipFailed } else { ErrorPolicy::Abort })
        .skips_failures();

    for path in &paths {
        match session.stage_rfp_path(path).await {
            Ok(staged) => formatter.debug(&format!("Staged RFP {}", staged.original_name)),
            Err(err) if skip_unreadable && err.is_recoverable() => {
                let name = file_name(path);
                formatter.warning(&format!("Skipping {name}: {err}"));
                session.record_unreadable_rfp(&name, &err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(archive) = &cli.archive {
        let name = file_name(archive);
        let bytes = read_archive(archive).await?;
        let members = session.stage_archive(&name, bytes).await?;

        if cli.list_archive {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&members)?);
            } else {
                // --list-archive prints even in quiet mode
                let listing = OutputFormatter::new(false, config.verbose);
                display_archive_members(&listing, &name, session.archive_members().unwrap_or(&[]));
            }
            return Ok(());
        }

        let selected = if cli.select.is_empty() {
            session.select_archive_pdfs()?
        } else {
            session.select_archive_members(&cli.select)?
        };
        if selected == 0 {
            formatter.warning(&format!("{name} contains no PDF documents"));
        } else {
            formatter.info(&format!("Selected {selected} document(s) from {name}"));
        }
    }

    if let Some(response) = &cli.response {
        session.stage_response_path(response).await?;
    }

    if let Some(output) = &cli.output {
        if session.mode() == MergeMode::Single {
            formatter.warning("--output is ignored when merging a single RFP");
        }
        session.set_output_name(output.clone());
    }

    if !session.is_ready() {
        return Err(MergeError::MissingInput {
            what: "RFP document",
        }
        .into());
    }

    formatter.info(&format!(
        "Merging {} RFP document(s) ({:?} mode, {:?})...",
        session.rfps().len(),
        session.mode(),
        session.error_policy()
    ));

    let output = session.merge().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        formatter.blank_line();
        display_output(&formatter, &output);
    }

    Ok(())
}

async fn read_archive(path: &Path) -> anyhow::Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MergeError::file_not_found(path.to_path_buf()).into())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read archive {}", path.display())),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
