//! CLI command execution.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::config::Settings;
use crate::gitlab::{GitLabClient, RemoteDirectory};
use crate::mirror::{
    DestinationBuilder, FailurePolicy, ForkOrchestrator, ForkReport, MirrorEvent, MirrorObserver,
    SourceReader, TracingObserver,
};

use super::args::Cli;

impl TryFrom<&Cli> for Settings {
    type Error = crate::error::MirrorError;

    fn try_from(cli: &Cli) -> std::result::Result<Self, Self::Error> {
        let policy = if cli.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::FailFast
        };
        Self::new(
            &cli.source,
            &cli.destination,
            &cli.url,
            cli.token.as_deref(),
            cli.concurrency,
            policy,
            Duration::from_secs(cli.timeout),
        )
    }
}

/// Traces every event and prints each fork to stdout.
struct ConsoleObserver;

impl MirrorObserver for ConsoleObserver {
    fn notify(&self, event: &MirrorEvent) {
        TracingObserver.notify(event);
        if let Some(line) = console_line(event) {
            println!("{line}");
        }
    }
}

/// Line printed to stdout for an event, if any.
fn console_line(event: &MirrorEvent) -> Option<String> {
    match event {
        MirrorEvent::ProjectForked { name, .. } => Some(format!("Forked project: {name}")),
        _ => None,
    }
}

// === Command Execution ===

pub async fn execute(cli: Cli) -> Result<()> {
    let settings = Settings::try_from(&cli)?;
    let client = GitLabClient::new(&settings.url, &settings.token, settings.timeout)
        .context("Failed to set up GitLab client")?;

    let mut stdout = std::io::stdout();
    let report = run_mirror(Arc::new(client), &settings, &ConsoleObserver, &mut stdout).await?;
    ensure_all_forked(&report)
}

/// Turn a report with failed forks into an error so the process exits
/// non-zero.
fn ensure_all_forked(report: &ForkReport) -> Result<()> {
    if !report.failed.is_empty() {
        bail!("{} projects failed to fork", report.failed.len());
    }
    Ok(())
}

/// Run all three phases and write the listings and summary to `out`.
///
/// # Errors
///
/// Fails on the first phase error; see [`crate::MirrorError`].
pub async fn run_mirror<C: RemoteDirectory + 'static>(
    client: Arc<C>,
    settings: &Settings,
    observer: &dyn MirrorObserver,
    out: &mut impl Write,
) -> Result<ForkReport> {
    let source = SourceReader::new(client.as_ref(), observer)
        .read(&settings.source)
        .await?;
    writeln!(out, "Source Groups [id]:")?;
    write!(out, "{}", source.render())?;

    let destination = DestinationBuilder::new(client.as_ref(), observer)
        .build(&settings.destination, &source)
        .await?;
    writeln!(out, "Destination Groups [id]:")?;
    write!(out, "{}", destination.tree.render())?;

    let report = ForkOrchestrator::new(client)
        .with_concurrency(settings.concurrency)
        .with_policy(settings.policy)
        .run(&source, &destination, observer)
        .await?;

    writeln!(out, "{}", report.summary())?;
    if !report.failed.is_empty() {
        writeln!(out, "{} projects failed to fork:", report.failed.len())?;
        for failure in &report.failed {
            writeln!(
                out,
                "  {} -> group {}: {}",
                failure.project.full_path, failure.namespace, failure.error
            )?;
        }
    }

    Ok(report)
}
