mod candidates;
mod cli;
mod config;
mod error;
mod remote;
mod run;
mod scheduler;
mod ui;

use anyhow::Result;
use clap::Parser;
use console::Style;

use crate::candidates::SitePaths;
use crate::cli::Cli;
use crate::config::SyllabusMap;
use crate::remote::RemoteClient;
use crate::ui::RunProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration errors abort here, before any network activity.
    let map = SyllabusMap::load(&cli.syllabus_file)?;
    let subject_path = map.path_for(&cli.syllabus)?.to_string();
    let spec = cli.selection_spec()?;
    let site = SitePaths::new(&cli.base_url, &subject_path, cli.output.clone());

    let bold = Style::new().bold();
    println!(
        "Checking {} for {} ({}-{})",
        bold.apply_to(subject_path.trim_matches('/')),
        bold.apply_to(&spec.code),
        spec.years.start(),
        spec.years.end(),
    );

    let client = RemoteClient::new();
    let progress = RunProgress::new();
    let report = run::execute(
        &spec,
        &site,
        &client,
        &progress,
        cli.probe_workers as usize,
        cli.fetch_workers as usize,
    )
    .await;
    progress.finish();

    ui::print_summary(&report, site.output_root());
    Ok(())
}
