use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::detail::fetch_detail;
use crate::listing::fetch_listing;
use crate::source::PageSource;
use crate::tasks::{build_tasks, write_tasks};

pub const DEFAULT_LISTING_URLS: [&str; 2] = [
    "https://huggingface.co/datasets/NoCode-bench/NoCode-bench_Verified/viewer/default/test",
    "https://huggingface.co/datasets/NoCode-bench/NoCode-bench_Verified/viewer/default/test?p=1",
];

pub const DEFAULT_OUTPUT_PATH: &str = "public/requestOptions.json";

#[derive(Debug)]
pub struct RunStats {
    pub tasks: usize,
    pub output: PathBuf,
}

/// Listing → one detail fetch per row, in order → write.
///
/// Nothing is written unless every page was fetched and parsed; the first
/// failure ends the run and leaves `output` as it was.
pub async fn run<S: PageSource>(
    source: &S,
    listing_urls: &[String],
    output: &Path,
) -> Result<RunStats> {
    let entries = fetch_listing(source, listing_urls)
        .await
        .context("Failed to scrape listing pages")?;
    info!("Found {} entries across {} listing pages", entries.len(), listing_urls.len());

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut details = Vec::with_capacity(entries.len());
    for entry in &entries {
        let detail = fetch_detail(source, &entry.detail_url)
            .await
            .with_context(|| format!("Failed to scrape {} ({})", entry.instance_id, entry.detail_url))?;
        details.push(detail);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let tasks = build_tasks(entries, details);
    write_tasks(output, &tasks)?;
    info!("Wrote {} pull requests to {}", tasks.len(), output.display());

    Ok(RunStats {
        tasks: tasks.len(),
        output: output.to_path_buf(),
    })
}
