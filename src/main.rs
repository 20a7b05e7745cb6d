mod detail;
mod error;
mod listing;
mod pipeline;
mod selectors;
mod source;
mod tasks;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::pipeline::{DEFAULT_LISTING_URLS, DEFAULT_OUTPUT_PATH};
use crate::source::HttpSource;
use crate::tasks::Task;

#[derive(Parser)]
#[command(name = "pr_scraper", about = "NoCode-bench pull request scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing pages and every linked pull request, then write the JSON file
    Run {
        /// Output file (overwritten)
        #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
        /// Listing page to scrape; repeat for several (default: the two dataset viewer pages)
        #[arg(long = "listing-url")]
        listing_urls: Vec<String>,
    },
    /// Table of the pull requests in the output file
    List {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
        /// Only repos containing this text
        #[arg(short, long)]
        repo: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// All fields of one pull request (default: the first)
    Show {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
        instance_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { output, listing_urls } => {
            let urls = if listing_urls.is_empty() {
                DEFAULT_LISTING_URLS.iter().map(|u| u.to_string()).collect()
            } else {
                listing_urls
            };
            let source = HttpSource::new().context("Failed to build HTTP client")?;
            let stats = pipeline::run(&source, &urls, &output).await?;
            println!(
                "Saved {} pull requests to {}.",
                stats.tasks,
                stats.output.display()
            );
            Ok(())
        }
        Commands::List { output, repo, limit } => list(&output, repo.as_deref(), limit),
        Commands::Show { output, instance_id } => show(&output, instance_id.as_deref()),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn list(output: &Path, repo: Option<&str>, limit: usize) -> anyhow::Result<()> {
    let tasks = tasks::load_tasks(output)?;
    let rows: Vec<&Task> = tasks
        .iter()
        .filter(|t| repo.map_or(true, |r| t.repo.contains(r)))
        .take(limit)
        .collect();
    if rows.is_empty() {
        println!("No pull requests found.");
        return Ok(());
    }

    println!(
        "{:>3} | {:<28} | {:<20} | {:<8} | {:<40} | {:<6}",
        "#", "Instance", "Repo", "Case", "Title", "Files"
    );
    println!("{}", "-".repeat(120));
    for t in &rows {
        println!(
            "{:>3} | {:<28} | {:<20} | {:<8} | {:<40} | {:<6}",
            t.id,
            cell(&t.instance_id, 28),
            cell(&t.repo, 20),
            cell(&t.case_number, 8),
            cell(&t.title, 40),
            cell(&t.files_changed, 6),
        );
    }

    println!("\n{} of {} pull requests", rows.len(), tasks.len());
    Ok(())
}

fn show(output: &Path, instance_id: Option<&str>) -> anyhow::Result<()> {
    let tasks = tasks::load_tasks(output)?;
    let task = match instance_id {
        Some(id) => tasks
            .iter()
            .find(|t| t.instance_id == id)
            .with_context(|| format!("No pull request with instance_id {}", id))?,
        None => tasks.first().context("Output file has no pull requests")?,
    };

    println!("Title:         {}", task.title);
    println!("Case number:   {}", task.case_number);
    println!("Repo:          {}", task.repo);
    println!("Instance ID:   {}", task.instance_id);
    println!("URL:           {}", task.url);
    println!("Conversation:  {}", task.conversation);
    println!("Commits:       {}", task.commits);
    println!("Checks:        {}", task.checks);
    println!("Files changed: {}", cell(&task.files_changed, usize::MAX));
    Ok(())
}

/// Table/detail text: `-` for an empty field, clipped to `max` chars.
fn cell(s: &str, max: usize) -> String {
    if s.is_empty() {
        "-".to_string()
    } else if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max).collect::<String>())
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
