use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::detail::DetailRecord;
use crate::listing::ListingEntry;

/// One pull request as written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: usize,
    pub instance_id: String,
    pub repo: String,
    pub title: String,
    pub case_number: String,
    pub url: String,
    pub conversation: String,
    pub commits: String,
    pub checks: String,
    pub files_changed: String,
}

#[derive(Debug, Deserialize)]
struct TaskFile {
    #[serde(rename = "pullRequests")]
    pull_requests: Vec<Task>,
}

/// Join listing rows with their detail records, position for position.
///
/// Panics if the two sides differ in length: every listing row must have
/// produced exactly one detail record.
pub fn build_tasks(entries: Vec<ListingEntry>, details: Vec<DetailRecord>) -> Vec<Task> {
    assert_eq!(
        entries.len(),
        details.len(),
        "listing entries and detail records out of step"
    );

    entries
        .into_iter()
        .zip(details)
        .enumerate()
        .map(|(i, (entry, detail))| Task {
            id: i + 1,
            instance_id: entry.instance_id,
            repo: entry.repo,
            title: detail.title,
            case_number: detail.case_number,
            url: entry.detail_url,
            conversation: detail.conversation,
            commits: detail.commits,
            checks: detail.checks,
            files_changed: detail.files_changed,
        })
        .collect()
}

/// Serialize `{"pullRequests": [...]}` with 2-space indentation.
pub fn to_json(tasks: &[Task]) -> Result<String> {
    #[derive(Serialize)]
    struct Out<'a> {
        #[serde(rename = "pullRequests")]
        pull_requests: &'a [Task],
    }
    Ok(serde_json::to_string_pretty(&Out { pull_requests: tasks })?)
}

/// Replace `path` with the serialized tasks. The document is written to a
/// temp file in the same directory and persisted over the target; on failure
/// the temp file is removed and `path` is left as it was.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let json = to_json(tasks)?;

    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} (run 'run' first?)", path.display()))?;
    let file: TaskFile =
        serde_json::from_str(&raw).with_context(|| format!("Malformed {}", path.display()))?;
    Ok(file.pull_requests)
}
