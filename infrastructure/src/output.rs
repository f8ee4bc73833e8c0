//! Report file writer.
//!
//! Persists the brainstorm artifacts: one JSON file per provider with the
//! ideas it produced, plus a single reconciled summary file.

use ideastorm_domain::{ProviderReport, ReconciliationSummary};
use serde_json::json;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for the reconciled summary.
pub const SUMMARY_FILE: &str = "ideas_summary.json";

/// Writes brainstorm reports into an output directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at the given directory, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write one `ideas_{provider}_{model}.json` file per report.
    ///
    /// Each file carries `{provider, model, ideas}` — the raw answer text is
    /// not persisted. Returns the paths written.
    pub fn write_reports(&self, reports: &[ProviderReport]) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(reports.len());
        for report in reports {
            let name = format!(
                "ideas_{}_{}.json",
                sanitize(report.provider.as_str()),
                sanitize(&report.model)
            );
            let path = self.dir.join(name);
            let document = json!({
                "provider": report.provider,
                "model": report.model,
                "ideas": report.ideas,
            });
            let json = serde_json::to_string_pretty(&document).map_err(io::Error::other)?;
            std::fs::write(&path, json)?;
            info!(
                "Wrote {} ideas from {} to {}",
                report.ideas.len(),
                report.provider,
                path.display()
            );
            paths.push(path);
        }
        Ok(paths)
    }

    /// Write the reconciled summary to `ideas_summary.json`.
    pub fn write_summary(&self, summary: &ReconciliationSummary) -> io::Result<PathBuf> {
        let path = self.dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
        std::fs::write(&path, json)?;
        info!(
            "Wrote summary with {} unique ideas to {}",
            summary.unique_ideas.len(),
            path.display()
        );
        Ok(path)
    }

    /// The directory reports are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Replace path-hostile characters so model names like
/// `accounts/fireworks/llama` stay on one file name.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '-',
            _ => c,
        })
        .collect()
}
