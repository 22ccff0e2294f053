//! Shared helpers for the `savanna` admin binary.

use std::io::{BufRead, Write};

use anyhow::Context;
use savanna_upload::{BatchProgress, BatchSummary, FileStatus};
use serde::Serialize;

/// Initialize tracing for the CLI. Quieter than the server default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("savanna=info")),
        )
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Asks a yes/no question. Anything but `y`/`yes` (case-insensitive) is a no.
pub fn confirm<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Question shown before deleting a category that still has photos.
pub fn orphan_prompt(name: &str, photo_count: usize) -> String {
    if photo_count == 0 {
        format!("Delete category '{}'?", name)
    } else {
        format!(
            "Delete category '{}'? {} photo(s) will keep pointing at it and stop showing under any category.",
            name, photo_count
        )
    }
}

/// `[2/5] beach.jpg: uploaded https://...`
pub fn progress_line(progress: &BatchProgress) -> String {
    let detail = match &progress.last.status {
        FileStatus::Uploaded { url } => format!("uploaded {}", url),
        FileStatus::Failed { reason } => format!("failed: {}", reason),
    };
    format!(
        "[{}/{}] {}: {}",
        progress.completed, progress.total, progress.last.filename, detail
    )
}

/// Summary line followed by one line per failed file.
pub fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![summary.message()];
    lines.extend(
        summary
            .failures
            .iter()
            .map(|f| format!("  {}: {}", f.filename, f.reason)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use savanna_upload::{FileFailure, FileOutcome};
    use std::io::Cursor;

    #[test]
    fn test_confirm_accepts_yes_only() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut input = Cursor::new(answer.as_bytes());
            let mut output = Vec::new();
            assert_eq!(confirm("Delete?", &mut input, &mut output).unwrap(), expected);
            assert_eq!(String::from_utf8(output).unwrap(), "Delete? [y/N] ");
        }
    }

    #[test]
    fn test_orphan_prompt_mentions_count() {
        assert_eq!(orphan_prompt("Events", 0), "Delete category 'Events'?");
        assert!(orphan_prompt("Weddings", 4).contains("4 photo(s)"));
    }

    #[test]
    fn test_progress_line() {
        let progress = BatchProgress {
            completed: 2,
            total: 5,
            last: FileOutcome {
                filename: "two.jpg".to_string(),
                status: FileStatus::Failed {
                    reason: "File too large".to_string(),
                },
            },
        };
        assert_eq!(progress_line(&progress), "[2/5] two.jpg: failed: File too large");
    }

    #[test]
    fn test_summary_lines_list_failures() {
        let summary = BatchSummary {
            success_count: 1,
            total_count: 2,
            uploaded: Vec::new(),
            failures: vec![FileFailure {
                filename: "b.jpg".to_string(),
                reason: "Upload rejected".to_string(),
            }],
        };
        assert_eq!(
            summary_lines(&summary),
            vec!["1 of 2 files uploaded", "  b.jpg: Upload rejected"]
        );
    }
}
