use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{CallError, Result};
use crate::models::SentimentResult;

pub const TRANSCRIPT_HEADER: &str = "Transcrição:";
pub const SENTIMENT_HEADER: &str = "Análise de Sentimentos (Analista):";

/// Render the transcript report
pub fn format_transcript(summary: &str) -> String {
    format!("{}\n{}\n", TRANSCRIPT_HEADER, summary)
}

/// Render the sentiment report, one `key: value` line per field
pub fn format_sentiment(result: &SentimentResult) -> String {
    let mut output = String::new();
    output.push_str(SENTIMENT_HEADER);
    output.push('\n');
    for (key, value) in result.fields() {
        output.push_str(&format!("{}: {}\n", key, value));
    }
    output
}

/// Write the transcript report, replacing any existing file
pub fn write_transcript(summary: &str, path: &Path) -> Result<()> {
    write_atomic(path, &format_transcript(summary))
}

/// Write the sentiment report, replacing any existing file
pub fn write_sentiment(result: &SentimentResult, path: &Path) -> Result<()> {
    write_atomic(path, &format_sentiment(result))
}

/// Write to a sibling temp file and rename it over `path`
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let report_err = |source: std::io::Error| CallError::Report {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(report_err)?;
    file.write_all(content.as_bytes()).map_err(report_err)?;
    file.flush().map_err(report_err)?;
    file.persist(path).map_err(|e| report_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_transcript() {
        let summary = "- SPEAKER_1: Hello\n- SPEAKER_2: Hi";
        assert_eq!(
            format_transcript(summary),
            "Transcrição:\n- SPEAKER_1: Hello\n- SPEAKER_2: Hi\n"
        );
    }

    #[test]
    fn test_format_sentiment() {
        let result = SentimentResult::from_compound(-0.1);
        assert_eq!(
            format_sentiment(&result),
            "Análise de Sentimentos (Analista):\nneg: True\nneu: False\npos: False\ncompound: -0.1\n"
        );
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.txt");
        std::fs::write(&path, "stale content that is much longer than the new one\n").unwrap();

        write_transcript("- A: ok", &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Transcrição:\n- A: ok\n");
    }

    #[test]
    fn test_write_sentiment_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment.txt");

        write_sentiment(&SentimentResult::from_compound(0.0), &path).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let err = write_transcript("x", &path).unwrap_err();
        assert!(matches!(err, CallError::Report { .. }));
    }
}
