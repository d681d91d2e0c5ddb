use tracing::{info, warn};

use crate::error::Result;
use crate::models::TranscriptPayload;

pub const DEFAULT_AGENT_LABEL: &str = "SPEAKER_1";

/// Result of Stage 3 extraction
#[derive(Debug, Clone)]
pub struct Stage3Result {
    /// The agent's speech, space-joined in transcript order
    pub agent_text: String,
    /// One `- <speaker>: <text>` line per non-empty utterance
    pub summary: String,
    pub utterance_count: usize,
    pub agent_utterance_count: usize,
    /// Distinct speaker labels in order of first appearance
    pub speakers: Vec<String>,
}

/// Concatenate the trimmed text of every utterance spoken by `agent_label`
pub fn extract_agent_text(payload: &TranscriptPayload, agent_label: &str) -> Result<String> {
    let text = payload
        .utterances()?
        .iter()
        .filter(|u| u.speaker == agent_label)
        .map(|u| u.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(text)
}

/// Render the full speaker-attributed transcript
pub fn summarize(payload: &TranscriptPayload) -> Result<String> {
    let lines: Vec<String> = payload
        .utterances()?
        .iter()
        .filter_map(|u| {
            let text = u.text.trim();
            (!text.is_empty()).then(|| format!("- {}: {}", u.speaker, text))
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Execute Stage 3: split the completed transcript into agent text and summary
pub fn execute_stage3(payload: &TranscriptPayload, agent_label: &str) -> Result<Stage3Result> {
    let utterances = payload.utterances()?;

    let mut speakers: Vec<String> = Vec::new();
    for u in utterances {
        if !speakers.contains(&u.speaker) {
            speakers.push(u.speaker.clone());
        }
    }
    let agent_utterance_count = utterances.iter().filter(|u| u.speaker == agent_label).count();

    let agent_text = extract_agent_text(payload, agent_label)?;
    let summary = summarize(payload)?;

    info!(
        "Extracted {} utterances from {} speakers ({} by {})",
        utterances.len(),
        speakers.len(),
        agent_utterance_count,
        agent_label
    );
    if agent_utterance_count == 0 {
        warn!(
            "No utterances labeled {}; speakers present: {:?}",
            agent_label, speakers
        );
    }

    Ok(Stage3Result {
        agent_text,
        summary,
        utterance_count: utterances.len(),
        agent_utterance_count,
        speakers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallError;
    use crate::provider::testing::completed;

    fn sample() -> TranscriptPayload {
        completed(&[("SPEAKER_1", "Hello"), ("SPEAKER_2", "Hi"), ("SPEAKER_1", "Bye")])
    }

    #[test]
    fn test_extract_agent_text() {
        assert_eq!(extract_agent_text(&sample(), "SPEAKER_1").unwrap(), "Hello Bye");
        assert_eq!(extract_agent_text(&sample(), "SPEAKER_2").unwrap(), "Hi");
    }

    #[test]
    fn test_extract_agent_text_exact_label_match() {
        let payload = completed(&[("speaker_1", "lower"), ("SPEAKER_10", "ten")]);
        assert_eq!(extract_agent_text(&payload, "SPEAKER_1").unwrap(), "");
    }

    #[test]
    fn test_extract_agent_text_trims() {
        let payload = completed(&[
            ("SPEAKER_1", "  Bom dia,  "),
            ("SPEAKER_1", "   "),
            ("SPEAKER_1", "\tcomo posso ajudar?\n"),
        ]);
        assert_eq!(
            extract_agent_text(&payload, "SPEAKER_1").unwrap(),
            "Bom dia, como posso ajudar?"
        );
    }

    #[test]
    fn test_summarize() {
        assert_eq!(
            summarize(&sample()).unwrap(),
            "- SPEAKER_1: Hello\n- SPEAKER_2: Hi\n- SPEAKER_1: Bye"
        );
    }

    #[test]
    fn test_summarize_skips_blank_utterances() {
        let payload = completed(&[("A", " one "), ("B", "  "), ("A", "two")]);
        assert_eq!(summarize(&payload).unwrap(), "- A: one\n- A: two");
    }

    #[test]
    fn test_empty_transcript_rejected() {
        let mut payload = sample();
        payload.utterances = Some(Vec::new());
        assert!(matches!(summarize(&payload), Err(CallError::EmptyTranscript)));

        payload.utterances = None;
        assert!(matches!(
            extract_agent_text(&payload, DEFAULT_AGENT_LABEL),
            Err(CallError::EmptyTranscript)
        ));
        assert!(matches!(
            execute_stage3(&payload, DEFAULT_AGENT_LABEL),
            Err(CallError::EmptyTranscript)
        ));
    }

    #[test]
    fn test_execute_stage3_counts() {
        let result = execute_stage3(&sample(), DEFAULT_AGENT_LABEL).unwrap();

        assert_eq!(result.agent_text, "Hello Bye");
        assert_eq!(result.utterance_count, 3);
        assert_eq!(result.agent_utterance_count, 2);
        assert_eq!(result.speakers, vec!["SPEAKER_1", "SPEAKER_2"]);
    }
}
