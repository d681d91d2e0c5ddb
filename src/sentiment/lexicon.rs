use std::collections::HashMap;

use super::PolarityScorer;

/// Word polarities, Portuguese first then English
const LEXICON: &[(&str, f64)] = &[
    ("bom", 0.7),
    ("boa", 0.7),
    ("ótimo", 0.8),
    ("ótima", 0.8),
    ("excelente", 1.0),
    ("perfeito", 1.0),
    ("perfeita", 1.0),
    ("obrigado", 0.5),
    ("obrigada", 0.5),
    ("agradeço", 0.5),
    ("satisfeito", 0.6),
    ("satisfeita", 0.6),
    ("feliz", 0.8),
    ("certo", 0.3),
    ("claro", 0.3),
    ("resolvido", 0.6),
    ("resolvida", 0.6),
    ("ajudar", 0.4),
    ("prazer", 0.6),
    ("maravilhoso", 0.9),
    ("tranquilo", 0.4),
    ("rápido", 0.4),
    ("ruim", -0.7),
    ("péssimo", -1.0),
    ("péssima", -1.0),
    ("problema", -0.4),
    ("problemas", -0.4),
    ("erro", -0.5),
    ("infelizmente", -0.5),
    ("lamento", -0.4),
    ("demora", -0.4),
    ("atraso", -0.5),
    ("difícil", -0.5),
    ("impossível", -0.7),
    ("reclamação", -0.5),
    ("insatisfeito", -0.7),
    ("insatisfeita", -0.7),
    ("cancelar", -0.3),
    ("errado", -0.6),
    ("errada", -0.6),
    ("horrível", -1.0),
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("perfect", 1.0),
    ("thanks", 0.4),
    ("thank", 0.4),
    ("happy", 0.8),
    ("glad", 0.5),
    ("pleasure", 0.6),
    ("resolved", 0.6),
    ("sure", 0.5),
    ("helpful", 0.6),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("problem", -0.4),
    ("issue", -0.3),
    ("wrong", -0.5),
    ("unfortunately", -0.5),
    ("sorry", -0.5),
    ("delay", -0.4),
    ("impossible", -0.7),
    ("angry", -0.8),
];

/// Words that scale the next sentiment word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("muito", 1.3),
    ("muita", 1.3),
    ("super", 1.5),
    ("bastante", 1.2),
    ("extremamente", 1.6),
    ("totalmente", 1.4),
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.6),
    ("totally", 1.4),
];

/// Words that invert the next sentiment word
const NEGATIONS: &[&str] = &["não", "nunca", "nem", "jamais", "not", "never", "don't"];

/// Negated words keep half their magnitude with the opposite sign
const NEGATION_FACTOR: f64 = -0.5;

/// Lexicon-based polarity scorer
///
/// Averages the polarity of every lexicon word found in the text. A
/// preceding intensifier scales the word; a preceding negation within
/// the previous three words flips and halves it.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    polarities: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            polarities: LEXICON.iter().map(|(w, p)| (w.to_string(), *p)).collect(),
            intensifiers: INTENSIFIERS.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Add or override word polarities
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, polarity) in entries {
            self.polarities
                .insert(word.into().to_lowercase(), polarity.clamp(-1.0, 1.0));
        }
        self
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let words = tokenize(text);
        let mut scores = Vec::new();

        for (i, word) in words.iter().enumerate() {
            let Some(&base) = self.polarities.get(word.as_str()) else {
                continue;
            };

            let mut score = base;
            if let Some(prev) = i.checked_sub(1).and_then(|p| words.get(p)) {
                if let Some(&factor) = self.intensifiers.get(prev.as_str()) {
                    score *= factor;
                }
            }

            let window_start = i.saturating_sub(3);
            if words[window_start..i].iter().any(|w| self.is_negation(w)) {
                score *= NEGATION_FACTOR;
            }

            scores.push(score.clamp(-1.0, 1.0));
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Lowercase words; letters, digits, inner apostrophes and hyphens are kept
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Olá! Não, está ÓTIMO... don't-worry"),
            vec!["olá", "não", "está", "ótimo", "don't-worry"]
        );
    }

    #[test]
    fn test_no_lexicon_words_is_zero() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.polarity(""), 0.0);
        assert_eq!(scorer.polarity("o protocolo é 12345"), 0.0);
    }

    #[test]
    fn test_positive_text() {
        let scorer = LexiconScorer::new();
        let score = scorer.polarity("Obrigado, foi um ótimo atendimento");
        assert!((score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_negative_text() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("Infelizmente houve um erro no sistema") < 0.0);
    }

    #[test]
    fn test_negation_flips_and_halves() {
        let scorer = LexiconScorer::new();
        let score = scorer.polarity("não foi bom");
        assert!((score - (-0.35)).abs() < 1e-9);
    }

    #[test]
    fn test_intensifier_scales_and_clamps() {
        let scorer = LexiconScorer::new();
        assert!((scorer.polarity("muito bom") - 0.91).abs() < 1e-9);
        assert_eq!(scorer.polarity("extremamente excelente"), 1.0);
    }

    #[test]
    fn test_with_entries_overrides() {
        let scorer = LexiconScorer::new().with_entries([("Protocolo", 0.2)]);
        assert!((scorer.polarity("o protocolo") - 0.2).abs() < 1e-9);
    }
}
