pub mod lexicon;

pub use lexicon::*;

use tracing::{info, warn};

use crate::models::SentimentResult;

/// Maps text to a continuous polarity in [-1.0, 1.0]
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Score the text and classify it by the sign of the polarity
pub fn classify(text: &str, scorer: &dyn PolarityScorer) -> SentimentResult {
    let polarity = scorer.polarity(text);
    let compound = if polarity.is_nan() {
        warn!("Scorer returned NaN polarity; treating as neutral");
        0.0
    } else {
        polarity.clamp(-1.0, 1.0)
    };
    let result = SentimentResult::from_compound(compound);

    info!(
        "Sentiment: compound={:.3} (neg={}, neu={}, pos={})",
        result.compound, result.neg, result.neu, result.pos
    );

    result
}
