use serde::Serialize;

/// Three-way polarity classification of the agent's speech
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    pub neg: bool,
    pub neu: bool,
    pub pos: bool,
    /// Continuous polarity in [-1.0, 1.0]
    pub compound: f64,
}

impl SentimentResult {
    /// Classify by the sign of `compound`. Only an exact 0.0 is neutral.
    pub fn from_compound(compound: f64) -> Self {
        Self {
            neg: compound < 0.0,
            neu: compound == 0.0,
            pos: compound > 0.0,
            compound,
        }
    }

    /// Fields in report order: neg, neu, pos, compound
    pub fn fields(&self) -> [(&'static str, String); 4] {
        [
            ("neg", format_flag(self.neg)),
            ("neu", format_flag(self.neu)),
            ("pos", format_flag(self.pos)),
            ("compound", format!("{:?}", self.compound)),
        ]
    }
}

fn format_flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}
