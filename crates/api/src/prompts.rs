//! Prompt deck: curated generation prompts sampled for the dashboard.

use std::path::Path;

use rand::seq::SliceRandom;

/// How many prompts one `/prompts` response offers.
pub const SAMPLE_SIZE: usize = 4;

/// In-memory deck of generation prompts, loaded once at startup.
pub struct PromptDeck {
    prompts: Vec<String>,
}

impl PromptDeck {
    /// Load the deck from a JSON array of strings. A missing or malformed
    /// file yields an empty deck; the dashboard still works, users just get
    /// no suggestions.
    pub async fn load(path: &Path) -> Self {
        let prompts = match tokio::fs::read_to_string(path).await {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(prompts) => prompts,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Prompt deck is not a JSON string array");
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Prompt deck not found; /prompts will be empty");
                Vec::new()
            }
        };
        Self { prompts }
    }

    /// Build a deck from in-memory prompts (tests).
    pub fn from_prompts(prompts: Vec<String>) -> Self {
        Self { prompts }
    }

    /// A random sample of up to `count` prompts, in shuffled order.
    pub fn sample(&self, count: usize) -> Vec<String> {
        let mut copy = self.prompts.clone();
        copy.shuffle(&mut rand::rng());
        copy.truncate(count);
        copy
    }
}
