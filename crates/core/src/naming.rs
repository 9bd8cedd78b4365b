//! Output naming convention for generated assets.
//!
//! A generation job's file is named `{job_id}-{slug}.png`, where the slug is
//! derived from the prompt.

/// Maximum length of a prompt slug.
pub const SLUG_MAX_LEN: usize = 32;

/// Placeholder slug when a prompt has no usable characters.
const SLUG_FALLBACK: &str = "nano";

/// Derive a file-name slug from a generation prompt.
///
/// Lowercases the prompt, collapses runs of non-alphanumeric characters to a
/// single hyphen, trims leading/trailing hyphens, and truncates to
/// [`SLUG_MAX_LEN`] characters. An empty result falls back to `"nano"`.
///
/// Truncation happens after trimming, so a truncated slug may still end in
/// a hyphen.
pub fn prompt_slug(prompt: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in prompt.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    let truncated: String = slug.chars().take(SLUG_MAX_LEN).collect();
    if truncated.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        truncated
    }
}

/// File name for a generation job's primary output.
pub fn output_filename(job_id: &str, prompt: &str) -> String {
    format!("{job_id}-{}.png", prompt_slug(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation_runs() {
        assert_eq!(prompt_slug("Hello,   World!"), "hello-world");
    }

    #[test]
    fn slug_trims_edge_hyphens() {
        assert_eq!(prompt_slug("--neon fox--"), "neon-fox");
    }

    #[test]
    fn slug_truncates_to_32_chars() {
        let slug = prompt_slug("a very long prompt describing a sprawling scene");
        assert_eq!(slug.chars().count(), SLUG_MAX_LEN);
        assert_eq!(slug, "a-very-long-prompt-describing-a-");
    }

    #[test]
    fn slug_falls_back_when_empty() {
        assert_eq!(prompt_slug("!!! ???"), "nano");
        assert_eq!(prompt_slug(""), "nano");
    }

    #[test]
    fn non_ascii_is_treated_as_separator() {
        assert_eq!(prompt_slug("café au lait"), "caf-au-lait");
    }

    #[test]
    fn output_filename_joins_id_and_slug() {
        assert_eq!(
            output_filename("1a2b3c4d", "Neon fox"),
            "1a2b3c4d-neon-fox.png"
        );
    }
}
