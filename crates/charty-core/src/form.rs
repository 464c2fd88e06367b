//! Submitted-form access and field coercion.
//!
//! Admin forms arrive as an ordered list of `(name, value)` pairs; names
//! repeat for multi-valued fields (`story_id`, `detail_id`). [`FormFields`]
//! wraps that list, and the coercion helpers implement the repair policy
//! for user input: invalid values fall back to the supplied fallback, never
//! to an error.

/// An ordered multimap view over submitted form fields.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value submitted under `name`, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value submitted under `name`, in submission order.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

/// Coerce a submitted field to a non-negative integer.
///
/// Absent, empty, non-numeric, and negative submissions all yield
/// `fallback`.
pub fn coerce_u64(value: Option<&str>, fallback: u64) -> u64 {
    match value {
        Some(raw) => raw.trim().parse::<u64>().unwrap_or(fallback),
        None => fallback,
    }
}

/// Coerce a submitted field to a signed integer.
///
/// Used for fields whose out-of-range submissions are clamped afterwards
/// rather than discarded (progress percent: `-5` must become `0`, not the
/// previous value).
pub fn coerce_i64(value: Option<&str>, fallback: i64) -> i64 {
    match value {
        Some(raw) => raw.trim().parse::<i64>().unwrap_or(fallback),
        None => fallback,
    }
}

/// Coerce a submitted field to non-empty trimmed text.
///
/// Absent and blank-after-trim submissions yield `fallback`.
pub fn coerce_text(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => fallback.to_string(),
    }
}
