//! Person model.
//!
//! People are identified by their normalized display name. Two raw
//! spellings that normalize to the same string are the same person.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A person on the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Person {
    name: String,
}

impl Person {
    /// Creates a person from a raw display name, normalizing it.
    ///
    /// Returns `None` if the name is blank.
    pub fn new(raw_name: &str) -> Option<Self> {
        let name = normalize_name(raw_name);
        if name.is_empty() {
            None
        } else {
            Some(Self { name })
        }
    }

    /// Normalized name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Normalizes a display name.
///
/// Trims, collapses whitespace runs to a single space, and title-cases:
/// every letter that follows a non-letter is upper-cased, every other
/// letter is lower-cased ("  mary-jane  o'NEIL " → "Mary-Jane O'Neil").
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;

    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
            prev_alpha = false;
        }
        for c in word.chars() {
            if c.is_alphabetic() {
                if prev_alpha {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                }
                prev_alpha = true;
            } else {
                out.push(c);
                prev_alpha = false;
            }
        }
    }

    out
}
