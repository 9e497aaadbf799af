//! Property name disambiguation among siblings

use std::collections::{HashMap, HashSet};

/// Hands out unique property names within one parent object
///
/// The first occurrence of a name is kept as is, the n-th occurrence gets
/// `n` appended (`NAD`, `NAD2`, `NAD3`). Create one scope per parent.
#[derive(Debug, Default)]
pub struct NameScope {
    occurrences: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl NameScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence of `base` and return the name to use for it.
    pub fn claim(&mut self, base: &str) -> String {
        let count = self.occurrences.entry(base.to_string()).or_insert(0);
        *count += 1;

        let mut candidate = if *count == 1 {
            base.to_string()
        } else {
            format!("{base}{count}")
        };
        // a literal sibling may already use the suffixed form
        while self.taken.contains(&candidate) {
            *count += 1;
            candidate = format!("{base}{count}");
        }

        self.taken.insert(candidate.clone());
        candidate
    }
}
