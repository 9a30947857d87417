// SPDX-License-Identifier: GPL-3.0-only

//! Ordered, duplicate-free list of scanned codes

use serde::{Deserialize, Serialize};

/// Ordered sequence of unique code strings
///
/// Codes are opaque: no checksum or length validation is done. Uniqueness is
/// by exact string match and order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CodeList {
    codes: Vec<String>,
}

impl CodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Append a code unless it is already present
    ///
    /// Returns `false` (and leaves the list untouched) for duplicates.
    pub fn append(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Remove the matching code; returns `false` if it was absent
    pub fn remove(&mut self, code: &str) -> bool {
        match self.codes.iter().position(|c| c == code) {
            Some(index) => {
                self.codes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.codes.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.codes
    }
}

/// Builds a list keeping the first occurrence of every code
impl From<Vec<String>> for CodeList {
    fn from(codes: Vec<String>) -> Self {
        let mut list = CodeList::new();
        for code in codes {
            list.append(code);
        }
        list
    }
}

impl From<CodeList> for Vec<String> {
    fn from(list: CodeList) -> Self {
        list.codes
    }
}

impl<S: Into<String>> FromIterator<S> for CodeList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = CodeList::new();
        for code in iter {
            list.append(code);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_rejects_duplicates() {
        let mut list = CodeList::new();
        assert!(list.append("9780306406157"));
        assert!(!list.append("9780306406157"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list: CodeList = ["A", "B"].into_iter().collect();
        assert!(!list.remove("C"));
        assert_eq!(list.as_slice(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_from_vec_keeps_first_occurrence() {
        let list = CodeList::from(vec![
            "B".to_string(),
            "A".to_string(),
            "B".to_string(),
        ]);
        let codes: Vec<&str> = list.iter().collect();
        assert_eq!(codes, vec!["B", "A"]);
    }

    #[test]
    fn test_no_duplicates_after_mixed_operations() {
        // Deterministic pseudo-random walk over a small alphabet
        let alphabet = ["A", "B", "C", "D"];
        let mut list = CodeList::new();
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let code = alphabet[(seed >> 16) as usize % alphabet.len()];
            if (seed >> 8) % 3 == 0 {
                list.remove(code);
            } else {
                list.append(code);
            }

            let mut seen: Vec<&str> = list.iter().collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), list.len());
        }
    }
}
