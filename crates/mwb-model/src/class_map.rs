//! Class label to class code mapping.

use std::collections::HashMap;

use serde::Serialize;

/// A class label together with its integer code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCode {
    pub label: String,
    pub code: u32,
}

/// Mapping from class label to class code, ordered by first appearance.
///
/// Codes start at 1 and increase by one for every new label, so the map is
/// always a bijection between the labels seen and `1..=len`. A map belongs to
/// exactly one table; codes are never shared between independent tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassCodeMap {
    entries: Vec<ClassCode>,
    #[serde(skip)]
    lookup: HashMap<String, u32>,
}

impl ClassCodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map by assigning codes to `labels` in iteration order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for label in labels {
            map.assign(label.as_ref());
        }
        map
    }

    /// Returns the code for `label`, assigning the next unused code when the
    /// label has not been seen before.
    pub fn assign(&mut self, label: &str) -> u32 {
        if let Some(code) = self.lookup.get(label) {
            return *code;
        }
        let code = self.next_code();
        self.lookup.insert(label.to_string(), code);
        self.entries.push(ClassCode {
            label: label.to_string(),
            code,
        });
        code
    }

    /// The code the next unseen label would receive.
    pub fn next_code(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    pub fn code(&self, label: &str) -> Option<u32> {
        self.lookup.get(label).copied()
    }

    pub fn label(&self, code: u32) -> Option<&str> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        self.entries.get(index).map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassCode> {
        self.entries.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    pub fn codes(&self) -> Vec<u32> {
        self.entries.iter().map(|entry| entry.code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_first_appearance() {
        let mut map = ClassCodeMap::new();
        assert_eq!(map.assign("Control"), 1);
        assert_eq!(map.assign("Treated"), 2);
        assert_eq!(map.assign("Control"), 1);
        assert_eq!(map.assign("Placebo"), 3);
        assert_eq!(map.labels(), vec!["Control", "Treated", "Placebo"]);
        assert_eq!(map.codes(), vec![1, 2, 3]);
    }

    #[test]
    fn label_lookup_by_code() {
        let map = ClassCodeMap::from_labels(["A", "B"]);
        assert_eq!(map.label(1), Some("A"));
        assert_eq!(map.label(2), Some("B"));
        assert_eq!(map.label(0), None);
        assert_eq!(map.label(3), None);
        assert_eq!(map.next_code(), 3);
    }

    #[test]
    fn serializes_as_ordered_entries() {
        let map = ClassCodeMap::from_labels(["B", "A"]);
        let json = serde_json::to_string(&map).expect("serialize map");
        assert_eq!(json, r#"[{"label":"B","code":1},{"label":"A","code":2}]"#);
    }
}
