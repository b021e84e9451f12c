//! Class code assignment.

use mwb_model::ClassCodeMap;
use tracing::trace;

/// Running accumulator that assigns class codes in first-seen order.
///
/// Codes start at 1. The encoder must see rows strictly in source order for
/// the assignment to be deterministic.
#[derive(Debug, Default)]
pub struct ClassEncoder {
    map: ClassCodeMap,
}

impl ClassEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `label`, assigning the next one if it is new.
    pub fn encode(&mut self, label: &str) -> u32 {
        let next = self.map.next_code();
        let code = self.map.assign(label);
        if code == next {
            trace!(class_code = code, "new class label");
        }
        code
    }

    /// Number of distinct labels seen so far.
    pub fn class_count(&self) -> usize {
        self.map.len()
    }

    pub fn finish(self) -> ClassCodeMap {
        self.map
    }
}

/// Encodes a sequence of labels and returns the resulting map.
pub fn encode_labels<I, S>(labels: I) -> ClassCodeMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .fold(ClassEncoder::new(), |mut encoder, label| {
            encoder.encode(label.as_ref());
            encoder
        })
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_codes_for_repeated_labels() {
        let mut encoder = ClassEncoder::new();
        assert_eq!(encoder.encode("WT"), 1);
        assert_eq!(encoder.encode("KO"), 2);
        assert_eq!(encoder.encode("WT"), 1);
        assert_eq!(encoder.class_count(), 2);
    }

    #[test]
    fn encode_labels_matches_incremental_encoding() {
        let map = encode_labels(["b", "a", "b", "c"]);
        assert_eq!(map.labels(), vec!["b", "a", "c"]);
        assert_eq!(map.code("c"), Some(3));
    }
}
