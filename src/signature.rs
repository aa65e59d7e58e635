//! Component signature: a bitset over component slots, backed by Vec<u64>.
//! One bit per slot; used both for an entity's attached set and for a
//! system's required set.

use crate::component::MAX_COMPONENTS;

/// Bitset recording which component slots are present (for an entity) or
/// required (for a system's query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    words: Vec<u64>,
}

impl Default for Signature {
    fn default() -> Self {
        Self::with_capacity(MAX_COMPONENTS)
    }
}

impl Signature {
    /// Create an all-zero signature capable of holding at least `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        let num_words = capacity.div_ceil(64);
        Self {
            words: vec![0; num_words],
        }
    }

    /// Set the bit at `index`.
    /// Resizes automatically if index is out of bounds.
    pub fn set(&mut self, index: usize) {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }
        self.words[word_idx] |= 1 << bit_idx;
    }

    /// Clear the bit at `index`.
    pub fn clear(&mut self, index: usize) {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx < self.words.len() {
            self.words[word_idx] &= !(1 << bit_idx);
        }
    }

    /// Check if the bit at `index` is set.
    pub fn contains(&self, index: usize) -> bool {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            return false;
        }
        (self.words[word_idx] & (1 << bit_idx)) != 0
    }

    /// Matching predicate: every bit set in `required` is also set here,
    /// i.e. `(self AND required) == required`.
    pub fn contains_all(&self, required: &Self) -> bool {
        for (i, &req) in required.words.iter().enumerate() {
            let have = self.words.get(i).copied().unwrap_or(0);
            if have & req != req {
                return false;
            }
        }
        true
    }

    /// True when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Zero every bit, keeping capacity.
    pub fn clear_all(&mut self) {
        for w in &mut self.words {
            *w = 0;
        }
    }

    /// Returns iterator over indices of set bits
    pub fn ones(&self) -> OnesIter {
        OnesIter {
            signature: self,
            word_idx: 0,
            current_word: if self.words.is_empty() {
                0
            } else {
                self.words[0]
            },
        }
    }
}

pub struct OnesIter<'a> {
    signature: &'a Signature,
    word_idx: usize,
    current_word: u64,
}

impl<'a> Iterator for OnesIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let trailing = self.current_word.trailing_zeros();
                self.current_word &= !(1 << trailing); // Clear the bit we just found
                return Some(self.word_idx * 64 + trailing as usize);
            }

            self.word_idx += 1;
            if self.word_idx >= self.signature.words.len() {
                return None;
            }
            self.current_word = self.signature.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clear_contains() {
        let mut sig = Signature::default();
        sig.set(3);
        sig.set(299);
        assert!(sig.contains(3));
        assert!(sig.contains(299));
        assert!(!sig.contains(4));
        sig.clear(3);
        assert!(!sig.contains(3));
        assert!(sig.contains(299));
    }

    #[test]
    fn test_contains_all_superset_rule() {
        let mut entity = Signature::default();
        let mut query = Signature::default();
        entity.set(1);
        entity.set(5);
        query.set(1);
        assert!(entity.contains_all(&query));
        query.set(9);
        assert!(!entity.contains_all(&query));
        entity.set(9);
        assert!(entity.contains_all(&query));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = Signature::default();
        let mut entity = Signature::default();
        assert!(entity.contains_all(&query));
        entity.set(0);
        assert!(entity.contains_all(&query));
    }

    #[test]
    fn test_ones_iteration_and_count() {
        let mut sig = Signature::default();
        for i in [0, 63, 64, 130] {
            sig.set(i);
        }
        let ones: Vec<usize> = sig.ones().collect();
        assert_eq!(ones, vec![0, 63, 64, 130]);
        assert_eq!(sig.count_ones(), 4);
        assert!(!sig.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut sig = Signature::default();
        sig.set(12);
        sig.set(200);
        sig.clear_all();
        assert!(sig.is_empty());
        assert_eq!(sig, Signature::default());
    }

    #[test]
    fn test_mismatched_lengths_compare_by_bits() {
        // A signature that grew past MAX still matches against a shorter one.
        let mut long = Signature::default();
        long.set(400);
        let short = Signature::default();
        assert!(long.contains_all(&short));
        assert!(!short.contains_all(&long));
    }
}
