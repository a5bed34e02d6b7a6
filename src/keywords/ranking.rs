//! Keyword frequency maps and cross-dimension ranking
//!
//! Each engagement dimension produces its own frequency map (+1 per keyword
//! occurrence per record). Maps are merged by summing weights and the union
//! is ranked by weight, highest first.
//!
//! Ties keep first-seen order: maps are merged in the order given and the
//! sort is stable, so equal weights rank by when the keyword first appeared.

use std::collections::HashMap;

/// Insertion-ordered keyword -> weight tally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFrequency {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl KeywordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally every keyword of every record, duplicates included
    pub fn from_keyword_lists<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut freq = Self::new();
        for list in lists {
            for keyword in list {
                freq.add(keyword, 1);
            }
        }
        freq
    }

    pub fn add(&mut self, keyword: &str, weight: u64) {
        match self.index.get(keyword) {
            Some(&slot) => self.entries[slot].1 += weight,
            None => {
                self.index.insert(keyword.to_string(), self.entries.len());
                self.entries.push((keyword.to_string(), weight));
            }
        }
    }

    /// Sum `other` into `self`; new keys are appended in `other`'s order
    pub fn merge(&mut self, other: &KeywordFrequency) {
        for (keyword, weight) in &other.entries {
            self.add(keyword, *weight);
        }
    }

    pub fn weight(&self, keyword: &str) -> Option<u64> {
        self.index.get(keyword).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by weight descending, ties in first-seen order
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Merge per-dimension maps in order and return keywords, best first
pub fn rank_keywords<I>(maps: I) -> Vec<String>
where
    I: IntoIterator<Item = KeywordFrequency>,
{
    let mut merged = KeywordFrequency::new();
    for map in maps {
        merged.merge(&map);
    }
    merged
        .ranked()
        .into_iter()
        .map(|(keyword, _)| keyword)
        .collect()
}
