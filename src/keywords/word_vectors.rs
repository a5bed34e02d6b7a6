//! Keyword expansion by nearest neighbours in a word-vector space
//!
//! Vectors are read from word2vec text format: an optional `<count> <dims>`
//! header, then one `word v1 v2 ...` line per word. For each input keyword
//! the closest vocabulary words by cosine similarity are collected; a word
//! reached from several inputs accumulates their similarities.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info};

use super::strategy::TextStrategy;

/// In-memory vocabulary with one vector per word
#[derive(Debug, Default)]
pub struct WordVectors {
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f32>>,
    dims: usize,
}

impl WordVectors {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open word vectors: {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut vocab = Self::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let values = match parts
                .map(str::parse::<f32>)
                .collect::<Result<Vec<f32>, _>>()
            {
                Ok(values) => values,
                Err(_) => {
                    debug!(line = line_no + 1, "skipping unparsable vector line");
                    continue;
                }
            };

            // word2vec header: "<count> <dims>"
            if line_no == 0 && values.len() == 1 && word.parse::<usize>().is_ok() {
                continue;
            }
            if values.is_empty() {
                continue;
            }
            if vocab.dims == 0 {
                vocab.dims = values.len();
            } else if values.len() != vocab.dims {
                debug!(line = line_no + 1, "skipping vector with wrong dimension");
                continue;
            }
            vocab.insert(word, values);
        }

        if vocab.words.is_empty() {
            bail!("word vector file contains no vectors");
        }
        Ok(vocab)
    }

    fn insert(&mut self, word: &str, vector: Vec<f32>) {
        if self.index.contains_key(word) {
            return;
        }
        self.index.insert(word.to_string(), self.words.len());
        self.words.push(word.to_string());
        self.vectors.push(vector);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// `topn` nearest other words, most similar first. None if out of vocabulary.
    pub fn most_similar(&self, word: &str, topn: usize) -> Option<Vec<(String, f32)>> {
        let &slot = self.index.get(word)?;
        let target = &self.vectors[slot];

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot)
            .map(|(i, v)| (i, cosine_similarity(target, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(topn);

        Some(
            scored
                .into_iter()
                .map(|(i, sim)| (self.words[i].clone(), sim))
                .collect(),
        )
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// Keyword strategy backed by [`WordVectors`]
pub struct WordVectorStrategy {
    model: Option<WordVectors>,
}

impl WordVectorStrategy {
    /// Load vectors from `path`; on failure the strategy stays usable but
    /// generates nothing
    pub fn load(path: &Path) -> Self {
        match WordVectors::load(path) {
            Ok(model) => {
                info!(words = model.len(), path = %path.display(), "loaded word vectors");
                Self { model: Some(model) }
            }
            Err(e) => {
                error!(error = %e, "failed to load word vectors");
                Self { model: None }
            }
        }
    }

    pub fn from_vectors(model: WordVectors) -> Self {
        Self { model: Some(model) }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }
}

impl TextStrategy for WordVectorStrategy {
    fn name(&self) -> &'static str {
        "word-vectors"
    }

    fn generate(&self, keywords: &[String], _min_length: usize, max_length: usize) -> String {
        let Some(model) = &self.model else {
            return String::new();
        };

        let mut order: Vec<String> = Vec::new();
        let mut scores: HashMap<String, f32> = HashMap::new();

        for keyword in keywords.iter().map(|k| k.to_lowercase()) {
            let Some(similar) = model.most_similar(&keyword, max_length) else {
                debug!(keyword = %keyword, "not found in vocabulary");
                continue;
            };
            for (word, similarity) in similar {
                match scores.get_mut(&word) {
                    Some(score) => *score += similarity,
                    None => {
                        scores.insert(word.clone(), similarity);
                        order.push(word);
                    }
                }
            }
        }

        let mut ranked: Vec<(String, f32)> = order
            .into_iter()
            .map(|word| {
                let score = scores.get(&word).copied().unwrap_or_default();
                (word, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .take(max_length)
            .map(|(word, _)| word)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::strategy::KeywordExpander;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const VECTORS: &str = "5 3\n\
        python 1.0 0.0 0.0\n\
        snake 0.9 0.1 0.0\n\
        code 0.8 0.0 0.2\n\
        tutorial 0.0 1.0 0.0\n\
        guide 0.0 0.9 0.1\n";

    fn vocab() -> WordVectors {
        WordVectors::from_reader(Cursor::new(VECTORS)).unwrap()
    }

    #[test]
    fn test_loads_with_header() {
        let vocab = vocab();
        assert_eq!(vocab.len(), 5);
        assert!(vocab.contains("guide"));
        assert!(!vocab.contains("5"));
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(WordVectors::from_reader(Cursor::new("")).is_err());
    }

    #[test]
    fn test_skips_wrong_dimension() {
        let vocab = WordVectors::from_reader(Cursor::new("a 1 0\nb 1 0 0\nc 0 1\n")).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(!vocab.contains("b"));
    }

    #[test]
    fn test_cosine_similarity() {
        assert_relative_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]), 1.0, epsilon = 1e-6);
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0, epsilon = 1e-6);
        assert_relative_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_most_similar_excludes_self() {
        let similar = vocab().most_similar("python", 2).unwrap();
        let words: Vec<&str> = similar.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["snake", "code"]);
        assert!(vocab().most_similar("missing", 2).is_none());
    }

    #[test]
    fn test_generate_lowercases_and_caps() {
        let strategy = WordVectorStrategy::from_vectors(vocab());
        let keywords = vec!["Python".to_string(), "unknown".to_string()];
        assert_eq!(strategy.generate(&keywords, 1, 1), "snake");
        assert_eq!(strategy.generate_keywords(&keywords, 2), vec!["snake", "code"]);
    }

    #[test]
    fn test_unavailable_model_generates_nothing() {
        let strategy = WordVectorStrategy::load(Path::new("/nonexistent/vectors.txt"));
        assert!(!strategy.is_available());
        assert_eq!(strategy.generate(&["python".to_string()], 1, 5), "");
    }
}
