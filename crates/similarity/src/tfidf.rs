//! TF-IDF vectorization of customer profiles.
//!
//! Each profile is one document and the set of profiles is the corpus.
//!
//! - Tokens: lowercase runs of word characters (alphanumeric or `_`), so
//!   "Free-Range Eggs" yields `free`, `range`, `eggs`
//! - Term frequency: raw count in the document
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1` with `n` documents
//! - Every vector is L2-normalized

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Split a document into lowercase word tokens
pub fn tokenize(document: &str) -> impl Iterator<Item = String> + '_ {
    document
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Sparse vector of (term index, weight), sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from entries in any order; duplicate indices are summed
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_unstable_by_key(|&(idx, _)| idx);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (idx, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == idx => last.1 += weight,
                _ => merged.push((idx, weight)),
            }
        }
        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product via a merge join over the sorted indices
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for entry in &mut self.entries {
                entry.1 /= norm;
            }
        }
    }
}

/// Cosine similarity; 0 when either vector is all zeros
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Vocabulary and inverse document frequencies learned from a corpus
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Term -> column, columns assigned in sorted term order
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let terms: BTreeSet<String> = tokenize(document.as_ref()).collect();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        Self { vocabulary, idf }
    }

    /// Fit on `documents` and vectorize each of them
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(documents);
        let vectors = documents
            .iter()
            .map(|document| vectorizer.transform(document.as_ref()))
            .collect();
        (vectorizer, vectors)
    }

    /// Vectorize one document; terms outside the vocabulary are dropped
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(document) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut vector = SparseVector::from_entries(
            counts
                .into_iter()
                .map(|(column, tf)| (column, tf * self.idf[column]))
                .collect(),
        );
        vector.normalize();
        vector
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}
