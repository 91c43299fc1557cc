use std::collections::{BTreeSet, HashMap};

use crate::corpus::{Corpus, DocIdx, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: DocIdx,
    pub freq: u32,
}

/// Term -> postings. Terms keep the order in which the corpus scan first met
/// them, and each postings list is in document load order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    terms: Vec<String>,
    postings: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every document with the given term extractor.
    pub fn build_with<F>(corpus: &Corpus, mut extract: F) -> Self
    where
        F: FnMut(&Document) -> Vec<String>,
    {
        let mut index = Self::new();
        for (idx, doc) in corpus.iter() {
            for term in extract(doc) {
                index.add(term, idx);
            }
        }
        index
    }

    /// Record one occurrence of `term` in `doc`. Documents must be added in
    /// load order.
    pub fn add(&mut self, term: String, doc: DocIdx) {
        match self.postings.get_mut(&term) {
            Some(list) => match list.last_mut() {
                Some(last) if last.doc == doc => last.freq += 1,
                _ => list.push(Posting { doc, freq: 1 }),
            },
            None => {
                self.terms.push(term.clone());
                self.postings.insert(term, vec![Posting { doc, freq: 1 }]);
            }
        }
    }

    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Terms in first-occurrence order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(String::as_str)
    }

    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).len()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Aggregate shape of one document's token stream.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocFeatures {
    pub word_count: usize,
    pub unique_words: usize,
    pub avg_word_len: f64,
}

impl DocFeatures {
    fn from_tokens(tokens: &[String]) -> Self {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        let chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
        let avg_word_len = if tokens.is_empty() { 0.0 } else { chars as f64 / tokens.len() as f64 };
        Self { word_count: tokens.len(), unique_words: unique.len(), avg_word_len }
    }
}

/// Frequency tables shared by the scoring models. A pure function of the
/// corpus: building twice gives equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct TermStats {
    /// Per document (load order): term -> occurrences.
    pub tf: Vec<HashMap<String, u32>>,
    pub index: InvertedIndex,
    /// Term -> number of documents containing it.
    pub df: HashMap<String, u32>,
    pub features: Vec<DocFeatures>,
    /// Corpus-wide maximum of each feature.
    pub max_features: DocFeatures,
}

impl TermStats {
    pub fn build(corpus: &Corpus) -> Self {
        let index = InvertedIndex::build_with(corpus, |doc| doc.tokens().to_vec());

        let mut tf: Vec<HashMap<String, u32>> = vec![HashMap::new(); corpus.len()];
        let mut df: HashMap<String, u32> = HashMap::with_capacity(index.len());
        for term in index.terms() {
            let postings = index.postings(term);
            df.insert(term.to_string(), postings.len() as u32);
            for p in postings {
                tf[p.doc].insert(term.to_string(), p.freq);
            }
        }

        let features: Vec<DocFeatures> =
            corpus.documents().iter().map(|d| DocFeatures::from_tokens(d.tokens())).collect();
        let max_features = features.iter().fold(DocFeatures::default(), |acc, f| DocFeatures {
            word_count: acc.word_count.max(f.word_count),
            unique_words: acc.unique_words.max(f.unique_words),
            avg_word_len: acc.avg_word_len.max(f.avg_word_len),
        });

        Self { tf, index, df, features, max_features }
    }

    pub fn num_docs(&self) -> usize {
        self.tf.len()
    }

    pub fn term_frequency(&self, doc: DocIdx, term: &str) -> u32 {
        self.tf.get(doc).and_then(|m| m.get(term)).copied().unwrap_or(0)
    }

    /// Largest count of any term in `doc`; 0 for an empty document.
    pub fn max_term_frequency(&self, doc: DocIdx) -> u32 {
        self.tf.get(doc).and_then(|m| m.values().copied().max()).unwrap_or(0)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }

    /// Distinct terms, sorted.
    pub fn vocabulary(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.index.terms().collect();
        terms.sort_unstable();
        terms
    }
}
