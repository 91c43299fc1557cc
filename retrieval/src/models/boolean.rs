use std::collections::BTreeSet;
use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::Result;
use crate::highlight::highlight_terms;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::Hit;
use crate::tokenizer::strip_punctuation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    /// Scan order: the first keyword found decides how the query splits.
    const PRECEDENCE: [(Operator, &'static str); 3] =
        [(Operator::And, " AND "), (Operator::Or, " OR "), (Operator::Not, " NOT ")];

    fn keyword(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }
}

/// A query with at most one top-level operator. Operators do not nest: in
/// `a AND b OR c` the right operand is the literal text `B OR C`. Repeating the
/// chosen operator (`a AND b AND c`) folds it over every operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanQuery {
    pub operator: Option<Operator>,
    /// Upper-cased, punctuation-free operand texts.
    pub operands: Vec<String>,
    /// Lower-cased words to highlight, operator keywords removed.
    pub terms: Vec<String>,
}

impl BooleanQuery {
    pub fn parse(query: &str) -> Self {
        let upper = query.to_uppercase();
        let operator = Operator::PRECEDENCE.iter().find(|(_, kw)| upper.contains(kw)).map(|(op, _)| *op);
        let operands = match operator {
            Some(op) => upper.split(&format!(" {} ", op.keyword())).map(normalize).collect(),
            None => vec![normalize(&upper)],
        };
        let terms = strip_punctuation(&upper)
            .split_whitespace()
            .filter(|w| !matches!(*w, "AND" | "OR" | "NOT"))
            .map(str::to_lowercase)
            .collect();
        Self { operator, operands, terms }
    }
}

fn normalize(text: &str) -> String {
    strip_punctuation(text).trim().to_uppercase()
}

/// Set retrieval by substring containment over normalized document text.
pub struct BooleanModel {
    corpus: Arc<Corpus>,
    normalized: Vec<String>,
}

impl BooleanModel {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        let normalized = corpus.documents().iter().map(|d| normalize(d.text())).collect();
        Self { corpus, normalized }
    }

    /// Documents whose normalized text contains `operand`. An empty operand
    /// matches nothing.
    fn matching(&self, operand: &str) -> BTreeSet<DocIdx> {
        if operand.is_empty() {
            return BTreeSet::new();
        }
        self.normalized
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(operand))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn evaluate(&self, query: &BooleanQuery) -> BTreeSet<DocIdx> {
        let mut sets = query.operands.iter().map(|op| self.matching(op));
        let Some(first) = sets.next() else {
            return BTreeSet::new();
        };
        match query.operator {
            None => first,
            Some(Operator::And) => sets.fold(first, |acc, s| acc.intersection(&s).copied().collect()),
            Some(Operator::Or) => sets.fold(first, |mut acc, s| {
                acc.extend(s);
                acc
            }),
            Some(Operator::Not) => sets.fold(first, |acc, s| acc.difference(&s).copied().collect()),
        }
    }
}

impl RetrievalModel for BooleanModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Boolean
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed = BooleanQuery::parse(query);
        let hits = self
            .evaluate(&parsed)
            .into_iter()
            .take(top_n)
            .map(|idx| {
                let doc = &self.corpus[idx];
                Hit::new(doc.id(), 1.0).with_snippet(highlight_terms(doc.text(), &parsed.terms))
            })
            .collect();
        Ok(hits)
    }
}
