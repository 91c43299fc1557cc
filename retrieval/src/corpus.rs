use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fs;
use std::ops::Index;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::tokenizer;

/// Position of a document in its corpus. Load order doubles as the ranking
/// tie-break.
pub type DocIdx = usize;

/// A loaded text file. The identifier is the file name.
#[derive(Debug)]
pub struct Document {
    id: String,
    text: String,
    tokens: OnceCell<Vec<String>>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), tokens: OnceCell::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name up to the first dot.
    pub fn stem(&self) -> &str {
        self.id.split('.').next().unwrap_or(&self.id)
    }

    /// Lower-cased `\w+` tokens, computed on first use.
    pub fn tokens(&self) -> &[String] {
        self.tokens.get_or_init(|| tokenizer::words(&self.text))
    }
}

/// Documents in load order with unique identifiers.
#[derive(Debug, Default)]
pub struct Corpus {
    docs: Vec<Document>,
    by_id: HashMap<String, DocIdx>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents<I: IntoIterator<Item = Document>>(docs: I) -> Result<Self> {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.push(doc)?;
        }
        Ok(corpus)
    }

    pub fn push(&mut self, doc: Document) -> Result<DocIdx> {
        if self.by_id.contains_key(doc.id()) {
            return Err(Error::DuplicateDocument(doc.id().to_string()));
        }
        let idx = self.docs.len();
        self.by_id.insert(doc.id().to_string(), idx);
        self.docs.push(doc);
        Ok(idx)
    }

    /// Read every file in `dir` (not recursive) whose extension is listed,
    /// in file-name order. Files that are unreadable or not UTF-8 are skipped.
    pub fn read_dir<P: AsRef<Path>, S: AsRef<str>>(dir: P, extensions: &[S]) -> Result<Self> {
        let dir = dir.as_ref();
        let meta = fs::metadata(dir).map_err(|e| Error::io(dir, e))?;
        if !meta.is_dir() {
            return Err(Error::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut corpus = Self::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let p = entry.path();
            if !p.is_file() {
                continue;
            }
            let ext = p.extension().and_then(|s| s.to_str()).unwrap_or("");
            if !extensions.iter().any(|e| e.as_ref().trim_start_matches('.') == ext) {
                continue;
            }
            let bytes = match fs::read(p) {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let text = match String::from_utf8(bytes) {
                Ok(t) => t,
                Err(_) => {
                    tracing::warn!(path = %p.display(), "skipping file that is not valid UTF-8");
                    continue;
                }
            };
            let id = entry.file_name().to_string_lossy().into_owned();
            corpus.push(Document::new(id, text))?;
        }
        Ok(corpus)
    }

    /// Like [`Corpus::read_dir`] but a missing or unreadable directory is
    /// logged and yields an empty corpus.
    pub fn load<P: AsRef<Path>, S: AsRef<str>>(dir: P, extensions: &[S]) -> Self {
        let dir = dir.as_ref();
        match Self::read_dir(dir, extensions) {
            Ok(corpus) => corpus,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "corpus directory unavailable, using empty corpus");
                Self::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, idx: DocIdx) -> Option<&Document> {
        self.docs.get(idx)
    }

    pub fn position(&self, id: &str) -> Option<DocIdx> {
        self.by_id.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocIdx, &Document)> + '_ {
        self.docs.iter().enumerate()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }
}

impl Index<DocIdx> for Corpus {
    type Output = Document;

    fn index(&self, idx: DocIdx) -> &Document {
        &self.docs[idx]
    }
}
