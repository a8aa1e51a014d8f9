//! Per-file detection context and the shared read-index cache.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::classifier::Classifier;
use crate::config::{Config, Thresholds};
use crate::span;
use crate::syntax::{java, NodeRef, SourceUnit};

use super::types::LineSpan;

/// Names read anywhere in a file, keyed by file path.
///
/// Built lazily the first time a file needs it and evicted by the runner
/// once the file completes, so memory stays bounded by the number of files
/// in flight. Safe to share across worker threads.
#[derive(Default)]
pub struct ReadIndexCache {
    entries: RwLock<HashMap<String, Arc<HashSet<String>>>>,
}

impl ReadIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached index for `path`, building it with `build` on first use.
    pub fn get_or_build<F>(&self, path: &str, build: F) -> Arc<HashSet<String>>
    where
        F: FnOnce() -> HashSet<String>,
    {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(index) = entries.get(path) {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(build());
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(entries.entry(path.to_string()).or_insert(index))
    }

    pub fn evict(&self, path: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(path);
    }

    pub fn contains(&self, path: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a rule may consult while evaluating one node.
pub struct FileContext<'a> {
    pub unit: &'a SourceUnit,
    pub config: &'a Config,
    pub classifier: Option<&'a dyn Classifier>,
    read_index: &'a ReadIndexCache,
}

impl<'a> FileContext<'a> {
    pub fn new(
        unit: &'a SourceUnit,
        config: &'a Config,
        classifier: Option<&'a dyn Classifier>,
        read_index: &'a ReadIndexCache,
    ) -> Self {
        Self {
            unit,
            config,
            classifier,
            read_index,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.config.thresholds
    }

    pub fn lines(&self) -> &'a [String] {
        self.unit.lines()
    }

    /// Span from `start` to the line closing the first brace block that
    /// opens at or after it.
    pub fn block_span(&self, start: usize) -> LineSpan {
        let end = span::reconstruct(self.lines(), start);
        LineSpan::new(start, span::clamp(start, end, self.unit.line_count()))
    }

    /// Span of a declaration from its header line: the brace block when it
    /// has a body, otherwise the declaration's own lines.
    pub fn decl_span(&self, decl: NodeRef<'_>) -> LineSpan {
        let start = java::header_line(decl);
        if decl.field("body").is_some() {
            self.block_span(start)
        } else {
            LineSpan::new(start, decl.end_line())
        }
    }

    pub fn read_index<F>(&self, build: F) -> Arc<HashSet<String>>
    where
        F: FnOnce() -> HashSet<String>,
    {
        self.read_index.get_or_build(self.unit.path(), build)
    }
}
