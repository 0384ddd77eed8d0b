// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Query pattern tracking for auto-indexing.
//!
//! Tracks query patterns to automatically create indices when beneficial.

use std::collections::HashMap;

/// Query pattern for tracking.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct QueryPattern {
    /// Table name
    pub table: String,

    /// Column name
    pub column: String,

    /// Operation type ("equals", "range", "like")
    pub operation: String,
}

impl QueryPattern {
    /// Creates a new query pattern.
    pub fn new(table: String, column: String, operation: String) -> Self {
        Self {
            table,
            column,
            operation,
        }
    }
}

/// Tracks query patterns for auto-indexing decisions.
#[derive(Debug)]
pub struct PatternTracker {
    /// Pattern → count mapping
    patterns: HashMap<QueryPattern, usize>,

    /// Patterns that have triggered index creation
    indexed_patterns: HashMap<QueryPattern, bool>,
}

impl PatternTracker {
    /// Creates a new pattern tracker.
    pub fn new() -> Self {
        Self {
            patterns: HashMap::new(),
            indexed_patterns: HashMap::new(),
        }
    }

    /// Records a query pattern.
    ///
    /// ## Input
    /// - `pattern`: Query pattern to track
    ///
    /// ## Output
    /// - Current count for this pattern
    pub fn record(&mut self, pattern: QueryPattern) -> usize {
        let count = self.patterns.entry(pattern).or_insert(0);
        *count += 1;
        *count
    }

    /// Checks if a pattern should trigger index creation.
    ///
    /// ## Input
    /// - `pattern`: Query pattern to check
    /// - `threshold`: Minimum count to trigger
    ///
    /// ## Output
    /// - `true` if index should be created
    /// - `false` if not yet
    pub fn should_create_index(&self, pattern: &QueryPattern, threshold: usize) -> bool {
        // Already indexed?
        if self.indexed_patterns.contains_key(pattern) {
            return false;
        }

        // Check count
        self.patterns.get(pattern).copied().unwrap_or(0) >= threshold
    }

    /// Marks a pattern as indexed.
    pub fn mark_indexed(&mut self, pattern: QueryPattern) {
        self.indexed_patterns.insert(pattern, true);
    }

    /// Gets count for a pattern.
    pub fn get_count(&self, pattern: &QueryPattern) -> usize {
        self.patterns.get(pattern).copied().unwrap_or(0)
    }

    /// Gets top N patterns by count.
    pub fn get_top_patterns(&self, n: usize) -> Vec<(QueryPattern, usize)> {
        let mut patterns: Vec<_> = self.patterns.iter().map(|(p, c)| (p.clone(), *c)).collect();
        patterns.sort_by(|a, b| b.1.cmp(&a.1));
        patterns.into_iter().take(n).collect()
    }

    /// Clears all tracked patterns.
    pub fn clear(&mut self) {
        self.patterns.clear();
        self.indexed_patterns.clear();
    }
}

impl Default for PatternTracker {
    fn default() -> Self {
        Self::new()
    }
}
