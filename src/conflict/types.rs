// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Conflict resolution types for ReedBase.
//!
//! This module provides types for handling conflicts during CSV merge operations,
//! including resolution strategies and conflict representation.

use crate::concurrent::types::CsvRow;
use serde::{Deserialize, Serialize};

/// Resolution strategy for handling conflicts.
///
/// ## Strategies
/// - `LastWriteWins`: Accept the newer change (change_b)
/// - `FirstWriteWins`: Keep the earlier change (change_a)
/// - `Manual`: Write conflict to file for human resolution
/// - `KeepBoth`: Create two separate rows (append suffix to keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStrategy {
    LastWriteWins,
    FirstWriteWins,
    Manual,
    KeepBoth,
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        ResolutionStrategy::LastWriteWins
    }
}

impl ResolutionStrategy {
    /// Get strategy name as string.
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionStrategy::LastWriteWins => "last-write-wins",
            ResolutionStrategy::FirstWriteWins => "first-write-wins",
            ResolutionStrategy::Manual => "manual",
            ResolutionStrategy::KeepBoth => "keep-both",
        }
    }

    /// Parse strategy from string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "last-write-wins" => Some(ResolutionStrategy::LastWriteWins),
            "first-write-wins" => Some(ResolutionStrategy::FirstWriteWins),
            "manual" => Some(ResolutionStrategy::Manual),
            "keep-both" => Some(ResolutionStrategy::KeepBoth),
            _ => None,
        }
    }
}

/// Result of conflict resolution.
///
/// ## Variants
/// - `Automatic`: Conflict resolved automatically with resulting row
/// - `Manual`: Conflict written to file for human resolution
/// - `KeepBoth`: Both versions kept as separate rows
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Automatic(CsvRow),
    Manual(String),
    KeepBoth(CsvRow, CsvRow),
}

impl Resolution {
    /// Check if resolution is automatic.
    pub fn is_automatic(&self) -> bool {
        matches!(self, Resolution::Automatic(_))
    }

    /// Check if resolution requires manual intervention.
    pub fn is_manual(&self) -> bool {
        matches!(self, Resolution::Manual(_))
    }

    /// Check if resolution keeps both versions.
    pub fn is_keep_both(&self) -> bool {
        matches!(self, Resolution::KeepBoth(_, _))
    }

    /// Get the filepath for manual resolution (if applicable).
    pub fn get_filepath(&self) -> Option<&str> {
        match self {
            Resolution::Manual(path) => Some(path),
            _ => None,
        }
    }

    /// Extract resolved rows from resolution.
    pub fn into_rows(self) -> Vec<CsvRow> {
        match self {
            Resolution::Automatic(row) => vec![row],
            Resolution::KeepBoth(row_a, row_b) => vec![row_a, row_b],
            Resolution::Manual(_) => vec![],
        }
    }
}

/// Conflict information for TOML serialization.
///
/// This structure is written to `.conflict` files for manual resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictFile {
    /// Conflict metadata
    pub metadata: ConflictMetadata,
    /// Base version (if available)
    pub base: Option<ConflictRow>,
    /// First change (change_a)
    pub change_a: ConflictRow,
    /// Second change (change_b)
    pub change_b: ConflictRow,
}

/// Conflict metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictMetadata {
    /// Key that has the conflict
    pub key: String,
    /// Table name
    pub table: String,
    /// Timestamp when conflict was detected (Unix timestamp)
    pub timestamp: u64,
    /// Resolution strategy used
    pub strategy: String,
}

/// Row representation in conflict file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRow {
    /// Row key
    pub key: String,
    /// Row values (column values)
    pub values: Vec<String>,
    /// Optional timestamp for the change
    pub timestamp: Option<u64>,
}

impl From<CsvRow> for ConflictRow {
    fn from(row: CsvRow) -> Self {
        ConflictRow {
            key: row.key,
            values: row.values,
            timestamp: None,
        }
    }
}

impl From<ConflictRow> for CsvRow {
    fn from(row: ConflictRow) -> Self {
        CsvRow {
            key: row.key,
            values: row.values,
        }
    }
}

impl ConflictFile {
    /// Create a new conflict file structure.
    pub fn new(
        table: String,
        key: String,
        base: Option<CsvRow>,
        change_a: CsvRow,
        change_b: CsvRow,
        strategy: ResolutionStrategy,
    ) -> Self {
        ConflictFile {
            metadata: ConflictMetadata {
                key: key.clone(),
                table,
                timestamp: std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_secs(),
                strategy: strategy.name().to_string(),
            },
            base: base.map(ConflictRow::from),
            change_a: ConflictRow::from(change_a),
            change_b: ConflictRow::from(change_b),
        }
    }

    /// Generate filename for this conflict.
    ///
    /// Format: `{timestamp}-{key}.conflict`
    pub fn filename(&self) -> String {
        format!("{}-{}.conflict", self.metadata.timestamp, self.metadata.key)
    }
}
