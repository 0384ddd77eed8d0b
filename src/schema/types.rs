// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Schema types for column validation.
//!
//! Defines the structure for TOML-based table schemas with type and constraint validation.

use serde::{Deserialize, Serialize};

/// Table schema definition.
///
/// Defines column types and constraints for a CSV table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    /// Schema version (e.g., "2.0")
    pub version: String,

    /// Strict mode: reject writes that violate schema
    pub strict: bool,

    /// Column definitions
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Create a new schema.
    pub fn new(version: String, strict: bool, columns: Vec<ColumnDef>) -> Self {
        Schema {
            version,
            strict,
            columns,
        }
    }

    /// Get column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column count.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if schema is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Column definition with type and constraints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Column type: "string", "integer", "float", "boolean", "timestamp"
    #[serde(rename = "type")]
    pub col_type: String,

    /// Required field (cannot be empty)
    #[serde(default)]
    pub required: bool,

    /// Unique constraint
    #[serde(default)]
    pub unique: bool,

    /// Primary key (implies required + unique)
    #[serde(default)]
    pub primary_key: bool,

    /// Minimum value (for integer/float)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    /// Maximum value (for integer/float)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,

    /// Minimum length (for string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum length (for string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Regex pattern (for string validation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ColumnDef {
    /// Create a new column definition.
    pub fn new(name: String, col_type: String) -> Self {
        ColumnDef {
            name,
            col_type,
            required: false,
            unique: false,
            primary_key: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Create a primary key column.
    pub fn primary_key(name: String, col_type: String) -> Self {
        ColumnDef {
            name,
            col_type,
            required: true,
            unique: true,
            primary_key: true,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Set as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set min value.
    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set max value.
    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set min length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Set max length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set pattern.
    pub fn with_pattern(mut self, pattern: String) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Check if column is required (either explicitly or via primary_key).
    pub fn is_required(&self) -> bool {
        self.required || self.primary_key
    }

    /// Check if column is unique (either explicitly or via primary_key).
    pub fn is_unique(&self) -> bool {
        self.unique || self.primary_key
    }
}
