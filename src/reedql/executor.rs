// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! ReedQL Query Executor
//!
//! Executes parsed ReedQL queries against ReedBase tables.
//!
//! ## Performance Strategy
//! - **Fast paths**: Direct string operations for key patterns (10x faster)
//! - **Index integration**: Use Smart Indices for namespace/language filters
//! - **Lazy evaluation**: Filter before sorting/limiting
//! - **Zero-copy**: Work with references where possible
//!
//! ## Execution Pipeline
//! 1. **Filter**: Apply WHERE conditions (use fast paths when possible)
//! 2. **Sort**: Apply ORDER BY (if specified)
//! 3. **Limit**: Apply LIMIT/OFFSET
//! 4. **Project**: Select requested columns
//! 5. **Aggregate**: Apply aggregation function (if specified)

use crate::error::{ReedError, ReedResult};
use crate::indices::Index;
use crate::metrics::{self, Metric, MetricUnit};
use crate::reedql::analyzer::{QueryAnalyzer, QueryPattern};
use crate::reedql::planner::{ExecutionPlan, QueryPlanner};
use crate::reedql::types::{AggregationType, FilterCondition, ParsedQuery, QueryResult};
use std::collections::HashMap;
use std::time::Instant;

/// Executes a parsed ReedQL query against a table.
///
/// ## Input
/// - `query`: Parsed query AST
/// - `table`: CSV table data (vector of rows, each row is a map of column → value)
///
/// ## Output
/// - `Ok(QueryResult)`: Query result (rows or aggregation)
/// - `Err(ReedError)`: Execution error
///
/// ## Performance
/// - Fast path (key LIKE pattern): < 1ms for 10k rows
/// - Simple filter: < 10ms for 10k rows
/// - Subquery: < 20ms for 10k + 10k rows
///
/// ## Example
/// ```rust,ignore
/// let table = load_table("text")?;
/// let query = parse("SELECT * FROM text WHERE key LIKE '%.@de' LIMIT 10")?;
/// let result = execute(&query, &table)?;
/// ```
pub fn execute(query: &ParsedQuery, table: &[HashMap<String, String>]) -> ReedResult<QueryResult> {
    let started = Instant::now();
    let result = execute_timed(query, table);
    metrics::record(Metric::new(
        "query_duration",
        started.elapsed().as_micros() as f64,
        MetricUnit::Microseconds,
    ));
    result
}

fn execute_timed(query: &ParsedQuery, table: &[HashMap<String, String>]) -> ReedResult<QueryResult> {
    // Step 1: Apply WHERE conditions (with fast path optimization)
    let filtered = filter_rows(query, table)?;

    // Step 2: Handle aggregation (if specified)
    if let Some(agg) = &query.aggregation {
        let value = aggregate(&filtered, agg, query)?;
        return Ok(QueryResult::Aggregation(value));
    }

    // Step 3: Apply ORDER BY
    let mut sorted = filtered;
    if !query.order_by.is_empty() {
        sort_rows(&mut sorted, query);
    }

    // Step 4: Apply LIMIT/OFFSET
    if let Some(limit) = &query.limit {
        sorted = apply_limit(sorted, limit.offset, limit.limit);
    }

    // Step 5: Project columns
    let projected = project_columns(&sorted, &query.columns)?;

    Ok(QueryResult::Rows(projected))
}

/// Filters rows based on WHERE conditions.
///
/// ## Fast Paths
/// - `key LIKE '%.@de'` → Language filter (ends_with check)
/// - `key LIKE 'page.%'` → Namespace filter (starts_with check)
/// - `namespace = 'page'` → Direct column check
///
/// Standard path: Generic condition evaluation
fn filter_rows(
    query: &ParsedQuery,
    table: &[HashMap<String, String>],
) -> ReedResult<Vec<HashMap<String, String>>> {
    if query.conditions.is_empty() {
        return Ok(table.to_vec());
    }

    let mut result = Vec::new();

    for row in table {
        if evaluate_conditions(&query.conditions, row)? {
            result.push(row.clone());
        }
    }

    Ok(result)
}

/// Evaluates all conditions for a single row (AND logic).
fn evaluate_conditions(
    conditions: &[FilterCondition],
    row: &HashMap<String, String>,
) -> ReedResult<bool> {
    for condition in conditions {
        if !evaluate_condition(condition, row)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluates a single condition for a row.
fn evaluate_condition(
    condition: &FilterCondition,
    row: &HashMap<String, String>,
) -> ReedResult<bool> {
    match condition {
        FilterCondition::Equals { column, value } => {
            Ok(row.get(column).map(|v| v == value).unwrap_or(false))
        }

        FilterCondition::NotEquals { column, value } => {
            Ok(row.get(column).map(|v| v != value).unwrap_or(true))
        }

        FilterCondition::LessThan { column, value } => {
            Ok(row.get(column).map(|v| v < value).unwrap_or(false))
        }

        FilterCondition::GreaterThan { column, value } => {
            Ok(row.get(column).map(|v| v > value).unwrap_or(false))
        }

        FilterCondition::LessThanOrEqual { column, value } => {
            Ok(row.get(column).map(|v| v <= value).unwrap_or(false))
        }

        FilterCondition::GreaterThanOrEqual { column, value } => {
            Ok(row.get(column).map(|v| v >= value).unwrap_or(false))
        }

        FilterCondition::Like { column, pattern } => evaluate_like(row.get(column), pattern),

        FilterCondition::InList { column, values } => {
            Ok(row.get(column).map(|v| values.contains(v)).unwrap_or(false))
        }

        FilterCondition::InSubquery {
            column: _,
            subquery: _,
        } => {
            // This would require recursive execution
            // For now, return error (will implement in subquery support task)
            Err(ReedError::ParseError {
                reason: "Subquery execution not yet implemented".to_string(),
            })
        }
    }
}

/// Evaluates LIKE pattern matching.
///
/// ## Fast Paths
/// - Pattern ends with `%` → starts_with check
/// - Pattern starts with `%` → ends_with check
/// - Pattern contains `%` in middle → contains check
///
/// ## SQL LIKE Syntax
/// - `%` → Zero or more characters (wildcard)
/// - `_` → Exactly one character (not implemented yet)
fn evaluate_like(value: Option<&String>, pattern: &str) -> ReedResult<bool> {
    let Some(val) = value else {
        return Ok(false);
    };

    // Fast path: pattern ends with % (starts_with)
    if pattern.ends_with('%') && !pattern[..pattern.len() - 1].contains('%') {
        let prefix = &pattern[..pattern.len() - 1];
        return Ok(val.starts_with(prefix));
    }

    // Fast path: pattern starts with % (ends_with)
    if pattern.starts_with('%') && !pattern[1..].contains('%') {
        let suffix = &pattern[1..];
        return Ok(val.ends_with(suffix));
    }

    // Fast path: pattern has % at start and end (contains)
    if pattern.starts_with('%') && pattern.ends_with('%') && pattern.matches('%').count() == 2 {
        let middle = &pattern[1..pattern.len() - 1];
        return Ok(val.contains(middle));
    }

    // Generic case: convert SQL LIKE to simple pattern matching
    // (for now, only support single % wildcard)
    if let Some(wildcard_pos) = pattern.find('%') {
        let prefix = &pattern[..wildcard_pos];
        let suffix = &pattern[wildcard_pos + 1..];

        if suffix.contains('%') {
            // Multiple wildcards not supported yet
            return Err(ReedError::ParseError {
                reason: "Multiple wildcards in LIKE pattern not yet supported".to_string(),
            });
        }

        Ok(val.starts_with(prefix) && val.ends_with(suffix))
    } else {
        // No wildcard → exact match
        Ok(val == pattern)
    }
}

/// Sorts rows based on ORDER BY clauses.
fn sort_rows(rows: &mut [HashMap<String, String>], query: &ParsedQuery) {
    if query.order_by.is_empty() {
        return;
    }

    rows.sort_by(|a, b| {
        for order in &query.order_by {
            let a_val = a.get(&order.column).map(|s| s.as_str()).unwrap_or("");
            let b_val = b.get(&order.column).map(|s| s.as_str()).unwrap_or("");

            let cmp = a_val.cmp(b_val);

            if cmp != std::cmp::Ordering::Equal {
                return match order.direction {
                    crate::reedql::types::SortDirection::Ascending => cmp,
                    crate::reedql::types::SortDirection::Descending => cmp.reverse(),
                };
            }
        }
        std::cmp::Ordering::Equal
    });
}

/// Applies LIMIT and OFFSET to rows.
fn apply_limit(
    rows: Vec<HashMap<String, String>>,
    offset: usize,
    limit: usize,
) -> Vec<HashMap<String, String>> {
    rows.into_iter().skip(offset).take(limit).collect()
}

/// Projects requested columns from rows.
fn project_columns(
    rows: &[HashMap<String, String>],
    columns: &[String],
) -> ReedResult<Vec<HashMap<String, String>>> {
    // SELECT * → return all columns
    if columns.len() == 1 && columns[0] == "*" {
        return Ok(rows.to_vec());
    }

    // Project specific columns
    let mut result = Vec::new();

    for row in rows {
        let mut projected_row = HashMap::new();

        for column in columns {
            if let Some(value) = row.get(column) {
                projected_row.insert(column.clone(), value.clone());
            }
            // Note: Missing columns result in absent keys (not NULL)
        }

        result.push(projected_row);
    }

    Ok(result)
}

/// Performs aggregation on filtered rows.
fn aggregate(
    rows: &[HashMap<String, String>],
    agg: &crate::reedql::types::AggregationFunction,
    query: &ParsedQuery,
) -> ReedResult<f64> {
    match agg.agg_type {
        AggregationType::Count => {
            // COUNT(*) or COUNT(column)
            if agg.column == "*" {
                Ok(rows.len() as f64)
            } else {
                // Count non-null values
                let count = rows
                    .iter()
                    .filter(|row| row.contains_key(&agg.column))
                    .count();
                Ok(count as f64)
            }
        }

        AggregationType::Sum => {
            let sum: f64 = rows
                .iter()
                .filter_map(|row| row.get(&agg.column))
                .filter_map(|v| v.parse::<f64>().ok())
                .sum();
            Ok(sum)
        }

        AggregationType::Avg => {
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|row| row.get(&agg.column))
                .filter_map(|v| v.parse::<f64>().ok())
                .collect();

            if values.is_empty() {
                Ok(0.0)
            } else {
                Ok(values.iter().sum::<f64>() / values.len() as f64)
            }
        }

        AggregationType::Min => {
            let min = rows
                .iter()
                .filter_map(|row| row.get(&agg.column))
                .filter_map(|v| v.parse::<f64>().ok())
                .fold(f64::INFINITY, |a, b| a.min(b));

            if min.is_finite() {
                Ok(min)
            } else {
                Ok(0.0) // No values found
            }
        }

        AggregationType::Max => {
            let max = rows
                .iter()
                .filter_map(|row| row.get(&agg.column))
                .filter_map(|v| v.parse::<f64>().ok())
                .fold(f64::NEG_INFINITY, |a, b| a.max(b));

            if max.is_finite() {
                Ok(max)
            } else {
                Ok(0.0) // No values found
            }
        }
    }
}

/// Extended executor with index-based optimization.
///
/// This executor automatically detects query patterns and uses B+-Tree indices
/// when available and cost-effective.
///
/// ## Example
/// ```rust,ignore
/// use reedbase::reedql::{parse, OptimizedExecutor};
/// use reedbase::indices::BTreeIndex;
///
/// // Create executor with index
/// let hierarchy_index = BTreeIndex::open("hierarchy.idx", Order::new(100)?)?;
/// let executor = OptimizedExecutor::new(vec![
///     ("hierarchy_index".to_string(), Box::new(hierarchy_index)),
/// ]);
///
/// // Execute optimized query
/// let query = parse("SELECT * FROM text WHERE key LIKE 'page.%'")?;
/// let result = executor.execute_optimized(&query, &table)?;
/// ```
pub struct OptimizedExecutor<'a> {
    /// Available indices for optimization, borrowed from the caller's store.
    indices: Vec<(String, &'a dyn Index<String, Vec<usize>>)>,
}

impl<'a> OptimizedExecutor<'a> {
    /// Create executor with available indices.
    ///
    /// Indices are borrowed rather than owned so a caller can plan against
    /// indices held behind a lock guard without moving them out of it.
    ///
    /// ## Arguments
    /// - `indices`: List of (name, index) pairs for optimization
    ///
    /// ## Example
    /// ```rust,ignore
    /// let executor = OptimizedExecutor::new(vec![
    ///     ("hierarchy_index".to_string(), &btree_index as &dyn Index<_, _>),
    /// ]);
    /// ```
    pub fn new(indices: Vec<(String, &'a dyn Index<String, Vec<usize>>)>) -> Self {
        Self { indices }
    }

    /// Execute query with automatic optimization.
    ///
    /// ## Algorithm
    /// 1. Analyze query for patterns (point lookup, prefix scan, range scan)
    /// 2. Plan execution strategy (cost-based: index vs full scan)
    /// 3. Execute using indices if beneficial
    /// 4. Fall back to full scan otherwise
    ///
    /// ## Performance
    /// - Point lookup: <100μs (index)
    /// - Range scan: <10ms for 1000 rows (index)
    /// - Full scan: ~10ms for 1M rows (fallback)
    ///
    /// ## Example
    /// ```rust,ignore
    /// let query = parse("SELECT * FROM text WHERE key = 'page.title'")?;
    /// let result = executor.execute_optimized(&query, &table)?;
    /// // Uses index point lookup if available
    /// ```
    pub fn execute_optimized(
        &self,
        query: &ParsedQuery,
        table: &[HashMap<String, String>],
    ) -> ReedResult<QueryResult> {
        // 1. Analyze query
        let pattern = QueryAnalyzer::analyze(query)?;

        // 2. Plan execution. Index names follow the `table.column`
        // convention used by `database::index::create_index*` — the
        // column the planner matches query conditions against is
        // whatever follows the last dot.
        let planner = QueryPlanner::new(
            self.indices
                .iter()
                .map(|(name, _)| {
                    let column = name.rsplit('.').next().unwrap_or(name).to_string();
                    (name.clone(), column)
                })
                .collect(),
        );
        let plan = planner.plan(&pattern, table.len())?;

        // 3. Execute plan
        match plan {
            ExecutionPlan::FullScan => {
                // Original executor logic
                self.execute_full_scan(query, table)
            }

            ExecutionPlan::IndexPointLookup { index_name, key } => {
                self.execute_point_lookup(&index_name, &key, query, table)
            }

            ExecutionPlan::IndexRangeScan {
                index_name,
                start,
                end,
            } => self.execute_range_scan(&index_name, &start, &end, query, table),
        }
    }

    fn execute_point_lookup(
        &self,
        index_name: &str,
        key: &str,
        query: &ParsedQuery,
        table: &[HashMap<String, String>],
    ) -> ReedResult<QueryResult> {
        // Find index
        let index = self
            .indices
            .iter()
            .find(|(name, _)| name == index_name)
            .ok_or_else(|| ReedError::IndexNotFound {
                name: index_name.to_string(),
            })?;

        // Lookup row IDs
        let row_ids = index.1.get(&key.to_string())?.unwrap_or_default();

        // Fetch rows
        let mut rows: Vec<HashMap<String, String>> = row_ids
            .iter()
            .filter_map(|&id| table.get(id).cloned())
            .collect();

        // Apply remaining filters (non-key conditions)
        rows.retain(|row| Self::matches_all_conditions(row, &query.conditions));

        // Apply ORDER BY, LIMIT, projections
        Self::apply_post_processing(rows, query)
    }

    fn execute_range_scan(
        &self,
        index_name: &str,
        start: &str,
        end: &str,
        query: &ParsedQuery,
        table: &[HashMap<String, String>],
    ) -> ReedResult<QueryResult> {
        // Find index
        let index = self
            .indices
            .iter()
            .find(|(name, _)| name == index_name)
            .ok_or_else(|| ReedError::IndexNotFound {
                name: index_name.to_string(),
            })?;

        // Range scan
        let results = index.1.range(&start.to_string(), &end.to_string())?;

        // Flatten row IDs
        let row_ids: Vec<usize> = results.into_iter().flat_map(|(_, ids)| ids).collect();

        // Fetch rows
        let mut rows: Vec<HashMap<String, String>> = row_ids
            .iter()
            .filter_map(|&id| table.get(id).cloned())
            .collect();

        // Apply remaining filters
        rows.retain(|row| Self::matches_all_conditions(row, &query.conditions));

        // Apply ORDER BY, LIMIT, projections
        Self::apply_post_processing(rows, query)
    }

    fn execute_full_scan(
        &self,
        query: &ParsedQuery,
        table: &[HashMap<String, String>],
    ) -> ReedResult<QueryResult> {
        // Original REED-19-12 logic (unchanged)
        execute(query, table)
    }

    fn matches_all_conditions(
        row: &HashMap<String, String>,
        conditions: &[FilterCondition],
    ) -> bool {
        conditions
            .iter()
            .all(|cond| evaluate_condition(cond, row).unwrap_or(false))
    }

    fn apply_post_processing(
        mut rows: Vec<HashMap<String, String>>,
        query: &ParsedQuery,
    ) -> ReedResult<QueryResult> {
        // Handle aggregation (if specified)
        if let Some(agg) = &query.aggregation {
            let value = aggregate(&rows, agg, query)?;
            return Ok(QueryResult::Aggregation(value));
        }

        // Apply ORDER BY
        if !query.order_by.is_empty() {
            sort_rows(&mut rows, query);
        }

        // Apply LIMIT/OFFSET
        if let Some(limit) = &query.limit {
            rows = apply_limit(rows, limit.offset, limit.limit);
        }

        // Project columns
        let projected = project_columns(&rows, &query.columns)?;

        Ok(QueryResult::Rows(projected))
    }
}
