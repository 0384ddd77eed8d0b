// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Per-table, per-key-glob conflict resolution policy (`conflict.toml`).

use crate::conflict::types::ResolutionStrategy;
use crate::error::{ReedError, ReedResult};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A single glob-matched override read from `conflict.toml`.
pub struct GlobRule {
    pub glob: String,
    pub strategy: ResolutionStrategy,
    matcher: Regex,
}

/// Conflict policy for one table: a default strategy plus ordered glob overrides.
///
/// Rules are checked in file order; the first matching glob wins. A key that
/// matches no rule falls back to `default_strategy`.
pub struct ConflictPolicy {
    pub default_strategy: ResolutionStrategy,
    pub rules: Vec<GlobRule>,
}

#[derive(Deserialize)]
struct ConflictTomlFile {
    default_strategy: Option<String>,
    #[serde(default)]
    rule: Vec<RuleToml>,
}

#[derive(Deserialize)]
struct RuleToml {
    glob: String,
    strategy: String,
}

impl ConflictPolicy {
    /// Loads `tables/{table_name}/conflict.toml`, falling back to `default`
    /// (the table-wide/global strategy, e.g. `[concurrency].merge_strategy`)
    /// when the file doesn't exist.
    ///
    /// ## Error Conditions
    /// - `ConflictConfigInvalid`: file present but unparsable, or names an
    ///   unknown strategy or an unsupported glob pattern
    pub fn load(
        base_path: &Path,
        table_name: &str,
        default: ResolutionStrategy,
    ) -> ReedResult<Self> {
        let path = base_path.join("tables").join(table_name).join("conflict.toml");
        if !path.exists() {
            return Ok(Self {
                default_strategy: default,
                rules: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| ReedError::IoError {
            operation: format!("read conflict policy '{}'", path.display()),
            reason: e.to_string(),
        })?;

        let parsed: ConflictTomlFile =
            toml::from_str(&content).map_err(|e| ReedError::ConflictConfigInvalid {
                reason: format!("{}: {}", path.display(), e),
            })?;

        let default_strategy = match parsed.default_strategy {
            Some(name) => ResolutionStrategy::from_name(&name).ok_or_else(|| {
                ReedError::ConflictConfigInvalid {
                    reason: format!("unknown default_strategy '{}'", name),
                }
            })?,
            None => default,
        };

        let mut rules = Vec::with_capacity(parsed.rule.len());
        for rule in parsed.rule {
            let strategy = ResolutionStrategy::from_name(&rule.strategy).ok_or_else(|| {
                ReedError::ConflictConfigInvalid {
                    reason: format!("unknown strategy '{}' for glob '{}'", rule.strategy, rule.glob),
                }
            })?;
            let matcher = glob_to_regex(&rule.glob).map_err(|e| ReedError::ConflictConfigInvalid {
                reason: format!("invalid glob '{}': {}", rule.glob, e),
            })?;
            rules.push(GlobRule {
                glob: rule.glob,
                strategy,
                matcher,
            });
        }

        Ok(Self {
            default_strategy,
            rules,
        })
    }

    /// Resolves the strategy that applies to `key`: the first matching glob
    /// rule, or `default_strategy` if none match.
    pub fn strategy_for(&self, key: &str) -> ResolutionStrategy {
        self.rules
            .iter()
            .find(|rule| rule.matcher.is_match(key))
            .map(|rule| rule.strategy)
            .unwrap_or(self.default_strategy)
    }
}

/// Translates a shell-style glob (`*` = any run of characters, `?` = single
/// character) into an anchored regex. There is no dedicated glob crate in the
/// dependency tree, so key-glob matching rides on the `regex` crate already
/// used for RBKS pattern validation.
fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(glob.len() * 2 + 2);
    pattern.push('^');
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}
