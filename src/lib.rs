// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! ReedBase - versioned, row-structured key/value store.
//!
//! A file-based table engine with binary-delta versioning, row-level
//! concurrent-write merge, structured-key indices, and a small SQL-subset
//! query layer over it all.
//!
//! ## Features
//!
//! - **Binary Delta Versioning**: Space-efficient history using bsdiff + xz
//! - **Crash Recovery**: Log CRC repair, snapshot reconstruction, frame rollback
//! - **Concurrent Writes**: Per-table file locking with three-way merge
//! - **RBKS v2 Keys**: Structured `ns.h1…hn<mod,mod>` keys with fallback lookup
//! - **Pluggable Indices**: Hash / B+-Tree / hierarchy-trie backends
//! - **Frames & Point-in-Time Recovery**: Shared-timestamp multi-table batches
//! - **ReedQL**: A bounded SQL subset planned over the index layer
//!
//! ## Quick Start
//!
//! ```no_run
//! use reedbase::Database;
//!
//! let db = Database::open(".reed").unwrap();
//! let result = db.query("SELECT * FROM text WHERE namespace = 'page'").unwrap();
//! ```
//!
//! ## Architecture
//!
//! ReedBase is organized into modules:
//!
//! - **registry**: Action/user name dictionaries (C1)
//! - **tables**: CSV codec and table engine (C2, C3)
//! - **version**: Binary delta engine and version log (C4, C5)
//! - **concurrent**: Per-table locking, write queue, crash recovery (C6, C7)
//! - **merge** / **conflict**: Three-way merge and conflict arbitration (C8)
//! - **schema**: RBKS v2 key validator (C9)
//! - **btree** / **indices**: B+-Tree engine and pluggable index layer (C10, C11)
//! - **frame**: Frame lifecycle, shared-timestamp snapshots (C12)
//! - **backup**: Archival and point-in-time recovery (C13)
//! - **reedql**: Query planner and executor (C14)
//! - **database**: Database façade (C15)
//! - **metrics**: A single recording hook; transport/aggregation live above this core

pub mod backup;
pub mod btree;
pub mod concurrent;
pub mod conflict;
pub mod config;
pub mod database;
pub mod error;
pub mod frame;
pub mod indices;
pub mod log;
pub mod merge;
pub mod metrics;
pub mod reedql;
pub mod registry;
pub mod schema;
pub mod tables;
pub mod version;

// Re-export commonly used types
pub use backup::{create_backup, list_backups, restore_point_in_time, BackupInfo, RestoreReport};
pub use btree::{BPlusTree, Index, Order};
pub use database::{AutoIndexConfig, Database, DatabaseStats, ExecuteResult, QueryMetrics};
pub use error::{ReedError, ReedResult};
pub use frame::{Frame, FrameStatus};
pub use metrics::{Metric, MetricUnit};
pub use reedql::QueryResult;
