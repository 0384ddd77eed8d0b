// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `frames/<ts>.snapshot.csv` and `frames/index.csv` persistence.
//!
//! Both files use the same pipe-delimited, LF-terminated, no-quoting
//! grammar as `current.csv` (the codec in `crate::tables::csv_parser`
//! covers row data, not these fixed-column records, so they are encoded
//! directly here).

use crate::error::{ReedError, ReedResult};
use crate::frame::types::{Frame, FrameIndexEntry};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

fn frames_dir(base_path: &Path) -> PathBuf {
    base_path.join("frames")
}

fn snapshot_path(base_path: &Path, shared_ts: u64) -> PathBuf {
    frames_dir(base_path).join(format!("{}.snapshot.csv", shared_ts))
}

fn index_path(base_path: &Path) -> PathBuf {
    frames_dir(base_path).join("index.csv")
}

/// Writes `frames/<shared_ts>.snapshot.csv`: one `table|timestamp|content_hash|frame_id`
/// row per participant. Atomic temp-file-then-rename, fsynced, matching the
/// table engine's snapshot write discipline.
pub fn write_snapshot(base_path: &Path, frame: &Frame) -> ReedResult<PathBuf> {
    let dir = frames_dir(base_path);
    fs::create_dir_all(&dir).map_err(|e| ReedError::IoError {
        operation: "create_frames_dir".to_string(),
        reason: e.to_string(),
    })?;

    let path = snapshot_path(base_path, frame.shared_ts);
    let tmp_path = dir.join(format!("{}.snapshot.csv.tmp", frame.shared_ts));

    let mut body = String::new();
    for participant in &frame.participants {
        body.push_str(&format!(
            "{}|{}|{}|{}\n",
            participant.table, participant.timestamp, participant.content_hash, frame.id
        ));
    }

    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| ReedError::IoError {
            operation: "create_snapshot_tmp".to_string(),
            reason: e.to_string(),
        })?;
        file.write_all(body.as_bytes())
            .map_err(|e| ReedError::IoError {
                operation: "write_snapshot_tmp".to_string(),
                reason: e.to_string(),
            })?;
        file.sync_all().map_err(|e| ReedError::IoError {
            operation: "fsync_snapshot_tmp".to_string(),
            reason: e.to_string(),
        })?;
    }

    fs::rename(&tmp_path, &path).map_err(|e| ReedError::IoError {
        operation: "rename_snapshot".to_string(),
        reason: e.to_string(),
    })?;

    Ok(path)
}

/// Parses a snapshot file back into `(table, timestamp, content_hash, frame_id)` rows.
pub fn read_snapshot(path: &Path) -> ReedResult<Vec<(String, u64, String, Uuid)>> {
    let content = fs::read_to_string(path).map_err(|e| ReedError::IoError {
        operation: "read_snapshot".to_string(),
        reason: e.to_string(),
    })?;

    let mut rows = Vec::new();
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 4 {
            return Err(ReedError::FrameSnapshotCorrupted {
                path: path.to_path_buf(),
                reason: format!("expected 4 fields, found {}", parts.len()),
            });
        }
        let timestamp: u64 = parts[1].parse().map_err(|_| ReedError::FrameSnapshotCorrupted {
            path: path.to_path_buf(),
            reason: format!("invalid timestamp '{}'", parts[1]),
        })?;
        let frame_id = Uuid::parse_str(parts[3]).map_err(|_| ReedError::FrameSnapshotCorrupted {
            path: path.to_path_buf(),
            reason: format!("invalid frame id '{}'", parts[3]),
        })?;
        rows.push((parts[0].to_string(), timestamp, parts[2].to_string(), frame_id));
    }
    Ok(rows)
}

/// Reads `frames/index.csv`, sorted ascending by `shared_ts` (the invariant
/// every writer restores before returning).
pub fn read_index(base_path: &Path) -> ReedResult<Vec<FrameIndexEntry>> {
    let path = index_path(base_path);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|e| ReedError::IoError {
        operation: "read_frame_index".to_string(),
        reason: e.to_string(),
    })?;

    let mut entries = Vec::new();
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 3 {
            return Err(ReedError::FrameSnapshotCorrupted {
                path: path.clone(),
                reason: format!("index row has {} fields, expected 3", parts.len()),
            });
        }
        let shared_ts: u64 = parts[0].parse().map_err(|_| ReedError::FrameSnapshotCorrupted {
            path: path.clone(),
            reason: format!("invalid shared_ts '{}'", parts[0]),
        })?;
        let frame_id = Uuid::parse_str(parts[1]).map_err(|_| ReedError::FrameSnapshotCorrupted {
            path: path.clone(),
            reason: format!("invalid frame id '{}'", parts[1]),
        })?;
        let participant_count: usize = parts[2].parse().map_err(|_| ReedError::FrameSnapshotCorrupted {
            path: path.clone(),
            reason: format!("invalid participant count '{}'", parts[2]),
        })?;
        entries.push(FrameIndexEntry {
            shared_ts,
            frame_id,
            participant_count,
        });
    }
    entries.sort_by_key(|e| e.shared_ts);
    Ok(entries)
}

/// Inserts one entry into `frames/index.csv`, keeping it sorted by
/// `shared_ts`. Rewrites the whole (small) file under the frames lock held
/// by the caller.
pub fn append_index_entry(base_path: &Path, entry: FrameIndexEntry) -> ReedResult<()> {
    let dir = frames_dir(base_path);
    fs::create_dir_all(&dir).map_err(|e| ReedError::IoError {
        operation: "create_frames_dir".to_string(),
        reason: e.to_string(),
    })?;

    let mut entries = read_index(base_path)?;
    entries.retain(|e| e.frame_id != entry.frame_id);
    entries.push(entry);
    entries.sort_by_key(|e| e.shared_ts);

    let mut body = String::new();
    for e in &entries {
        body.push_str(&format!("{}|{}|{}\n", e.shared_ts, e.frame_id, e.participant_count));
    }

    let path = index_path(base_path);
    let tmp_path = dir.join("index.csv.tmp");
    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| ReedError::IoError {
            operation: "create_frame_index_tmp".to_string(),
            reason: e.to_string(),
        })?;
        file.write_all(body.as_bytes())
            .map_err(|e| ReedError::IoError {
                operation: "write_frame_index_tmp".to_string(),
                reason: e.to_string(),
            })?;
        file.sync_all().map_err(|e| ReedError::IoError {
            operation: "fsync_frame_index_tmp".to_string(),
            reason: e.to_string(),
        })?;
    }
    fs::rename(&tmp_path, &path).map_err(|e| ReedError::IoError {
        operation: "rename_frame_index".to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Binary search for the most recent committed frame at or before
/// `target_ts`. This is the 100x acceleration path point-in-time restore
/// uses instead of a per-table log walk.
pub fn find_frame_at_or_before(base_path: &Path, target_ts: u64) -> ReedResult<Option<FrameIndexEntry>> {
    let entries = read_index(base_path)?;
    match entries.binary_search_by_key(&target_ts, |e| e.shared_ts) {
        Ok(idx) => Ok(Some(entries[idx].clone())),
        Err(0) => Ok(None),
        Err(idx) => Ok(Some(entries[idx - 1].clone())),
    }
}
