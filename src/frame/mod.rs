// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Frame manager: the unit of multi-table atomicity.
//!
//! A frame is a named batch of writes sharing one timestamp (`shared_ts`)
//! and one snapshot record. `begin` opens it, the caller tags every write
//! it performs with the frame's id and timestamp and records it via
//! [`types::Frame::record_write`] (which durably persists a `participant`
//! event to `frame.log` alongside the in-memory bookkeeping), and `commit`
//! durably closes it out by writing `frames/<shared_ts>.snapshot.csv` and
//! appending to `frames/index.csv`.
//!
//! Frames are cooperative, not isolated (spec non-goal): a reader may
//! observe partial frame state before commit. `recover_active_frames` is
//! the C6 hook that runs at `Database::open`, before any client I/O, and
//! forces every `Active` frame found in `frame.log` to `Crashed` (I7),
//! rolling every table it wrote to back to its pre-frame version first.

pub mod snapshot;
pub mod types;

use crate::error::{ReedError, ReedResult};
use crate::tables::Table;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub use types::{Frame, FrameIndexEntry, FrameStatus, Participant};

pub(crate) fn frames_dir(base_path: &Path) -> PathBuf {
    base_path.join("frames")
}

pub(crate) fn log_path(base_path: &Path) -> PathBuf {
    frames_dir(base_path).join("frame.log")
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos() as u64
}

/// Exclusive lock over `frames/` for the duration of a lifecycle
/// transition (begin/commit/rollback). Mirrors `concurrent::lock`'s
/// per-table file lock, scoped to the frames directory instead.
struct FramesLock {
    _file: File,
}

impl FramesLock {
    fn acquire(base_path: &Path) -> ReedResult<Self> {
        let dir = frames_dir(base_path);
        fs::create_dir_all(&dir).map_err(|e| ReedError::IoError {
            operation: "create_frames_dir".to_string(),
            reason: e.to_string(),
        })?;
        let lock_path = dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| ReedError::IoError {
                operation: "open_frames_lock".to_string(),
                reason: e.to_string(),
            })?;
        file.lock_exclusive().map_err(|e| ReedError::IoError {
            operation: "lock_frames".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { _file: file })
    }
}

impl Drop for FramesLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self._file);
    }
}

fn append_log_line(base_path: &Path, frame_id: Uuid, event: &str, shared_ts: u64) -> ReedResult<()> {
    let dir = frames_dir(base_path);
    fs::create_dir_all(&dir).map_err(|e| ReedError::IoError {
        operation: "create_frames_dir".to_string(),
        reason: e.to_string(),
    })?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(base_path))
        .map_err(|e| ReedError::IoError {
            operation: "open_frame_log".to_string(),
            reason: e.to_string(),
        })?;
    writeln!(file, "{}|{}|{}", shared_ts, frame_id, event).map_err(|e| ReedError::IoError {
        operation: "append_frame_log".to_string(),
        reason: e.to_string(),
    })?;
    file.sync_all().map_err(|e| ReedError::IoError {
        operation: "fsync_frame_log".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Durably records one participant write against an active frame. Appended
/// as its own `participant` event rather than folded into the `begin` line,
/// since writes accumulate over the frame's lifetime.
pub(crate) fn append_participant_line(
    base_path: &Path,
    frame_id: Uuid,
    shared_ts: u64,
    table: &str,
    timestamp: u64,
    content_hash: &str,
) -> ReedResult<()> {
    let dir = frames_dir(base_path);
    fs::create_dir_all(&dir).map_err(|e| ReedError::IoError {
        operation: "create_frames_dir".to_string(),
        reason: e.to_string(),
    })?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(base_path))
        .map_err(|e| ReedError::IoError {
            operation: "open_frame_log".to_string(),
            reason: e.to_string(),
        })?;
    writeln!(
        file,
        "{}|{}|participant|{}|{}|{}",
        shared_ts, frame_id, table, timestamp, content_hash
    )
    .map_err(|e| ReedError::IoError {
        operation: "append_frame_log".to_string(),
        reason: e.to_string(),
    })?;
    file.sync_all().map_err(|e| ReedError::IoError {
        operation: "fsync_frame_log".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Reads every `participant` event recorded for `frame_id` out of
/// `frame.log`. This is the durable counterpart to `Frame.participants`
/// (in-memory only), consulted by [`recover_active_frames`] for frames
/// whose process crashed before commit.
fn parse_participants(base_path: &Path, frame_id: Uuid) -> ReedResult<Vec<Participant>> {
    let path = log_path(base_path);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| ReedError::IoError {
        operation: "read_frame_log".to_string(),
        reason: e.to_string(),
    })?;
    let mut participants = Vec::new();
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 6 || parts[2] != "participant" {
            continue;
        }
        let Ok(line_frame_id) = Uuid::parse_str(parts[1]) else {
            continue;
        };
        if line_frame_id != frame_id {
            continue;
        }
        let Ok(timestamp) = parts[4].parse::<u64>() else {
            continue;
        };
        participants.push(Participant {
            table: parts[3].to_string(),
            timestamp,
            content_hash: parts[5].to_string(),
        });
    }
    Ok(participants)
}

/// Rolls `participant.table` back to the version it held immediately before
/// the crashed frame wrote `participant.timestamp`, i.e. a forward recovery
/// version restoring pre-frame state (spec §4.6/§4.12), never a log rewrite.
fn rollback_participant(base_path: &Path, participant: &Participant) -> ReedResult<()> {
    let table = Table::new(base_path, &participant.table);
    if !table.exists() {
        return Ok(());
    }

    let log_content = fs::read_to_string(table.log_path()).map_err(|e| ReedError::IoError {
        operation: "read_table_log".to_string(),
        reason: e.to_string(),
    })?;
    let entries = crate::log::decode_log_entries(&log_content)?;
    let Some(entry) = entries
        .iter()
        .find(|e| e.timestamp == participant.timestamp)
    else {
        // The table's log no longer has this version (already rolled back
        // or truncated); nothing more we can do here.
        return Ok(());
    };

    if entry.base_version == 0 {
        // The frame's write was this table's very first version; there is
        // no earlier state to restore.
        return Ok(());
    }

    table.rollback(entry.base_version, "system")?;
    Ok(())
}

#[derive(Debug, Clone)]
struct LogRecord {
    shared_ts: u64,
    frame_id: Uuid,
    event: String,
}

fn parse_log(base_path: &Path) -> ReedResult<Vec<LogRecord>> {
    let path = log_path(base_path);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| ReedError::IoError {
        operation: "read_frame_log".to_string(),
        reason: e.to_string(),
    })?;
    let mut records = Vec::new();
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 3 {
            continue;
        }
        let (Ok(shared_ts), Ok(frame_id)) = (parts[0].parse::<u64>(), Uuid::parse_str(parts[1])) else {
            continue;
        };
        records.push(LogRecord {
            shared_ts,
            frame_id,
            event: parts[2].to_string(),
        });
    }
    Ok(records)
}

/// Begins a new frame, reading `shared_ts` once from the monotonic clock.
/// Only one frame may be active per coordinator at a time.
pub fn begin(base_path: &Path, name: &str) -> ReedResult<Frame> {
    let _lock = FramesLock::acquire(base_path)?;

    let records = parse_log(base_path)?;
    let mut by_frame: std::collections::BTreeMap<Uuid, bool> = std::collections::BTreeMap::new();
    for record in &records {
        let terminal = matches!(record.event.as_str(), "commit" | "rolled_back" | "crashed");
        let entry = by_frame.entry(record.frame_id).or_insert(false);
        if terminal {
            *entry = true;
        }
    }
    if let Some((&frame_id, _)) = by_frame.iter().find(|(_, &terminal)| !terminal) {
        // A previous frame never reached a terminal event; recovery should
        // have resolved this at open. Surface it rather than silently
        // stacking frames.
        return Err(ReedError::FrameAlreadyActive {
            frame_id: frame_id.to_string(),
        });
    }

    let frame = Frame::new(name, now_nanos());
    append_log_line(base_path, frame.id, "begin", frame.shared_ts)?;
    Ok(frame)
}

/// Commits a frame: writes its snapshot file, appends its index entry, and
/// records the terminal `commit` event.
pub fn commit(base_path: &Path, frame: &mut Frame) -> ReedResult<PathBuf> {
    let _lock = FramesLock::acquire(base_path)?;

    let path = snapshot::write_snapshot(base_path, frame)?;
    snapshot::append_index_entry(
        base_path,
        FrameIndexEntry {
            shared_ts: frame.shared_ts,
            frame_id: frame.id,
            participant_count: frame.participants.len(),
        },
    )?;
    append_log_line(base_path, frame.id, "commit", frame.shared_ts)?;
    frame.status = FrameStatus::Committed;
    Ok(path)
}

/// Rolls back a frame without writing a snapshot. Any writes already
/// performed under the frame remain as durable table versions (forward
/// recovery) — the caller is responsible for issuing compensating writes
/// if it wants them undone.
pub fn rollback(base_path: &Path, frame: &mut Frame) -> ReedResult<()> {
    let _lock = FramesLock::acquire(base_path)?;
    append_log_line(base_path, frame.id, "rolled_back", frame.shared_ts)?;
    frame.status = FrameStatus::RolledBack;
    Ok(())
}

/// Report of an `Active` frame found and force-resolved at open.
#[derive(Debug, Clone)]
pub struct RecoveredFrame {
    pub frame_id: Uuid,
    pub shared_ts: u64,
}

/// Runs at `Database::open`, before any client I/O (I7). Any frame whose
/// `frame.log` history ends on `begin` without a matching terminal event is
/// forced to `Crashed` — and every table it wrote to under the frame is
/// rolled forward to a new version restoring its pre-frame state, per
/// spec §4.6/§4.12. A frame with no recorded participants (nothing written
/// yet) is simply marked `Crashed`.
pub fn recover_active_frames(base_path: &Path) -> ReedResult<Vec<RecoveredFrame>> {
    let _lock = FramesLock::acquire(base_path)?;
    let records = parse_log(base_path)?;

    let mut by_frame: std::collections::BTreeMap<Uuid, Vec<&LogRecord>> = std::collections::BTreeMap::new();
    for record in &records {
        by_frame.entry(record.frame_id).or_default().push(record);
    }

    let mut recovered = Vec::new();
    for (frame_id, mut events) in by_frame {
        events.sort_by_key(|r| r.event != "begin"); // begin first if present
        let has_terminal = events
            .iter()
            .any(|r| matches!(r.event.as_str(), "commit" | "rolled_back" | "crashed"));
        if has_terminal {
            continue;
        }
        let shared_ts = events.first().map(|r| r.shared_ts).unwrap_or(0);

        for participant in parse_participants(base_path, frame_id)? {
            rollback_participant(base_path, &participant)?;
        }

        append_log_line(base_path, frame_id, "crashed", shared_ts)?;
        recovered.push(RecoveredFrame { frame_id, shared_ts });
    }

    Ok(recovered)
}

/// Lists every frame recorded in `frame.log` with its latest known status.
pub fn list_frames(base_path: &Path) -> ReedResult<Vec<(Uuid, u64, FrameStatus)>> {
    let records = parse_log(base_path)?;
    let mut by_frame: std::collections::BTreeMap<Uuid, (u64, FrameStatus)> = std::collections::BTreeMap::new();
    for record in records {
        let status = match record.event.as_str() {
            "begin" => FrameStatus::Active,
            "commit" => FrameStatus::Committed,
            "rolled_back" => FrameStatus::RolledBack,
            "crashed" => FrameStatus::Crashed,
            _ => continue,
        };
        let entry = by_frame.entry(record.frame_id).or_insert((record.shared_ts, status));
        // Later events (commit/rolled_back/crashed) supersede `begin`.
        if status != FrameStatus::Active {
            entry.1 = status;
        }
    }
    Ok(by_frame.into_iter().map(|(id, (ts, status))| (id, ts, status)).collect())
}

/// Looks up the current status of one frame by id.
pub fn frame_status(base_path: &Path, frame_id: Uuid) -> ReedResult<FrameStatus> {
    list_frames(base_path)?
        .into_iter()
        .find(|(id, _, _)| *id == frame_id)
        .map(|(_, _, status)| status)
        .ok_or_else(|| ReedError::FrameNotFound {
            frame_id: frame_id.to_string(),
        })
}

/// Removes committed-frame snapshot files older than `retention_days`.
/// `frame.log` and `frames/index.csv` are left intact — they are the
/// lookup path for point-in-time restore and are small relative to the
/// snapshot files they index.
pub fn cleanup_frames(base_path: &Path, retention_days: u32) -> ReedResult<usize> {
    let _lock = FramesLock::acquire(base_path)?;
    let cutoff_ns = now_nanos().saturating_sub(retention_days as u64 * 86_400 * 1_000_000_000);

    let entries = snapshot::read_index(base_path)?;
    let mut removed = 0;
    for entry in entries {
        if entry.shared_ts < cutoff_ns {
            let path = frames_dir(base_path).join(format!("{}.snapshot.csv", entry.shared_ts));
            if path.exists() {
                fs::remove_file(&path).map_err(|e| ReedError::IoError {
                    operation: "remove_expired_snapshot".to_string(),
                    reason: e.to_string(),
                })?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}
