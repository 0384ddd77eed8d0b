// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Types for the frame lifecycle state machine.

use crate::error::ReedResult;
use std::path::Path;
use uuid::Uuid;

/// Lifecycle state of a frame. Transitions are one-way:
/// `Active -> Committed`, `Active -> RolledBack`, or (found orphaned at
/// open) `Active -> Crashed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Active,
    Committed,
    RolledBack,
    Crashed,
}

impl FrameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameStatus::Active => "active",
            FrameStatus::Committed => "committed",
            FrameStatus::RolledBack => "rolled_back",
            FrameStatus::Crashed => "crashed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(FrameStatus::Active),
            "committed" => Some(FrameStatus::Committed),
            "rolled_back" => Some(FrameStatus::RolledBack),
            "crashed" => Some(FrameStatus::Crashed),
            _ => None,
        }
    }
}

/// One write recorded against a frame: the table it landed in, the version
/// timestamp it produced, and the content hash of that version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub table: String,
    pub timestamp: u64,
    pub content_hash: String,
}

/// A batch of writes sharing one timestamp and one snapshot record.
///
/// Returned by [`super::begin`]. The caller tags every write it performs
/// under this frame with `shared_ts` and `id`, then calls
/// [`Participant::record`] (via [`super::commit`]'s caller contract) before
/// committing or rolling back.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: Uuid,
    pub name: String,
    pub shared_ts: u64,
    pub status: FrameStatus,
    pub participants: Vec<Participant>,
}

impl Frame {
    pub fn new(name: impl Into<String>, shared_ts: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            shared_ts,
            status: FrameStatus::Active,
            participants: Vec::new(),
        }
    }

    /// Tags a write performed under this frame. Call once per write, in
    /// commit order.
    ///
    /// Durably appends a `participant` event to `frame.log` before updating
    /// the in-memory list, so a crash before commit still leaves enough on
    /// disk for [`super::recover_active_frames`] to roll this table back to
    /// its pre-frame version.
    pub fn record_write(
        &mut self,
        base_path: &Path,
        table: impl Into<String>,
        timestamp: u64,
        content_hash: impl Into<String>,
    ) -> ReedResult<()> {
        let table = table.into();
        let content_hash = content_hash.into();
        super::append_participant_line(base_path, self.id, self.shared_ts, &table, timestamp, &content_hash)?;
        self.participants.push(Participant {
            table,
            timestamp,
            content_hash,
        });
        Ok(())
    }
}

/// One row of `frames/index.csv`: a committed frame's lookup entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameIndexEntry {
    pub shared_ts: u64,
    pub frame_id: Uuid,
    pub participant_count: usize,
}
