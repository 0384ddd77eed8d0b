// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Recording hook for engine-internal timing events.
//!
//! The storage core does not ship a metrics transport or aggregator; callers
//! that need one (CLI, a server layer) install their own [`MetricSink`] at
//! `Database::open`. Without a sink installed, recorded metrics are dropped.

use once_cell::sync::Lazy;
use std::sync::RwLock;

/// One timing/count observation emitted by the engine.
#[derive(Debug, Clone)]
pub struct Metric {
    pub name: &'static str,
    pub value: f64,
    pub unit: MetricUnit,
    pub table: Option<String>,
}

impl Metric {
    pub fn new(name: &'static str, value: f64, unit: MetricUnit) -> Self {
        Self {
            name,
            value,
            unit,
            table: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Microseconds,
    Bytes,
    Count,
}

/// Receives metrics recorded through [`record`]. Implemented by whatever
/// sits above the core (CLI stats command, an exporter, a test spy).
pub trait MetricSink: Send + Sync {
    fn record(&self, metric: &Metric);
}

struct NoopSink;

impl MetricSink for NoopSink {
    fn record(&self, _metric: &Metric) {}
}

static SINK: Lazy<RwLock<Box<dyn MetricSink>>> = Lazy::new(|| RwLock::new(Box::new(NoopSink)));

/// Installs the process-wide sink. A later call replaces the previous one.
pub fn install_sink(sink: Box<dyn MetricSink>) {
    *SINK.write().expect("metrics sink lock poisoned") = sink;
}

/// Reverts to the silent no-op sink.
pub fn clear_sink() {
    *SINK.write().expect("metrics sink lock poisoned") = Box::new(NoopSink);
}

/// The single recording hook used by the write path, the query executor,
/// and the B+-Tree. Never blocks on I/O itself — that is the sink's job.
pub fn record(metric: Metric) {
    SINK.read().expect("metrics sink lock poisoned").record(&metric);
}
