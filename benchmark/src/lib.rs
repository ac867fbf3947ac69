// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! cipherbench Benchmarking Framework
//!
//! Reproducible micro-benchmarks of cryptographic primitives: wall-clock
//! time, process CPU time and resident-memory change per operation.
//!
//! # Pipeline
//!
//! - **Sampler**: brackets one invocation with resource readings
//! - **Harness**: warm-up and measured repetitions, tolerating failures
//! - **Stats**: min/max/mean/median/std-dev/percentiles per series
//! - **Registry**: ordered, uniquely named benchmarks
//! - **Driver**: runs the registry and assembles the [`Report`]
//! - **Render**: text table, JSON and summary output
//!
//! # Data Output
//!
//! Reports serialize to JSON and can be saved with [`JsonReporter`].

pub mod driver;
pub mod harness;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod reporter;
pub mod sampler;
pub mod stats;
pub mod suite;

pub use driver::Driver;
pub use harness::{BenchmarkHarness, Measurable, SampleSeries};
pub use metrics::{
    AggregateResult, MemoryStats, PayloadInfo, Report, ReportContext, ResultStatus, SystemInfo,
    TimingStats,
};
pub use registry::BenchmarkRegistry;
pub use reporter::JsonReporter;
pub use sampler::{RawSample, ResourceProbe, Sampler};
pub use suite::build_registry;
