// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Single-invocation measurement.
//!
//! The measured window is bracketed by resource-probe readings in mirrored
//! order: resident memory, CPU time and the monotonic clock on the way in,
//! then the clock, CPU time and resident memory on the way out. The
//! operation's output is dropped only after the closing readings.

use std::time::Instant;

use cipherbench_core::OperationError;
use nix::time::{clock_gettime, ClockId};
use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessRefreshKind, System};

/// One measured repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    /// Monotonic wall-clock time in nanoseconds
    pub wall_time_ns: u64,
    /// Process CPU time (user + system) in nanoseconds
    pub cpu_time_ns: u64,
    /// Change in resident set size in bytes (may be negative)
    pub resident_memory_delta_bytes: i64,
}

/// Source of process-level resource readings.
pub trait ResourceProbe {
    /// Cumulative CPU time consumed by the process, in nanoseconds.
    fn cpu_time_ns(&mut self) -> Result<u64, OperationError>;

    /// Current resident set size in bytes.
    fn resident_bytes(&mut self) -> Result<u64, OperationError>;
}

/// OS-backed probe: `CLOCK_PROCESS_CPUTIME_ID` for CPU time and `sysinfo`
/// for the resident set.
pub struct ProcessProbe {
    system: System,
    pid: Pid,
}

impl ProcessProbe {
    pub fn new() -> Result<Self, OperationError> {
        let pid = sysinfo::get_current_pid().map_err(|reason| OperationError::Probe {
            probe: "pid",
            reason: reason.to_string(),
        })?;
        Ok(Self {
            system: System::new(),
            pid,
        })
    }
}

impl ResourceProbe for ProcessProbe {
    fn cpu_time_ns(&mut self) -> Result<u64, OperationError> {
        let ts = clock_gettime(ClockId::CLOCK_PROCESS_CPUTIME_ID).map_err(|errno| {
            OperationError::Probe {
                probe: "cpu_time",
                reason: errno.to_string(),
            }
        })?;
        Ok(ts.tv_sec() as u64 * 1_000_000_000 + ts.tv_nsec() as u64)
    }

    fn resident_bytes(&mut self) -> Result<u64, OperationError> {
        // Memory only; a full refresh reads cmdline, environ and disk stats.
        let memory_only = ProcessRefreshKind::new().with_memory();
        if !self.system.refresh_process_specifics(self.pid, memory_only) {
            return Err(OperationError::Probe {
                probe: "resident_memory",
                reason: format!("process {} not visible", self.pid),
            });
        }
        self.system
            .process(self.pid)
            .map(|process| process.memory())
            .ok_or_else(|| OperationError::Probe {
                probe: "resident_memory",
                reason: format!("process {} not visible", self.pid),
            })
    }
}

/// Runs one invocation and records its cost.
pub struct Sampler {
    probe: Box<dyn ResourceProbe>,
    last_resident_bytes: u64,
}

impl Sampler {
    /// Sampler backed by the operating system.
    pub fn new() -> Result<Self, OperationError> {
        Ok(Self::with_probe(Box::new(ProcessProbe::new()?)))
    }

    /// Sampler backed by a custom probe.
    pub fn with_probe(probe: Box<dyn ResourceProbe>) -> Self {
        Self {
            probe,
            last_resident_bytes: 0,
        }
    }

    /// Invoke `op` exactly once with `input` and return its cost.
    ///
    /// A failing `op` produces no sample; the error is returned as-is.
    pub fn measure<I, O, F>(&mut self, input: I, op: F) -> Result<RawSample, OperationError>
    where
        F: FnOnce(I) -> Result<O, OperationError>,
    {
        let rss_before = self.probe.resident_bytes()?;
        let cpu_before = self.probe.cpu_time_ns()?;
        let start = Instant::now();

        let output = op(input)?;

        let wall_time_ns = start.elapsed().as_nanos() as u64;
        let cpu_after = self.probe.cpu_time_ns()?;
        let rss_after = self.probe.resident_bytes()?;
        drop(output);

        self.last_resident_bytes = rss_after;

        Ok(RawSample {
            wall_time_ns,
            cpu_time_ns: cpu_after.saturating_sub(cpu_before),
            resident_memory_delta_bytes: rss_after as i64 - rss_before as i64,
        })
    }

    /// Resident set size observed at the end of the most recent sample.
    pub fn last_resident_bytes(&self) -> u64 {
        self.last_resident_bytes
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedProbe;
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_measure_records_deltas() {
        let probe = ScriptedProbe::new(vec![1_000, 6_000], vec![10_000, 14_096]);
        let mut sampler = Sampler::with_probe(Box::new(probe));

        let sample = sampler
            .measure(7u32, |x| {
                thread::sleep(Duration::from_micros(100));
                Ok(x * 2)
            })
            .unwrap();

        assert!(sample.wall_time_ns >= 100_000, "Sample {} < 100μs", sample.wall_time_ns);
        assert_eq!(sample.cpu_time_ns, 5_000);
        assert_eq!(sample.resident_memory_delta_bytes, 4_096);
        assert_eq!(sampler.last_resident_bytes(), 14_096);
    }

    #[test]
    fn test_negative_memory_delta() {
        let probe = ScriptedProbe::new(vec![0, 0], vec![8_192, 4_096]);
        let mut sampler = Sampler::with_probe(Box::new(probe));

        let sample = sampler.measure((), |_| Ok(())).unwrap();
        assert_eq!(sample.resident_memory_delta_bytes, -4_096);
    }

    #[test]
    fn test_failure_propagates() {
        let mut sampler = Sampler::with_probe(Box::new(ScriptedProbe::flat()));
        let result = sampler.measure((), |_| -> Result<(), _> {
            Err(OperationError::failed("invalid key material"))
        });
        assert!(matches!(result, Err(OperationError::Failed { .. })));
    }

    #[test]
    fn test_op_invoked_exactly_once() {
        let mut sampler = Sampler::with_probe(Box::new(ScriptedProbe::flat()));
        let mut calls = 0;
        sampler
            .measure((), |_| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_process_probe_reads() {
        let mut probe = ProcessProbe::new().unwrap();
        let first = probe.cpu_time_ns().unwrap();
        let mut acc = 0u64;
        for i in 0..100_000u64 {
            acc = acc.wrapping_add(i * i);
        }
        std::hint::black_box(acc);
        let second = probe.cpu_time_ns().unwrap();
        assert!(second >= first);
        assert!(probe.resident_bytes().unwrap() > 0);
    }

    #[test]
    fn test_process_probe_refreshes_memory_only() {
        let mut probe = ProcessProbe::new().unwrap();
        let first = probe.resident_bytes().unwrap();
        let second = probe.resident_bytes().unwrap();
        assert!(first > 0 && second > 0);

        // Nothing beyond memory was loaded for the process.
        let process = probe.system.process(probe.pid).unwrap();
        assert!(process.cmd().is_empty());
        assert!(process.environ().is_empty());
    }
}
