// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Ordered benchmark registry.
//!
//! Registration order is the execution and reporting order.

use std::collections::HashSet;

use cipherbench_core::{BenchError, BenchResult, BenchmarkName, BenchmarkSpec, Primitive};

use crate::harness::Measurable;

/// Entry in the benchmark registry.
pub struct BenchmarkEntry {
    /// What to run and how often.
    pub spec: BenchmarkSpec,
    /// The operation being measured.
    pub op: Box<dyn Measurable>,
}

/// Registry of benchmarks keyed by unique name.
#[derive(Default)]
pub struct BenchmarkRegistry {
    entries: Vec<BenchmarkEntry>,
    names: HashSet<BenchmarkName>,
}

impl BenchmarkRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a benchmark.
    /// Returns `DuplicateBenchmark` if the name is taken; the existing entry is kept.
    pub fn register(&mut self, spec: BenchmarkSpec, op: Box<dyn Measurable>) -> BenchResult<()> {
        // Check for duplicate - fail fast
        if self.names.contains(spec.name()) {
            return Err(BenchError::DuplicateBenchmark {
                name: spec.name().clone(),
            });
        }

        self.names.insert(spec.name().clone());
        self.entries.push(BenchmarkEntry { spec, op });
        Ok(())
    }

    /// Register a concrete primitive.
    pub fn register_primitive<P>(&mut self, spec: BenchmarkSpec, primitive: P) -> BenchResult<()>
    where
        P: Primitive + 'static,
    {
        self.register(spec, Box::new(primitive))
    }

    /// All benchmarks in registration order.
    pub fn all(&self) -> impl Iterator<Item = (&BenchmarkSpec, &dyn Measurable)> {
        self.entries.iter().map(|e| (&e.spec, e.op.as_ref()))
    }

    /// Mutable access for execution, in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BenchmarkEntry> {
        self.entries.iter_mut()
    }

    /// Check if a benchmark name is registered.
    pub fn contains(&self, name: &BenchmarkName) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<BenchmarkName> {
        self.entries.iter().map(|e| e.spec.name().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherbench_core::primitives::from_fn;
    use cipherbench_core::{Algorithm, IterationCount, Operation, PayloadSize};

    fn spec(name: &str) -> BenchmarkSpec {
        BenchmarkSpec::new(
            BenchmarkName::new(name).unwrap(),
            Algorithm::X25519,
            Operation::KeyGen,
            PayloadSize::new(0).unwrap(),
            IterationCount::new(5).unwrap(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_register_preserves_order() {
        let mut registry = BenchmarkRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register_primitive(spec(name), from_fn(|| Ok(())))
                .unwrap();
        }

        assert_eq!(registry.len(), 3);
        let names: Vec<String> = registry.names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let from_all: Vec<&str> = registry.all().map(|(s, _)| s.name().as_str()).collect();
        assert_eq!(from_all, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = BenchmarkRegistry::new();
        registry
            .register_primitive(spec("x25519-keygen"), from_fn(|| Ok(1u8)))
            .unwrap();

        let result = registry.register_primitive(spec("x25519-keygen"), from_fn(|| Ok(2u8)));
        assert!(matches!(result, Err(BenchError::DuplicateBenchmark { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_spec_two_names() {
        let mut registry = BenchmarkRegistry::new();
        let base = spec("first");
        let renamed = base.renamed(BenchmarkName::new("second").unwrap());

        registry.register_primitive(base, from_fn(|| Ok(()))).unwrap();
        registry.register_primitive(renamed, from_fn(|| Ok(()))).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&BenchmarkName::new("second").unwrap()));
    }

    #[test]
    fn test_empty_registry() {
        let registry = BenchmarkRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.all().count(), 0);
    }
}
