//! Node ID generation
//!
//! The builder never invents IDs itself; it asks an injected [`IdGenerator`].
//! The only contract is uniqueness for the lifetime of a registry.

use crate::types::NodeId;

/// Source of fresh node IDs
pub trait IdGenerator: Send {
    /// Produce an ID never returned before by this generator
    fn next_id(&mut self) -> NodeId;
}

/// Random UUID v4 IDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> NodeId {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `"{prefix}-{n}"` IDs, counting from 1
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NodeId {
        self.counter += 1;
        format!("{}-{}", self.prefix, self.counter)
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> NodeId + Send,
{
    fn next_id(&mut self) -> NodeId {
        self()
    }
}
