//! Generic dependency graph primitives used by higher-level tools.

pub mod graph;
pub mod node;
pub mod order;

pub use graph::{DependencyGraph, GraphStatistics};
pub use node::{Node, NodeOrigin};
pub use order::CycleError;
