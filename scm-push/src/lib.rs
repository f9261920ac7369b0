//! Dependency resolution and push orchestration for Strata Cloud Manager
//! configuration snapshots.
//!
//! Configurations for Prisma Access tenants are exported as JSON snapshots:
//! folders and snippets holding addresses, services, security profiles,
//! rules, and the remote-network infrastructure chain. Entities reference
//! each other by name only, so pushing a snapshot to another tenant in the
//! wrong order fails with dangling-reference errors. This library builds the
//! dependency graph behind those name references, validates it, orders it,
//! and drives the push.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`tree`] — Parsed configuration snapshot and item enumeration
//! - [`item`] — Entity categories, locations, and the item record
//!
//! ## Resolution
//!
//! - [`extract`] — Per-category reference extraction rules
//! - [`resolver`] — Graph construction, validation, ordering, and
//!   closure of a selection over its dependencies
//!
//! ## Push
//!
//! - [`conflicts`] — Naming-collision detection against a target tenant
//! - [`push`] — The push pipeline: validate, detect conflicts, order,
//!   execute with per-item error recording
//!
//! ## Reporting & configuration
//!
//! - [`report`] — Terminal-friendly colored report output
//! - [`settings`] — TOML-loaded tunables
//!
//! # Workflow
//!
//! A typical push:
//!
//! 1. **Parse** the source snapshot
//! 2. **Validate** that every reference resolves and the graph is acyclic
//! 3. **Detect conflicts** against the target tenant
//! 4. **Order** items so dependencies land before their dependents
//! 5. **Push** folders then snippets, recording per-item failures
//!
//! # Examples
//!
//! ```ignore
//! use std::path::Path;
//!
//! use scm_push::resolver::{push_order, validate_dependencies};
//! use scm_push::tree::ConfigTree;
//!
//! let tree = ConfigTree::parse_file(Path::new("snapshot.json"))?;
//! let validation = validate_dependencies(&tree);
//! if validation.valid {
//!     for name in push_order(&tree) {
//!         println!("{name}");
//!     }
//! }
//! ```
//!
//! # Built on dep-graph-core
//!
//! The generic graph machinery (nodes, placeholder promotion, topological
//! ordering, cycle detection) lives in `dep-graph-core`. Everything specific
//! to the configuration schema is in this crate.

pub mod conflicts;
pub mod extract;
pub mod item;
pub mod push;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod tree;
