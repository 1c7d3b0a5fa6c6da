//! Dependency-Gated Effects
//!
//! This module implements the effect registry and its change-detection
//! policy.
//!
//! # Concepts
//!
//! ## Identifiers
//!
//! Every effect slot is named by a caller-chosen identifier. The registry
//! never generates identifiers; callers must keep them stable between calls.
//!
//! ## Dependencies
//!
//! Each call passes the values the action depends on. When they are
//! unchanged since the last run for that identifier, the action is skipped.
//! Passing no dependencies at all means "always run".
//!
//! ## Comparators
//!
//! Whether two dependency sequences are "unchanged" is decided by a
//! comparator. The default, [`Shallow`], compares top-level elements with
//! SameValue semantics. Any closure over two slices can replace it.

mod compare;
mod id;
mod registry;

pub use compare::{shallow_compare, Comparator, Shallow};
pub use id::EffectId;
pub use registry::{run_effect, run_effect_with, EffectRegistry};
