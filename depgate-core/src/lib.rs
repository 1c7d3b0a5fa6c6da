//! Depgate Core
//!
//! This crate provides a small memoization primitive: run a side effect for a
//! caller-chosen identifier only when the values it depends on have changed
//! since the last run.
//!
//! # Architecture
//!
//! - `value`: Dynamic values used as identifiers and dependencies
//! - `effect`: The effect registry and dependency comparators
//! - `error`: Argument validation errors
//!
//! # Example
//!
//! ```rust
//! use depgate_core::{deps, EffectRegistry, Value};
//!
//! let registry = EffectRegistry::new();
//! let mut log = Vec::new();
//!
//! for user in ["ada", "ada", "grace"] {
//!     registry
//!         .run_effect("load-profile", deps![user], || log.push(user))
//!         .unwrap();
//! }
//! assert_eq!(log, ["ada", "grace"]);
//!
//! // Without dependencies the effect runs every time.
//! let mut ticks = 0;
//! for _ in 0..3 {
//!     registry.run_effect("tick", Value::Null, || ticks += 1).unwrap();
//! }
//! assert_eq!(ticks, 3);
//! ```

pub mod effect;
pub mod error;
pub mod value;

pub use effect::{
    run_effect, run_effect_with, shallow_compare, Comparator, EffectId, EffectRegistry, Shallow,
};
pub use error::{Error, InvalidArgument, Result};
pub use value::{same_value, same_value_zero, Array, Value};
