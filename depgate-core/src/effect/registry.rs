//! Effect Registry
//!
//! The registry remembers, per identifier, the dependencies an effect last
//! ran with, and uses them to decide whether the next call should run.
//!
//! # Decision Rules
//!
//! 1. The first call for an identifier always runs. Its dependencies are
//!    stored as given, even when absent.
//!
//! 2. Later calls run when the stored dependencies are absent, when the new
//!    dependencies are absent, or when the comparator reports a change. The
//!    new dependencies replace the stored ones only after a run.
//!
//! 3. Otherwise the action is skipped and nothing is stored.
//!
//! Absent dependencies (`null` or `undefined`) opt out of memoization: the
//! action runs on every call.
//!
//! # Thread Safety
//!
//! Registrations live in a `DashMap`, each behind its own reentrant mutex.
//! The lookup, comparison, action and update for one identifier happen while
//! that identifier's mutex is held, so two threads can never both run the
//! first call for the same identifier. A new registration is locked before it
//! becomes visible in the map.
//!
//! # Nested Calls
//!
//! Actions and comparators may call back into the registry, including with
//! the identifier that is currently running. The mutex is reentrant and no
//! borrow of the registration is held while user code runs, so the nested
//! call sees the state a sequential caller would:
//!
//! - inside a first run, the new dependencies are already stored;
//! - inside a later run, the previous dependencies are still stored, and the
//!   outer call overwrites whatever the nested call stored once its action
//!   returns.
//!
//! Locks are per identifier, so two threads whose actions nest in opposite
//! orders (`a` calls into `b` while `b` calls into `a`) can deadlock.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use tracing::{debug, trace};

use super::compare::{Comparator, Shallow};
use super::id::EffectId;
use crate::error::{InvalidArgument, Result};
use crate::value::{Array, Value};

/// State remembered for one identifier.
#[derive(Debug)]
struct Registration {
    /// Dependencies of the last run. `None` when they were absent.
    dependencies: Option<Array>,

    /// Number of completed runs.
    runs: usize,
}

type Slot = Arc<ReentrantMutex<RefCell<Registration>>>;

/// Why an action was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunReason {
    First,
    Untracked,
    Changed,
}

impl RunReason {
    fn as_str(self) -> &'static str {
        match self {
            RunReason::First => "first",
            RunReason::Untracked => "no-dependencies",
            RunReason::Changed => "changed",
        }
    }
}

/// An identifier-keyed store of effect registrations.
///
/// # Example
///
/// ```rust
/// use depgate_core::{deps, EffectRegistry};
///
/// let registry = EffectRegistry::new();
/// let mut runs = 0;
///
/// registry.run_effect("greeting", deps!["hello"], || runs += 1).unwrap();
/// registry.run_effect("greeting", deps!["hello"], || runs += 1).unwrap();
/// registry.run_effect("greeting", deps!["goodbye"], || runs += 1).unwrap();
///
/// assert_eq!(runs, 2);
/// ```
#[derive(Default)]
pub struct EffectRegistry {
    registrations: DashMap<EffectId, Slot>,
}

static GLOBAL: OnceLock<EffectRegistry> = OnceLock::new();

impl EffectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the free [`run_effect`] functions.
    ///
    /// Prefer an explicitly owned registry where one can be threaded through.
    pub fn global() -> &'static EffectRegistry {
        GLOBAL.get_or_init(EffectRegistry::new)
    }

    /// Run `action` if `dependencies` changed since the last call for `id`,
    /// comparing with [`Shallow`].
    ///
    /// `dependencies` must be an array, `null` or `undefined`.
    pub fn run_effect<F>(
        &self,
        id: impl Into<Value>,
        dependencies: impl Into<Value>,
        action: F,
    ) -> Result<()>
    where
        F: FnOnce(),
    {
        self.run_effect_with(id, dependencies, action, &Shallow)
    }

    /// Like [`run_effect`](Self::run_effect), with a custom comparator.
    ///
    /// The comparator receives the stored and the new dependencies and
    /// returns whether they should be considered equal. It is only called
    /// when both are present.
    pub fn run_effect_with<F, C>(
        &self,
        id: impl Into<Value>,
        dependencies: impl Into<Value>,
        action: F,
        comparator: &C,
    ) -> Result<()>
    where
        F: FnOnce(),
        C: Comparator + ?Sized,
    {
        let id = EffectId::new(id)?;
        let dependencies = into_dependencies(dependencies.into())?;

        self.run_validated(id, dependencies, action, |prev, current| {
            comparator.equal(prev.as_slice(), current.as_slice())
        });
        Ok(())
    }

    /// Dynamically-typed entry point.
    ///
    /// `action` must be a [`Value::Function`]; it is called with no
    /// arguments and its result is ignored. `comparator`, when given, must
    /// also be a function. It is called with the stored and the new
    /// dependency arrays and its result is read by truthiness.
    pub fn run_effect_value(
        &self,
        id: &Value,
        dependencies: &Value,
        action: &Value,
        comparator: Option<&Value>,
    ) -> Result<()> {
        let id = EffectId::new(id.clone())?;
        let dependencies = into_dependencies(dependencies.clone())?;
        let action = action
            .as_function()
            .ok_or(InvalidArgument::ActionNotCallable(action.type_name()))?;
        let comparator = comparator
            .map(|value| {
                value
                    .as_function()
                    .ok_or(InvalidArgument::ComparatorNotCallable(value.type_name()))
            })
            .transpose()?;

        let run = || {
            action.call(&[]);
        };

        match comparator {
            Some(comparator) => self.run_validated(id, dependencies, run, |prev, current| {
                comparator
                    .call(&[Value::Array(prev.clone()), Value::Array(current.clone())])
                    .is_truthy()
            }),
            None => self.run_validated(id, dependencies, run, |prev, current| {
                Shallow.equal(prev.as_slice(), current.as_slice())
            }),
        }
        Ok(())
    }

    /// Lookup, decide, act and update. Arguments are already validated.
    fn run_validated<F, E>(
        &self,
        id: EffectId,
        dependencies: Option<Array>,
        action: F,
        equal: E,
    ) where
        F: FnOnce(),
        E: FnOnce(&Array, &Array) -> bool,
    {
        match self.registrations.entry(id) {
            Entry::Vacant(entry) => {
                let id = entry.key().clone();
                let slot: Slot = Arc::new(ReentrantMutex::new(RefCell::new(Registration {
                    dependencies,
                    runs: 0,
                })));
                let registration = slot.lock();
                entry.insert(Arc::clone(&slot));

                action();
                record_run(&id, &registration, RunReason::First);
            }
            Entry::Occupied(entry) => {
                let id = entry.key().clone();
                let slot = Arc::clone(entry.get());
                drop(entry);

                let registration = slot.lock();
                let prev = registration.borrow().dependencies.clone();
                let reason = match (&prev, &dependencies) {
                    (Some(prev), Some(current)) => {
                        if equal(prev, current) {
                            trace!(id = ?id, "effect skipped, dependencies unchanged");
                            return;
                        }
                        RunReason::Changed
                    }
                    _ => RunReason::Untracked,
                };

                action();
                registration.borrow_mut().dependencies = dependencies;
                record_run(&id, &registration, reason);
            }
        }
    }

    /// Forget every registration.
    ///
    /// Each identifier is treated as new on its next call.
    pub fn reset(&self) {
        let dropped = self.registrations.len();
        self.registrations.clear();
        debug!(dropped, "effect registry reset");
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no identifier is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Whether `id` has a registration. Falsy ids never do.
    pub fn contains(&self, id: impl Into<Value>) -> bool {
        EffectId::new(id).is_ok_and(|id| self.registrations.contains_key(&id))
    }

    /// The stored dependencies for `id`.
    ///
    /// `None` if `id` is not registered, `Some(None)` if it is registered
    /// with absent dependencies.
    pub fn dependencies(&self, id: impl Into<Value>) -> Option<Option<Array>> {
        self.with_registration(id, |registration| registration.dependencies.clone())
    }

    /// How many times the action for `id` has run.
    pub fn run_count(&self, id: impl Into<Value>) -> Option<usize> {
        self.with_registration(id, |registration| registration.runs)
    }

    fn with_registration<T>(
        &self,
        id: impl Into<Value>,
        f: impl FnOnce(&Registration) -> T,
    ) -> Option<T> {
        let id = EffectId::new(id).ok()?;
        let slot = self.registrations.get(&id).map(|entry| Arc::clone(entry.value()))?;
        let registration = slot.lock();
        let registration = registration.borrow();
        Some(f(&registration))
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}

fn record_run(id: &EffectId, registration: &RefCell<Registration>, reason: RunReason) {
    let mut registration = registration.borrow_mut();
    registration.runs += 1;
    debug!(
        id = ?id,
        reason = reason.as_str(),
        runs = registration.runs,
        "effect ran"
    );
}

/// Accept an array or `null`/`undefined`.
fn into_dependencies(value: Value) -> std::result::Result<Option<Array>, InvalidArgument> {
    if value.is_nullish() {
        return Ok(None);
    }
    match value {
        Value::Array(array) => Ok(Some(array)),
        other => Err(InvalidArgument::DependenciesNotSequence(other.type_name())),
    }
}

/// Run `action` through the [global](EffectRegistry::global) registry.
pub fn run_effect<F>(id: impl Into<Value>, dependencies: impl Into<Value>, action: F) -> Result<()>
where
    F: FnOnce(),
{
    EffectRegistry::global().run_effect(id, dependencies, action)
}

/// Run `action` through the [global](EffectRegistry::global) registry with a
/// custom comparator.
pub fn run_effect_with<F, C>(
    id: impl Into<Value>,
    dependencies: impl Into<Value>,
    action: F,
    comparator: &C,
) -> Result<()>
where
    F: FnOnce(),
    C: Comparator + ?Sized,
{
    EffectRegistry::global().run_effect_with(id, dependencies, action, comparator)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
