//! Dependency Comparison
//!
//! A comparator decides whether two dependency sequences should be treated
//! as equal. The registry only consults it when both the stored and the new
//! dependencies are present.
//!
//! The default policy, [`Shallow`], compares top-level elements pairwise with
//! SameValue semantics and never looks inside nested arrays or objects.

use crate::value::{same_value, Value};

/// An equality policy between the previous and current dependencies.
///
/// Implemented for every `Fn(&[Value], &[Value]) -> bool`, so a closure can
/// be passed wherever a comparator is expected.
pub trait Comparator {
    /// Return `true` if `current` should be considered unchanged from `prev`.
    fn equal(&self, prev: &[Value], current: &[Value]) -> bool;
}

impl<F> Comparator for F
where
    F: Fn(&[Value], &[Value]) -> bool,
{
    fn equal(&self, prev: &[Value], current: &[Value]) -> bool {
        self(prev, current)
    }
}

/// The default comparator: shallow, element-wise SameValue equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shallow;

impl Comparator for Shallow {
    fn equal(&self, prev: &[Value], current: &[Value]) -> bool {
        shallow_compare(prev, current)
    }
}

/// Shallowly compare two sequences.
///
/// Equal when they have the same length and every pair of elements at the
/// same index is the same value (`NaN` matches `NaN`, `-0` does not match
/// `+0`, references match only themselves).
///
/// The registry always hands over two distinct sequences, so there is no
/// identity fast path.
pub fn shallow_compare(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_value(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps;

    fn compare(a: Value, b: Value) -> bool {
        shallow_compare(
            a.as_array().expect("array").as_slice(),
            b.as_array().expect("array").as_slice(),
        )
    }

    #[test]
    fn empty_sequences_are_equal() {
        assert!(compare(deps![], deps![]));
    }

    #[test]
    fn same_values_are_equal() {
        assert!(compare(deps![1, 2, 3], deps![1, 2, 3]));
        assert!(compare(deps!["bunnies", "sunshine"], deps!["bunnies", "sunshine"]));
    }

    #[test]
    fn nan_values_are_equal() {
        assert!(compare(deps![f64::NAN], deps![f64::NAN]));
    }

    #[test]
    fn falsy_element_differs_from_empty() {
        assert!(!compare(deps![""], deps![]));
    }

    #[test]
    fn different_falsy_values_differ() {
        assert!(!compare(deps![false], deps![0]));
    }

    #[test]
    fn extra_element_differs() {
        assert!(!compare(deps![1, 2, 3], deps![1, 2, 3, 4]));
    }

    #[test]
    fn swapped_elements_differ() {
        assert!(!compare(deps![1, 2, 3], deps![1, 3, 2]));
    }

    #[test]
    fn negative_zero_differs_from_zero() {
        assert!(!compare(deps![-0.0], deps![0]));
    }

    #[test]
    fn objects_compare_by_reference() {
        let shared = Value::object(vec![1, 2, 3]);
        assert!(compare(deps![shared.clone()], deps![shared]));
        assert!(!compare(
            deps![Value::object(vec![1, 2, 3])],
            deps![Value::object(vec![1, 2, 3])]
        ));
    }

    #[test]
    fn nested_arrays_are_not_recursed() {
        let inner = deps![1];
        assert!(compare(deps![inner.clone()], deps![inner]));
        assert!(!compare(deps![deps![1]], deps![deps![1]]));
    }

    #[test]
    fn closures_are_comparators() {
        let always = |_: &[Value], _: &[Value]| true;
        assert!(always.equal(&[Value::from(1)], &[Value::from(2)]));
        assert!(Shallow.equal(&[], &[]));
        assert!(!Shallow.equal(&[Value::Null], &[Value::Undefined]));
    }
}
