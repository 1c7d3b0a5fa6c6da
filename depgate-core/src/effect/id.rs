//! Effect identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::InvalidArgument;
use crate::value::{hash_same_value_zero, same_value_zero, Value};

/// A validated key for one effect registration.
///
/// Any truthy [`Value`] can identify an effect. Keys are compared with
/// SameValueZero, so `1` and `1.0` name the same effect while two distinct
/// objects never collide.
#[derive(Clone)]
pub struct EffectId(Value);

impl EffectId {
    /// Validate `value` as an identifier.
    ///
    /// Falsy values (`undefined`, `null`, `false`, `0`, `NaN`, `""`) are
    /// rejected.
    pub fn new(value: impl Into<Value>) -> Result<Self, InvalidArgument> {
        let value = value.into();
        if !value.is_truthy() {
            return Err(InvalidArgument::MissingIdentifier);
        }
        Ok(Self(value))
    }

    /// The underlying value.
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl PartialEq for EffectId {
    fn eq(&self, other: &Self) -> bool {
        same_value_zero(&self.0, &other.0)
    }
}

impl Eq for EffectId {}

impl Hash for EffectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_same_value_zero(&self.0, state);
    }
}

impl fmt::Debug for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn falsy_values_are_rejected() {
        for falsy in [
            Value::Undefined,
            Value::Null,
            Value::from(false),
            Value::from(0),
            Value::from(f64::NAN),
            Value::from(""),
        ] {
            assert_eq!(
                EffectId::new(falsy).err(),
                Some(InvalidArgument::MissingIdentifier)
            );
        }
    }

    #[test]
    fn keeps_the_original_value() {
        let id = EffectId::new("slot").unwrap();
        assert!(crate::value::same_value(id.value(), &Value::from("slot")));
        assert_eq!(format!("{id:?}"), "\"slot\"");
    }

    #[test]
    fn numbers_key_by_value() {
        let mut ids = HashSet::new();
        ids.insert(EffectId::new(1).unwrap());
        ids.insert(EffectId::new(1.0).unwrap());
        ids.insert(EffectId::new(2u8).unwrap());

        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn strings_and_numbers_do_not_collide() {
        let a = EffectId::new("1").unwrap();
        let b = EffectId::new(1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn objects_key_by_reference() {
        let token = Value::object("slot");
        let a = EffectId::new(token.clone()).unwrap();
        let b = EffectId::new(token).unwrap();
        let c = EffectId::new(Value::object("slot")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let ids: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(ids.len(), 2);
    }
}
