//! Dynamic Values
//!
//! Identifiers and dependencies are arbitrary, heterogeneous values. This
//! module gives them a concrete shape: a small dynamically-typed `Value` with
//! the two equality relations the registry needs.
//!
//! # Equality
//!
//! - **SameValue** (`same_value`) is used to compare dependency elements.
//!   `NaN` equals `NaN`, and `+0` is *not* equal to `-0`.
//!
//! - **SameValueZero** (`same_value_zero`) is used to key registrations.
//!   It matches SameValue except that `+0` and `-0` are equal.
//!
//! Arrays, objects and functions are compared by reference under both
//! relations. Neither relation recurses into nested structures.
//!
//! `f64` has its own `==`, which gets both `NaN` and signed zero wrong for
//! our purposes, so `Value` deliberately does not implement `PartialEq`.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A dynamically-typed value usable as an identifier or dependency.
///
/// Cloning a `Value` clones the handle. A cloned array, object or function
/// is the same reference as the original.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value. Falsy.
    #[default]
    Undefined,

    /// Explicit absence of a value. Falsy.
    Null,

    Bool(bool),

    /// Every number is an IEEE 754 double, including integers.
    Number(f64),

    String(Arc<str>),

    /// An ordered sequence, compared by reference when nested.
    Array(Array),

    /// An opaque payload, compared by reference.
    Object(Object),

    /// A callable, compared by reference.
    Function(Function),
}

impl Value {
    /// Build an array value from anything yielding values.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(Array::new(items.into_iter().map(Into::into).collect()))
    }

    /// Wrap an opaque payload in a fresh reference.
    pub fn object<T>(payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Value::Object(Object::new(payload))
    }

    /// Wrap a callable in a fresh reference.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::Function(Function::new(f))
    }

    /// `true` for `Undefined` and `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Truthiness as a dynamic language would define it.
    ///
    /// `undefined`, `null`, `false`, `0`, `-0`, `NaN` and `""` are falsy.
    /// Everything else, including empty arrays, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }
}

/// SameValue equality.
///
/// Primitives are equal when identical, `NaN` equals `NaN`, `+0` and `-0`
/// differ, and references are equal only when they point at the same thing.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_nan() && y.is_nan() {
                return true;
            }
            // Bit equality separates the zeros.
            x.to_bits() == y.to_bits()
        }
        _ => same_non_number(a, b),
    }
}

/// SameValueZero equality: like [`same_value`], but `+0` equals `-0`.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => same_non_number(a, b),
    }
}

fn same_non_number(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// Hash consistent with [`same_value_zero`].
pub(crate) fn hash_same_value_zero<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Undefined | Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(n) => {
            let canonical = if n.is_nan() {
                f64::NAN
            } else if *n == 0.0 {
                0.0
            } else {
                *n
            };
            canonical.to_bits().hash(state);
        }
        Value::String(s) => s.hash(state),
        Value::Array(a) => a.addr().hash(state),
        Value::Object(o) => o.addr().hash(state),
        Value::Function(f) => f.addr().hash(state),
    }
}

// ----------------------------------------------------------------------------
// Reference types
// ----------------------------------------------------------------------------

/// A shared, immutable sequence of values.
#[derive(Clone)]
pub struct Array(Arc<[Value]>);

impl Array {
    pub fn new(items: Vec<Value>) -> Self {
        Self(items.into())
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether both handles point at the same sequence.
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl Default for Array {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::ops::Deref for Array {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

/// An opaque shared payload.
#[derive(Clone)]
pub struct Object(Arc<dyn Any + Send + Sync>);

impl Object {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

/// A shared callable taking positional arguments.
#[derive(Clone)]
pub struct Function(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

// ----------------------------------------------------------------------------
// Formatting
// ----------------------------------------------------------------------------

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if *n == 0.0 && n.is_sign_negative() => f.write_str("-0"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(a) => fmt::Debug::fmt(a, f),
            Value::Object(o) => fmt::Debug::fmt(o, f),
            Value::Function(func) => fmt::Debug::fmt(func, f),
        }
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {:#x}]", self.addr())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[function {:#x}]", self.addr())
    }
}

// ----------------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------------

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::new(items))
    }
}

/// `None` becomes `Null`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Build an array [`Value`] from a list of expressions convertible into values.
///
/// ```rust
/// use depgate_core::deps;
///
/// let deps = deps!["dep1", 42];
/// assert_eq!(deps.as_array().map(|a| a.len()), Some(2));
/// ```
#[macro_export]
macro_rules! deps {
    () => {
        $crate::value::Value::Array($crate::value::Array::default())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::value::Value::from(::std::vec![$($crate::value::Value::from($item)),+])
    };
}
