use crate::{desc::is_element, Descriptor, Error, Leaf, Result, Value};

/// Returns the value unchanged.
pub fn noop_serialization(value: &Value) -> Result<Value> {
    Ok(value.clone())
}

/// Returns the value unchanged if it is an element of `target`.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::noop_deserialization;
/// assert_eq!(noop_deserialization(&Descriptor::STR, &Value::from("a")), Ok(Value::from("a")));
///
/// let err = noop_deserialization(&Descriptor::INT, &Value::from("a")).unwrap_err();
/// assert_eq!(err.to_string(), r#"cannot deserialize "a" as int: found str"#);
/// ```
pub fn noop_deserialization(target: &Descriptor, value: &Value) -> Result<Value> {
    if is_element(value, target) {
        Ok(value.clone())
    } else {
        Err(Error::mismatch(
            value,
            target,
            format_args!("found {}", value.type_name()),
        ))
    }
}

/// Reads a number as the numeric `target`, failing if that would lose information.
///
/// For wire formats that widen integers to floating point. An integral float is accepted as an
/// integer, and an integer as a float when the float represents it exactly. Booleans are not
/// numbers.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::number_coercion;
/// assert_eq!(number_coercion(&Descriptor::INT, &Value::Float(1.0)), Ok(Value::Int(1)));
/// assert!(number_coercion(&Descriptor::INT, &Value::Float(1.5)).is_err());
/// assert_eq!(number_coercion(&Descriptor::FLOAT, &Value::Int(2)), Ok(Value::Float(2.0)));
/// ```
pub fn number_coercion(target: &Descriptor, value: &Value) -> Result<Value> {
    // 2^63, exactly representable
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    let lossy = || Error::mismatch(value, target, "the conversion is lossy");

    match (target, value) {
        (Descriptor::Leaf(Leaf::Int), Value::Int(x)) => Ok(Value::Int(*x)),
        (Descriptor::Leaf(Leaf::Int), Value::Float(x)) => {
            if x.is_finite() && x.fract() == 0.0 && *x >= -BOUND && *x < BOUND {
                Ok(Value::Int(*x as i64))
            } else {
                Err(lossy())
            }
        }
        (Descriptor::Leaf(Leaf::Float), Value::Float(x)) => Ok(Value::Float(*x)),
        (Descriptor::Leaf(Leaf::Float), Value::Int(x)) => {
            let f = *x as f64;
            if f as i128 == i128::from(*x) {
                Ok(Value::Float(f))
            } else {
                Err(lossy())
            }
        }
        (Descriptor::Leaf(Leaf::Int | Leaf::Float), _) => Err(Error::mismatch(
            value,
            target,
            format_args!("found {}", value.type_name()),
        )),
        _ => Err(Error::mismatch(value, target, "not a numeric type")),
    }
}
