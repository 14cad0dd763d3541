//! Record shapes: the declared field lists of nominal record types.
//!
//! A [`Shape`] is built once through a [`ShapeBuilder`] and shared as an `Arc<Shape>`. Shapes are
//! the registry of field names and types the record converters read; instances of a shape are
//! [`Record`]s.
//!
//! # Example
//! ```rust
//! # use tyser::*;
//! let song = Shape::builder("Song")
//!     .field("title", Descriptor::STR)
//!     .field_with_default("plays", Descriptor::INT, Value::Int(0))
//!     .finish();
//!
//! let record = Record::new(&song, vec![("title", Value::from("Blue"))]).unwrap();
//! assert_eq!(record.get("plays"), Some(&Value::Int(0)));
//! assert_eq!(record.to_string(), r#"Song(title: "Blue", plays: 0)"#);
//!
//! let err = Record::new(&song, vec![("plays", Value::Int(3))]).unwrap_err();
//! assert_eq!(err.missing, vec!["title"]);
//! ```
use crate::{desc::BindError, Descriptor, Fields, Value};
use indexmap::IndexMap;
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};
use thiserror::Error;

mod builder;
mod record;

pub use builder::ShapeBuilder;
pub use record::Record;

/// The declared shape of a nominal record type.
///
/// Shapes compare and hash by identity. Two declarations sharing a name are distinct types;
/// clone the `Arc` to refer to the same one.
pub struct Shape {
    name: String,
    params: Vec<String>,
    base: Option<Arc<Shape>>,
    fields: Vec<Field>,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    ty: Descriptor,
    default: Option<Value>,
}

/// Constructing a record failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot construct {shape}:{}", describe(.missing, .unexpected))]
pub struct ConstructError {
    /// The shape being constructed.
    pub shape: String,
    /// Required fields that were not supplied.
    pub missing: Vec<String>,
    /// Supplied fields the shape does not declare.
    pub unexpected: Vec<String>,
}

fn describe(missing: &[String], unexpected: &[String]) -> String {
    let mut s = String::new();
    if !missing.is_empty() {
        s.push_str(&format!(" missing {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        if !s.is_empty() {
            s.push(';');
        }
        s.push_str(&format!(" unexpected {}", unexpected.join(", ")));
    }
    s
}

impl Shape {
    /// Start declaring a shape named `name`.
    pub fn builder<S: Into<String>>(name: S) -> ShapeBuilder {
        ShapeBuilder::new(name.into())
    }

    /// The nominal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type parameters, including inherited ones.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The shape is generic over one or more type parameters.
    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }

    /// The shape this one extends.
    pub fn base(&self) -> Option<&Arc<Shape>> {
        self.base.as_ref()
    }

    /// All fields in declaration order, inherited fields first.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field named `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `self` is `ancestor` or extends it, directly or transitively.
    pub fn descends_from(&self, ancestor: &Shape) -> bool {
        let mut shape = Some(self);
        while let Some(s) = shape {
            if s == ancestor {
                return true;
            }
            shape = s.base.as_deref();
        }
        false
    }

    /// Every field's type, with the shape's type parameters bound to `args`.
    ///
    /// A non-generic shape takes no arguments. A generic shape given no arguments leaves its
    /// parameters free.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let boxed = Shape::builder("Box")
    ///     .param("T")
    ///     .field("v", Descriptor::list_of(Descriptor::param("T")))
    ///     .finish();
    ///
    /// let types = boxed.field_types(&[Descriptor::INT]).unwrap();
    /// assert_eq!(types.get("v"), Some(&Descriptor::list_of(Descriptor::INT)));
    /// ```
    pub fn field_types(&self, args: &[Descriptor]) -> Result<IndexMap<&str, Descriptor>, BindError> {
        if !args.is_empty() && args.len() != self.params.len() {
            return Err(if self.params.is_empty() {
                BindError::NotGeneric(self.name.clone())
            } else {
                BindError::Arity {
                    target: self.name.clone(),
                    expected: self.params.len(),
                    found: args.len(),
                }
            });
        }

        let bindings = self
            .params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect::<IndexMap<_, _>>();

        Ok(self
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.substitute(&bindings)))
            .collect())
    }

    /// The declared constructor.
    ///
    /// Supplied fields are taken as given, absent fields take their default. Fails if a required
    /// field is absent or a supplied field is not declared.
    pub fn construct(self: &Arc<Self>, mut fields: Fields) -> Result<Record, ConstructError> {
        let mut out = Fields::with_capacity(self.fields.len());
        let mut missing = Vec::new();

        for field in &self.fields {
            match fields.shift_remove(&field.name).or_else(|| field.default.clone()) {
                Some(value) => {
                    out.insert(field.name.clone(), value);
                }
                None => missing.push(field.name.clone()),
            }
        }

        if missing.is_empty() && fields.is_empty() {
            Ok(Record::from_parts(Arc::clone(self), out))
        } else {
            Err(ConstructError {
                shape: self.name.clone(),
                missing,
                unexpected: fields.into_keys().collect(),
            })
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = f.debug_struct("Shape");
        d.field("name", &self.name);
        if !self.params.is_empty() {
            d.field("params", &self.params);
        }
        if let Some(base) = &self.base {
            d.field("base", &base.name);
        }
        d.field("fields", &self.fields.iter().map(|f| &f.name).collect::<Vec<_>>());
        d.finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Field {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn ty(&self) -> &Descriptor {
        &self.ty
    }

    /// The default value, if the field is optional.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The field has no default.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a, I: IntoIterator<Item = (&'a str, Value)>>(iter: I) -> Fields {
        iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn construct_fills_defaults() {
        let s = Shape::builder("S")
            .field("a", Descriptor::INT)
            .field_with_default("b", Descriptor::STR, Value::from("x"))
            .finish();

        let r = s.construct(fields(vec![("a", Value::Int(1))])).unwrap();
        assert_eq!(r.fields(), &fields(vec![("a", Value::Int(1)), ("b", Value::from("x"))]));

        // declared order, not supplied order
        let r = s
            .construct(fields(vec![("b", Value::from("y")), ("a", Value::Int(2))]))
            .unwrap();
        let names = r.fields().keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn construct_failures() {
        let s = Shape::builder("S").field("a", Descriptor::INT).finish();

        let e = s.construct(Fields::new()).unwrap_err();
        assert_eq!(e.missing, vec!["a"]);
        assert_eq!(e.to_string(), "cannot construct S: missing a");

        let e = s
            .construct(fields(vec![("z", Value::Null), ("y", Value::Null)]))
            .unwrap_err();
        assert_eq!(e.unexpected, vec!["z", "y"]);
        assert_eq!(e.to_string(), "cannot construct S: missing a; unexpected z, y");
    }

    #[test]
    fn inheritance() {
        let base = Shape::builder("Base")
            .param("T")
            .field("a", Descriptor::INT)
            .field("b", Descriptor::param("T"))
            .finish();
        let child = Shape::builder("Child")
            .extends(&base)
            .field("c", Descriptor::STR)
            .field("a", Descriptor::FLOAT)
            .finish();

        let names = child.fields().iter().map(Field::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(child.field("a").map(Field::ty), Some(&Descriptor::FLOAT));
        assert_eq!(child.params(), &["T".to_string()]);

        assert!(child.descends_from(&base));
        assert!(child.descends_from(&child));
        assert!(!base.descends_from(&child));
    }

    #[test]
    fn identity_not_name() {
        let a = Shape::builder("Config").field("a", Descriptor::INT).finish();
        let b = Shape::builder("Config").field("a", Descriptor::INT).finish();

        assert_ne!(a, b);
        assert_eq!(a, Arc::clone(&a));
        assert!(!a.descends_from(&b));
        assert_ne!(Descriptor::record(&a), Descriptor::record(&b));
    }

    #[test]
    fn field_type_binding() {
        let s = Shape::builder("S").field("a", Descriptor::INT).finish();
        assert!(s.field_types(&[]).is_ok());
        assert_eq!(
            s.field_types(&[Descriptor::INT]),
            Err(BindError::NotGeneric("S".into()))
        );

        let g = Shape::builder("G")
            .param("K")
            .param("V")
            .field("m", Descriptor::map_of(Descriptor::param("K"), Descriptor::param("V")))
            .finish();
        let types = g.field_types(&[Descriptor::STR, Descriptor::BOOL]).unwrap();
        assert_eq!(types["m"], Descriptor::map_of(Descriptor::STR, Descriptor::BOOL));

        // unbound: parameters stay free
        let types = g.field_types(&[]).unwrap();
        assert_eq!(types["m"].free_params(), vec!["K", "V"]);

        assert!(g.field_types(&[Descriptor::STR]).is_err());
    }
}
