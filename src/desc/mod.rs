//! Type descriptors and the compatibility predicates over them.
//!
//! A [`Descriptor`] names the shape a value should be read as. Descriptors are plain data: they
//! compare structurally and hash, so they can key a [`Refinement`](crate::Refinement).
use crate::{Shape, Value};
use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use thiserror::Error;

mod predicates;

pub use predicates::{is_element, is_subtype, matches_target};

/// A leaf type, one needing no structural decomposition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Leaf {
    /// The null type, only inhabited by [`Value::Null`].
    Null,
    /// Booleans.
    Bool,
    /// Signed integers.
    Int,
    /// Floating point numbers.
    Float,
    /// Strings.
    Str,
    /// Byte strings.
    Bytes,
    /// Document identifiers.
    ObjectId,
    /// UTC timestamps.
    DateTime,
}

impl Leaf {
    /// The leaf type of `value`, if it is a leaf.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// assert_eq!(Leaf::of(&Value::Int(1)), Some(Leaf::Int));
    /// assert_eq!(Leaf::of(&Value::List(vec![])), None);
    /// ```
    pub fn of(value: &Value) -> Option<Leaf> {
        Some(match value {
            Value::Null => Leaf::Null,
            Value::Bool(_) => Leaf::Bool,
            Value::Int(_) => Leaf::Int,
            Value::Float(_) => Leaf::Float,
            Value::Str(_) => Leaf::Str,
            Value::Bytes(_) => Leaf::Bytes,
            Value::ObjectId(_) => Leaf::ObjectId,
            Value::DateTime(_) => Leaf::DateTime,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Leaf::Null => "null",
            Leaf::Bool => "bool",
            Leaf::Int => "int",
            Leaf::Float => "float",
            Leaf::Str => "str",
            Leaf::Bytes => "bytes",
            Leaf::ObjectId => "ObjectId",
            Leaf::DateTime => "datetime",
        }
    }
}

/// The unparameterized shape of a generic container.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Origin {
    /// A mapping, parameterized by key and value types.
    Map,
    /// A homogeneous sequence, parameterized by the element type.
    List,
    /// A fixed arity sequence, parameterized by one type per slot.
    Tuple,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Origin::Map => write!(f, "Map"),
            Origin::List => write!(f, "List"),
            Origin::Tuple => write!(f, "Tuple"),
        }
    }
}

/// Describes the target type of a conversion.
///
/// # Generics
/// Parameterized containers carry their [`Origin`] and a list of type arguments. An empty
/// argument list is the _bare marker_ of that container (`Map`, `List`, `Tuple`), which the
/// container converters pass values through unchanged for.
///
/// Two tuple forms are special cased:
/// - `[Descriptor::Unit]` is the empty tuple, see [`Descriptor::tuple_of`].
/// - `[t, Descriptor::Ellipsis]` is a homogeneous tuple of any length, see
/// [`Descriptor::tuple_variadic`].
///
/// Record descriptors carry their [`Shape`] and, for generic shapes, the bound type arguments.
/// Free type parameters are [`Descriptor::Param`]s; they are bound with [`Descriptor::of`].
///
/// # Example
/// ```rust
/// # use tyser::*;
/// let d = Descriptor::map_of(Descriptor::STR, Descriptor::list_of(Descriptor::INT));
/// assert_eq!(d.to_string(), "Map[str, List[int]]");
///
/// let d = Descriptor::optional(Descriptor::tuple_variadic(Descriptor::FLOAT));
/// assert_eq!(d.to_string(), "Union[Tuple[float, ...], null]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// Any type. Every value is an element of it and every descriptor a subtype.
    Any,
    /// A leaf type.
    Leaf(Leaf),
    /// A generic container, with its type arguments. No arguments is the bare marker.
    Generic(Origin, Vec<Descriptor>),
    /// A record type, with the type arguments bound to its shape's parameters.
    Record(Arc<Shape>, Vec<Descriptor>),
    /// A tagged union. The alternatives are tried in declaration order.
    Union(Vec<Descriptor>),
    /// Matches any union. Registering a handler against it overrides the union converter.
    UnionMarker,
    /// Matches any record. Registering a handler against it overrides the record converters.
    RecordMarker,
    /// A set of descriptors sharing one registration.
    OneOf(Vec<Descriptor>),
    /// A free type parameter.
    Param(String),
    /// The variable length marker in `Tuple[t, ...]`.
    Ellipsis,
    /// The empty tuple marker in `Tuple[()]`.
    Unit,
}

/// Binding type arguments failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The descriptor has no free type parameters.
    #[error("{0} is not generic")]
    NotGeneric(String),
    /// The wrong number of type arguments were supplied.
    #[error("{target} expects {expected} type arguments, found {found}")]
    Arity {
        /// The generic descriptor.
        target: String,
        /// The number of free type parameters.
        expected: usize,
        /// The number of type arguments supplied.
        found: usize,
    },
}

// ********************* CONSTANTS ********************************************

impl Descriptor {
    /// The null type.
    pub const NULL: Descriptor = Descriptor::Leaf(Leaf::Null);
    /// Booleans.
    pub const BOOL: Descriptor = Descriptor::Leaf(Leaf::Bool);
    /// Integers.
    pub const INT: Descriptor = Descriptor::Leaf(Leaf::Int);
    /// Floats.
    pub const FLOAT: Descriptor = Descriptor::Leaf(Leaf::Float);
    /// Strings.
    pub const STR: Descriptor = Descriptor::Leaf(Leaf::Str);
    /// Byte strings.
    pub const BYTES: Descriptor = Descriptor::Leaf(Leaf::Bytes);
    /// Document identifiers.
    pub const OBJECT_ID: Descriptor = Descriptor::Leaf(Leaf::ObjectId);
    /// Timestamps.
    pub const DATETIME: Descriptor = Descriptor::Leaf(Leaf::DateTime);
    /// The bare mapping marker.
    pub const MAP: Descriptor = Descriptor::Generic(Origin::Map, Vec::new());
    /// The bare sequence marker.
    pub const LIST: Descriptor = Descriptor::Generic(Origin::List, Vec::new());
    /// The bare tuple marker.
    pub const TUPLE: Descriptor = Descriptor::Generic(Origin::Tuple, Vec::new());
    /// The _any record_ marker.
    pub const RECORD: Descriptor = Descriptor::RecordMarker;
    /// The _any union_ marker.
    pub const UNION: Descriptor = Descriptor::UnionMarker;
}

// ********************* CONSTRUCTORS *****************************************

impl Descriptor {
    /// A mapping of `key` to `value`.
    pub fn map_of(key: Descriptor, value: Descriptor) -> Self {
        Descriptor::Generic(Origin::Map, vec![key, value])
    }

    /// A sequence of `element`.
    pub fn list_of(element: Descriptor) -> Self {
        Descriptor::Generic(Origin::List, vec![element])
    }

    /// A fixed arity tuple with one descriptor per slot. No slots gives the empty tuple
    /// `Tuple[()]`, which is distinct from the bare `Tuple` marker.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let d = Descriptor::tuple_of(vec![Descriptor::INT, Descriptor::BOOL]);
    /// assert_eq!(d.to_string(), "Tuple[int, bool]");
    ///
    /// let d = Descriptor::tuple_of(vec![]);
    /// assert_eq!(d.to_string(), "Tuple[()]");
    /// assert_ne!(d, Descriptor::TUPLE);
    /// ```
    pub fn tuple_of<I: IntoIterator<Item = Descriptor>>(slots: I) -> Self {
        let mut slots = slots.into_iter().collect::<Vec<_>>();
        if slots.is_empty() {
            slots.push(Descriptor::Unit);
        }
        Descriptor::Generic(Origin::Tuple, slots)
    }

    /// A homogeneous tuple of any length, `Tuple[element, ...]`.
    pub fn tuple_variadic(element: Descriptor) -> Self {
        Descriptor::Generic(Origin::Tuple, vec![element, Descriptor::Ellipsis])
    }

    /// A union of the alternatives.
    ///
    /// Nested unions are flattened and repeated alternatives dropped, keeping declaration
    /// order. A union of a single alternative _is_ that alternative.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let inner = Descriptor::union(vec![Descriptor::STR, Descriptor::INT]);
    /// let d = Descriptor::union(vec![Descriptor::INT, inner, Descriptor::NULL]);
    /// assert_eq!(d.to_string(), "Union[int, str, null]");
    ///
    /// assert_eq!(Descriptor::union(vec![Descriptor::INT]), Descriptor::INT);
    /// ```
    pub fn union<I: IntoIterator<Item = Descriptor>>(alternatives: I) -> Self {
        fn flatten(d: Descriptor, into: &mut Vec<Descriptor>) {
            match d {
                Descriptor::Union(ds) => ds.into_iter().for_each(|d| flatten(d, into)),
                d if !into.contains(&d) => into.push(d),
                _ => (),
            }
        }

        let mut flat = Vec::new();
        for d in alternatives {
            flatten(d, &mut flat);
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Descriptor::Union(flat)
        }
    }

    /// `Union[inner, null]`.
    pub fn optional(inner: Descriptor) -> Self {
        Descriptor::union(vec![inner, Descriptor::NULL])
    }

    /// The record type of `shape`. For a generic shape the parameters are left free, bind them
    /// with [`Descriptor::of`].
    pub fn record(shape: &Arc<Shape>) -> Self {
        Descriptor::Record(Arc::clone(shape), Vec::new())
    }

    /// A free type parameter.
    pub fn param<S: Into<String>>(name: S) -> Self {
        Descriptor::Param(name.into())
    }

    /// A set of descriptors to register one handler against.
    pub fn one_of<I: IntoIterator<Item = Descriptor>>(members: I) -> Self {
        Descriptor::OneOf(members.into_iter().collect())
    }
}

// ********************* GENERIC BINDING **************************************

impl Descriptor {
    /// The free type parameters, in order of first appearance.
    ///
    /// A record descriptor with no type arguments exposes its shape's parameters. A bare generic
    /// record nested inside another descriptor does not; it stays unbound until given its own
    /// arguments.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let d = Descriptor::map_of(Descriptor::param("K"), Descriptor::list_of(Descriptor::param("V")));
    /// assert_eq!(d.free_params(), vec!["K", "V"]);
    /// ```
    pub fn free_params(&self) -> Vec<&str> {
        fn collect<'a>(d: &'a Descriptor, into: &mut Vec<&'a str>) {
            match d {
                Descriptor::Param(p) => {
                    if !into.contains(&p.as_str()) {
                        into.push(p);
                    }
                }
                Descriptor::Record(_, ds)
                | Descriptor::Generic(_, ds)
                | Descriptor::Union(ds)
                | Descriptor::OneOf(ds) => ds.iter().for_each(|d| collect(d, into)),
                _ => (),
            }
        }

        match self {
            Descriptor::Record(shape, args) if args.is_empty() => {
                shape.params().iter().map(String::as_str).collect()
            }
            d => {
                let mut params = Vec::new();
                collect(d, &mut params);
                params
            }
        }
    }

    /// The descriptor has no free type parameters.
    pub fn is_bound(&self) -> bool {
        self.free_params().is_empty()
    }

    /// Replace free parameters with their bound descriptors. Parameters without a binding are
    /// left free, as are bare generic records.
    pub fn substitute(&self, bindings: &IndexMap<String, Descriptor>) -> Descriptor {
        let sub_all = |ds: &[Descriptor]| -> Vec<Descriptor> {
            ds.iter().map(|d| d.substitute(bindings)).collect()
        };

        match self {
            Descriptor::Param(p) => bindings.get(p).cloned().unwrap_or_else(|| self.clone()),
            Descriptor::Record(shape, args) => Descriptor::Record(Arc::clone(shape), sub_all(args)),
            Descriptor::Generic(origin, args) => Descriptor::Generic(*origin, sub_all(args)),
            Descriptor::Union(ds) => Descriptor::union(ds.iter().map(|d| d.substitute(bindings))),
            Descriptor::OneOf(ds) => Descriptor::OneOf(sub_all(ds)),
            _ => self.clone(),
        }
    }

    /// Bind the free type parameters, positionally in order of first appearance.
    ///
    /// # Example
    /// ```rust
    /// # use tyser::*;
    /// let boxed = Shape::builder("Box")
    ///     .param("T")
    ///     .field("v", Descriptor::param("T"))
    ///     .finish();
    ///
    /// let d = Descriptor::record(&boxed).of(vec![Descriptor::INT]).unwrap();
    /// assert_eq!(d.to_string(), "Box[int]");
    /// assert!(d.is_bound());
    ///
    /// assert!(d.of(vec![Descriptor::INT]).is_err()); // nothing left to bind
    /// ```
    pub fn of<I: IntoIterator<Item = Descriptor>>(&self, args: I) -> Result<Descriptor, BindError> {
        let params = self.free_params();
        let args = args.into_iter().collect::<Vec<_>>();

        if params.is_empty() {
            return Err(BindError::NotGeneric(self.to_string()));
        }

        if params.len() != args.len() {
            return Err(BindError::Arity {
                target: self.to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }

        let bindings = params
            .into_iter()
            .map(String::from)
            .zip(args)
            .collect::<IndexMap<_, _>>();

        let target = match self {
            Descriptor::Record(shape, args) if args.is_empty() => Descriptor::Record(
                Arc::clone(shape),
                shape.params().iter().cloned().map(Descriptor::Param).collect(),
            ),
            d => d.clone(),
        };

        Ok(target.substitute(&bindings))
    }
}

// ********************* FORMATTING *******************************************

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn list(f: &mut fmt::Formatter, ds: &[Descriptor]) -> fmt::Result {
            for (i, d) in ds.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", d)?;
            }
            Ok(())
        }

        match self {
            Descriptor::Any => write!(f, "Any"),
            Descriptor::Leaf(leaf) => write!(f, "{}", leaf.name()),
            Descriptor::Generic(origin, args) if args.is_empty() => write!(f, "{}", origin),
            Descriptor::Generic(origin, args) => {
                write!(f, "{}[", origin)?;
                list(f, args)?;
                write!(f, "]")
            }
            Descriptor::Record(shape, args) if args.is_empty() => write!(f, "{}", shape.name()),
            Descriptor::Record(shape, args) => {
                write!(f, "{}[", shape.name())?;
                list(f, args)?;
                write!(f, "]")
            }
            Descriptor::Union(ds) => {
                write!(f, "Union[")?;
                list(f, ds)?;
                write!(f, "]")
            }
            Descriptor::OneOf(ds) => {
                write!(f, "(")?;
                list(f, ds)?;
                write!(f, ")")
            }
            Descriptor::UnionMarker => write!(f, "Union"),
            Descriptor::RecordMarker => write!(f, "record"),
            Descriptor::Param(p) => write!(f, "~{}", p),
            Descriptor::Ellipsis => write!(f, "..."),
            Descriptor::Unit => write!(f, "()"),
        }
    }
}

impl From<Leaf> for Descriptor {
    fn from(leaf: Leaf) -> Self {
        Descriptor::Leaf(leaf)
    }
}

impl<'a> From<&'a Arc<Shape>> for Descriptor {
    fn from(shape: &'a Arc<Shape>) -> Self {
        Descriptor::record(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Arc<Shape> {
        Shape::builder("Pair")
            .param("A")
            .param("B")
            .field("a", Descriptor::param("A"))
            .field("b", Descriptor::list_of(Descriptor::param("B")))
            .finish()
    }

    #[test]
    fn display_fmt() {
        use Descriptor as D;
        assert_eq!(D::MAP.to_string(), "Map");
        assert_eq!(D::tuple_variadic(D::INT).to_string(), "Tuple[int, ...]");
        assert_eq!(D::one_of(vec![D::LIST, D::TUPLE]).to_string(), "(List, Tuple)");
        assert_eq!(D::RECORD.to_string(), "record");
        assert_eq!(D::UNION.to_string(), "Union");
        assert_eq!(D::param("T").to_string(), "~T");
        assert_eq!(D::record(&pair()).to_string(), "Pair");
        assert_eq!(D::OBJECT_ID.to_string(), "ObjectId");
    }

    #[test]
    fn union_normalization() {
        use Descriptor as D;
        let u = D::union(vec![D::INT, D::INT, D::STR]);
        assert_eq!(u, D::Union(vec![D::INT, D::STR]));

        // order is significant
        assert_ne!(u, D::union(vec![D::STR, D::INT]));

        assert_eq!(D::union(vec![D::optional(D::INT), D::NULL]), D::optional(D::INT));
    }

    #[test]
    fn free_params_of_records() {
        let d = Descriptor::record(&pair());
        assert_eq!(d.free_params(), vec!["A", "B"]);
        assert!(!d.is_bound());

        let d = d.of(vec![Descriptor::STR, Descriptor::param("X")]).unwrap();
        assert_eq!(d.to_string(), "Pair[str, ~X]");
        assert_eq!(d.free_params(), vec!["X"]);

        let d = d.of(vec![Descriptor::BOOL]).unwrap();
        assert_eq!(d.to_string(), "Pair[str, bool]");
        assert!(d.is_bound());
    }

    #[test]
    fn binding_errors() {
        assert_eq!(
            Descriptor::INT.of(vec![Descriptor::STR]),
            Err(BindError::NotGeneric("int".into()))
        );

        let e = Descriptor::record(&pair()).of(vec![Descriptor::STR]).unwrap_err();
        assert_eq!(e.to_string(), "Pair expects 2 type arguments, found 1");
    }

    #[test]
    fn substitution_renormalizes_unions() {
        use Descriptor as D;
        let d = D::union(vec![D::param("T"), D::INT]);
        let d = d.of(vec![D::INT]).unwrap();
        assert_eq!(d, D::INT);
    }

    #[test]
    fn nested_generic_records_stay_unbound() {
        let p = pair();
        let d = Descriptor::list_of(Descriptor::record(&p));
        assert!(d.free_params().is_empty());
        assert!(d.of(vec![Descriptor::INT, Descriptor::FLOAT]).is_err());

        // binding an outer parameter does not reach a bare inner record
        let bindings = vec![("A".to_string(), Descriptor::INT)].into_iter().collect();
        assert_eq!(d.substitute(&bindings), d);

        let d = Descriptor::list_of(
            Descriptor::record(&p)
                .of(vec![Descriptor::param("X"), Descriptor::param("Y")])
                .unwrap(),
        );
        assert_eq!(d.free_params(), vec!["X", "Y"]);
        let d = d.of(vec![Descriptor::INT, Descriptor::FLOAT]).unwrap();
        assert_eq!(d.to_string(), "List[Pair[int, float]]");
    }
}
