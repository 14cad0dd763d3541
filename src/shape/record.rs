use super::*;

/// An instance of a [`Shape`].
///
/// Records are only constructed through the shape's declared constructor, so a record always
/// holds exactly the declared fields, in declaration order.
#[derive(Clone)]
pub struct Record {
    shape: Arc<Shape>,
    fields: Fields,
}

impl Record {
    /// Construct a record of `shape`. See [`Shape::construct`].
    pub fn new<I, S>(shape: &Arc<Shape>, fields: I) -> Result<Self, ConstructError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Value)>,
    {
        shape.construct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub(super) fn from_parts(shape: Arc<Shape>, fields: Fields) -> Self {
        Record { shape, fields }
    }

    /// The record's shape.
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// The value of field `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The field values, in declaration order.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Take the field values.
    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.fields == other.fields
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape.hash(state);
        self.fields.len().hash(state);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = f.debug_struct(self.shape.name());
        for (k, v) in &self.fields {
            d.field(k, v);
        }
        d.finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.shape.name())?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, ")")
    }
}
