use super::*;

/// Declares a [`Shape`].
///
/// Fields are declared in order. Extending a base shape places the base's fields first; a
/// field redeclared by the extending shape keeps the base's position but takes the new type and
/// default. The base's type parameters are inherited.
#[derive(Debug)]
pub struct ShapeBuilder {
    name: String,
    params: Vec<String>,
    base: Option<Arc<Shape>>,
    fields: Vec<Field>,
}

impl ShapeBuilder {
    pub(super) fn new(name: String) -> Self {
        ShapeBuilder {
            name,
            params: Vec::new(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Declare a type parameter. Field types refer to it with [`Descriptor::param`].
    pub fn param<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        if !self.params.contains(&name) {
            self.params.push(name);
        }
        self
    }

    /// Extend `base`.
    pub fn extends(mut self, base: &Arc<Shape>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    /// Declare a required field.
    pub fn field<S: Into<String>>(self, name: S, ty: Descriptor) -> Self {
        self.push(Field {
            name: name.into(),
            ty,
            default: None,
        })
    }

    /// Declare an optional field, taking `default` when absent.
    pub fn field_with_default<S: Into<String>>(self, name: S, ty: Descriptor, default: Value) -> Self {
        self.push(Field {
            name: name.into(),
            ty,
            default: Some(default),
        })
    }

    fn push(mut self, field: Field) -> Self {
        upsert(&mut self.fields, field);
        self
    }

    /// Finish the declaration.
    pub fn finish(self) -> Arc<Shape> {
        let ShapeBuilder {
            name,
            params: own_params,
            base,
            fields: own_fields,
        } = self;

        let (mut params, mut fields) = match &base {
            Some(base) => (base.params.clone(), base.fields.clone()),
            None => (Vec::new(), Vec::new()),
        };

        for p in own_params {
            if !params.contains(&p) {
                params.push(p);
            }
        }

        for f in own_fields {
            upsert(&mut fields, f);
        }

        Arc::new(Shape {
            name,
            params,
            base,
            fields,
        })
    }
}

fn upsert(fields: &mut Vec<Field>, field: Field) {
    match fields.iter_mut().find(|f| f.name == field.name) {
        Some(f) => *f = field,
        None => fields.push(field),
    }
}
