use super::*;

/// Configures a [`Serializer`] before use.
///
/// # Example
/// ```rust
/// # use tyser::*;
/// # use tyser::convert::*;
/// let ser = Serializer::builder()
///     .serializer(Descriptor::STR, |_, v| noop_serialization(v))
///     .deserializer(Descriptor::INT, |_, t, v| number_coercion(t, v))
///     .build();
///
/// assert_eq!(ser.serialize(&Value::from("a")), Ok(Value::from("a")));
/// assert_eq!(ser.deserialize(&Descriptor::INT, &Value::Float(2.0)), Ok(Value::Int(2)));
/// ```
pub struct SerializerBuilder {
    inner: Serializer,
    defaults: bool,
}

impl SerializerBuilder {
    /// A builder with nothing registered.
    pub fn new() -> Self {
        SerializerBuilder {
            inner: Serializer::empty(),
            defaults: true,
        }
    }

    /// Register a serialization handler. See [`Serializer::register_serializer`].
    pub fn serializer<F>(mut self, key: Descriptor, f: F) -> Self
    where
        F: Fn(&Serializer, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.inner.register_serializer(key, f);
        self
    }

    /// Register a deserialization handler. See [`Serializer::register_deserializer`].
    pub fn deserializer<F>(mut self, key: Descriptor, f: F) -> Self
    where
        F: Fn(&Serializer, &Descriptor, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.inner.register_deserializer(key, f);
        self
    }

    /// Register both directions. See [`Serializer::register`].
    pub fn codec_pair<S, D>(mut self, key: Descriptor, ser: S, de: D) -> Self
    where
        S: Fn(&Serializer, &Value) -> Result<Value> + Send + Sync + 'static,
        D: Fn(&Serializer, &Descriptor, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.inner.register(key, ser, de);
        self
    }

    /// Do not install the default record and union handlers.
    pub fn without_defaults(mut self) -> Self {
        self.defaults = false;
        self
    }

    /// Finish configuring.
    pub fn build(self) -> Serializer {
        let SerializerBuilder {
            mut inner,
            defaults,
        } = self;
        if defaults {
            inner.install_defaults();
        }
        inner
    }
}

impl Default for SerializerBuilder {
    fn default() -> Self {
        SerializerBuilder::new()
    }
}
