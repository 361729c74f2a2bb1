//! Per-field and per-section schemas.
//!
//! A [`PropertySchema`] describes one scalar field (primitive type, whether
//! it is required, and an optional default). A [`SectionSchema`] is the
//! ordered set of field schemas for one section kind. The registry is
//! closed: section names resolve through [`SectionSchema::for_section`] and
//! unknown names are a configuration error, never a silent skip.

use serde_json::Value;

use crate::error::FieldError;

/// Primitive type a configuration field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Boolean,
}

impl PropertyType {
    /// Whether `value` is of this primitive type. `null` never matches; it
    /// is treated as "absent" before the type check is reached.
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }

    /// Name of `value`'s primitive type, for diagnostics.
    pub(crate) fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// Outcome of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value (or its absence) is acceptable as-is.
    Accepted,
    /// The field was absent and the schema default must be substituted.
    Default(Value),
}

/// Schema for one scalar configuration field.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    kind: PropertyType,
    required: bool,
    default: Option<Value>,
}

impl PropertySchema {
    #[must_use]
    pub const fn new(kind: PropertyType) -> Self {
        Self {
            kind,
            required: false,
            default: None,
        }
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::new(PropertyType::String)
    }

    #[must_use]
    pub const fn integer() -> Self {
        Self::new(PropertyType::Integer)
    }

    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(PropertyType::Boolean)
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default substituted when a required field is absent.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub const fn kind(&self) -> PropertyType {
        self.kind
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Validate a candidate value against this schema. Pure: no side
    /// effects on the schema or the value.
    ///
    /// JSON `null` counts as absent; a loaded `null` and a missing key are
    /// indistinguishable here. Whether a default exists is a presence
    /// check, so falsy defaults (`0`, `""`, `false`) are honored. Defaults
    /// only fill required fields; an absent optional field stays absent
    /// even when the schema carries a default.
    pub fn validate(&self, value: Option<&Value>) -> Result<Outcome, FieldError> {
        let value = value.filter(|v| !v.is_null());
        match value {
            None if self.required => match &self.default {
                Some(default) => Ok(Outcome::Default(default.clone())),
                None => Err(FieldError::MissingRequired),
            },
            Some(v) if !self.kind.matches(v) => Err(FieldError::TypeMismatch {
                expected: self.kind,
                found: PropertyType::name_of(v),
            }),
            _ => Ok(Outcome::Accepted),
        }
    }
}

/// Ordered field schemas for one section kind.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    fields: Vec<(&'static str, PropertySchema)>,
}

impl SectionSchema {
    /// Resolve a section name to its schema.
    ///
    /// The registry is compile-time-known; callers treat `None` as an
    /// unknown-section error rather than ignoring the section.
    #[must_use]
    pub fn for_section(name: &str) -> Option<Self> {
        match name {
            "server" => Some(Self::server()),
            _ => None,
        }
    }

    /// Shape of one server definition.
    fn server() -> Self {
        Self {
            fields: vec![
                ("auto", PropertySchema::boolean().default_value(false)),
                ("host", PropertySchema::string().required()),
                ("nick", PropertySchema::string().required()),
                ("password", PropertySchema::string()),
                (
                    "port",
                    PropertySchema::integer().required().default_value(6667),
                ),
                ("realname", PropertySchema::string()),
                ("username", PropertySchema::string()),
            ],
        }
    }

    /// Iterate the field schemas in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &PropertySchema)> {
        self.fields.iter().map(|(name, schema)| (*name, schema))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, schema)| schema)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn present_well_typed_value_is_accepted() {
        let schema = PropertySchema::string().required();
        assert_eq!(
            schema.validate(Some(&json!("irc.freenode.net"))),
            Ok(Outcome::Accepted)
        );
    }

    #[test]
    fn absent_optional_field_is_accepted() {
        let schema = PropertySchema::string();
        assert_eq!(schema.validate(None), Ok(Outcome::Accepted));
    }

    #[test]
    fn absent_required_field_with_default_substitutes() {
        let schema = PropertySchema::integer().required().default_value(6667);
        assert_eq!(
            schema.validate(None),
            Ok(Outcome::Default(json!(6667)))
        );
    }

    #[test]
    fn absent_required_field_without_default_fails() {
        let schema = PropertySchema::string().required();
        assert_eq!(schema.validate(None), Err(FieldError::MissingRequired));
    }

    #[test]
    fn null_counts_as_absent() {
        let required = PropertySchema::string().required();
        assert_eq!(
            required.validate(Some(&Value::Null)),
            Err(FieldError::MissingRequired)
        );

        let optional = PropertySchema::string();
        assert_eq!(optional.validate(Some(&Value::Null)), Ok(Outcome::Accepted));
    }

    #[test]
    fn wrong_primitive_type_fails() {
        let schema = PropertySchema::integer().required().default_value(6667);
        assert_eq!(
            schema.validate(Some(&json!("not-a-number"))),
            Err(FieldError::TypeMismatch {
                expected: PropertyType::Integer,
                found: "string",
            })
        );
    }

    #[test]
    fn float_does_not_satisfy_integer() {
        let schema = PropertySchema::integer();
        assert!(schema.validate(Some(&json!(66.67))).is_err());
    }

    #[test]
    fn absent_optional_field_with_default_is_not_filled() {
        // Defaults apply to required fields only; `auto` stays absent.
        let schema = PropertySchema::boolean().default_value(false);
        assert_eq!(schema.validate(None), Ok(Outcome::Accepted));
    }

    #[test]
    fn falsy_default_is_honored() {
        let schema = PropertySchema::integer().required().default_value(0);
        assert_eq!(schema.validate(None), Ok(Outcome::Default(json!(0))));
    }

    #[test]
    fn registry_resolves_server_and_rejects_unknown() {
        assert!(SectionSchema::for_section("server").is_some());
        assert!(SectionSchema::for_section("channel").is_none());
        assert!(SectionSchema::for_section("Server").is_none());
    }

    #[test]
    fn server_schema_fields_in_declaration_order() {
        let schema = SectionSchema::for_section("server").unwrap();
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "auto", "host", "nick", "password", "port", "realname", "username"
            ]
        );

        let port = schema.get("port").unwrap();
        assert_eq!(port.kind(), PropertyType::Integer);
        assert!(port.is_required());
        assert_eq!(port.default(), Some(&json!(6667)));
    }
}
