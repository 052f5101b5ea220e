//! Attribute schemas for the provider, its resources and data sources.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Value type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int64,
    /// Homogeneous list.
    List(Box<AttributeType>),
    /// Nested object with its own attributes.
    Object(BTreeMap<String, Attribute>),
}

impl AttributeType {
    /// List of strings.
    #[must_use]
    pub fn string_list() -> Self {
        Self::List(Box::new(Self::String))
    }

    /// Nested object built from `(name, attribute)` pairs.
    pub fn object<I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Attribute)>,
    {
        Self::Object(
            attributes
                .into_iter()
                .map(|(name, attr)| (name.to_string(), attr))
                .collect(),
        )
    }

    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::String, Value::String(_)) | (Self::Bool, Value::Bool(_)) => true,
            (Self::Int64, Value::Number(n)) => n.is_i64(),
            (Self::List(inner), Value::Array(items)) => items.iter().all(|v| inner.matches(v)),
            (Self::Object(_), Value::Object(_)) => true,
            _ => false,
        }
    }
}

/// A single attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Value type.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Human readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must be set in configuration.
    pub required: bool,
    /// May be set in configuration.
    pub optional: bool,
    /// Filled in by the provider.
    pub computed: bool,
    /// Redacted from plan output.
    pub sensitive: bool,
}

impl Attribute {
    fn with_flags(attr_type: AttributeType, required: bool, optional: bool, computed: bool) -> Self {
        Self {
            attr_type,
            description: None,
            required,
            optional,
            computed,
            sensitive: false,
        }
    }

    /// Must be configured.
    #[must_use]
    pub fn required(attr_type: AttributeType) -> Self {
        Self::with_flags(attr_type, true, false, false)
    }

    /// May be configured.
    #[must_use]
    pub fn optional(attr_type: AttributeType) -> Self {
        Self::with_flags(attr_type, false, true, false)
    }

    /// Set by the provider only.
    #[must_use]
    pub fn computed(attr_type: AttributeType) -> Self {
        Self::with_flags(attr_type, false, false, true)
    }

    /// May be configured; the provider fills it in otherwise.
    #[must_use]
    pub fn optional_computed(attr_type: AttributeType) -> Self {
        Self::with_flags(attr_type, false, true, true)
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the attribute sensitive.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Flags are consistent: exactly one of required/optional/computed-only,
    /// and nested attributes are valid too.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let flags_ok = matches!(
            (self.required, self.optional, self.computed),
            (true, false, false) | (false, true, _) | (false, false, true)
        );
        let nested_ok = match &self.attr_type {
            AttributeType::Object(attrs) => attrs.values().all(Self::is_valid),
            _ => true,
        };
        flags_ok && nested_ok
    }
}

/// Schema of a provider, resource or data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Description shown in documentation.
    pub description: String,
    /// Attributes by name.
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Schema with a description and no attributes.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Every attribute definition is consistent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.attributes.values().all(Attribute::is_valid)
    }

    /// Paths of required attributes that are missing or null in `config`,
    /// descending into nested objects.
    #[must_use]
    pub fn missing_required(&self, config: &Value) -> Vec<String> {
        let mut missing = Vec::new();
        collect_missing(&self.attributes, config, "", &mut missing);
        missing
    }

    /// Paths whose value does not match the declared type.
    #[must_use]
    pub fn type_mismatches(&self, config: &Value) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(name, attr)| {
                config
                    .get(name.as_str())
                    .is_some_and(|v| !attr.attr_type.matches(v))
            })
            .map(|(name, _)| name.clone())
            .collect()
    }
}

fn collect_missing(
    attributes: &BTreeMap<String, Attribute>,
    config: &Value,
    prefix: &str,
    missing: &mut Vec<String>,
) {
    for (name, attr) in attributes {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match config.get(name.as_str()) {
            None | Some(Value::Null) => {
                if attr.required {
                    missing.push(path);
                }
            }
            Some(value) => {
                if let AttributeType::Object(nested) = &attr.attr_type {
                    collect_missing(nested, value, &path, missing);
                }
            }
        }
    }
}
