//! Customer metafields ("fields") and planned writes against them.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::id::MetafieldId;

/// Namespace + key identifying a field on an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub namespace: &'static str,
    pub key: &'static str,
}

impl FieldKey {
    /// JSON array of interaction events.
    pub const CUSTOMER_INTERACTIONS: Self = Self::custom("customer_interactions");
    /// Customer date of birth.
    pub const DATE_OF_BIRTH: Self = Self::custom("dob");
    /// Single favorite spa reference.
    pub const SPA_FAVOURITE: Self = Self::custom("spa_favourite");

    /// A key in the `custom` namespace.
    #[must_use]
    pub const fn custom(key: &'static str) -> Self {
        Self {
            namespace: "custom",
            key,
        }
    }

    /// Whether a stored field carries this namespace and key.
    #[must_use]
    pub fn matches(&self, field: &Field) -> bool {
        field.namespace == self.namespace && field.key == self.key
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// Shopify metafield type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Json,
    Date,
    MetaobjectReference,
    SingleLineTextField,
    /// Any type this service does not write itself.
    Other(String),
}

impl FieldType {
    /// Wire name of the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Date => "date",
            Self::MetaobjectReference => "metaobject_reference",
            Self::SingleLineTextField => "single_line_text_field",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "date" => Self::Date,
            "metaobject_reference" => Self::MetaobjectReference,
            "single_line_text_field" => Self::SingleLineTextField,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

/// A persisted metafield as returned by the Admin REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Assigned by Shopify on creation; required for update and delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MetafieldId>,
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Raw stored value. JSON-typed fields are sometimes returned decoded,
    /// so non-string values are re-encoded to their JSON text.
    #[serde(deserialize_with = "value_as_string")]
    pub value: String,
}

fn value_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A field that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewField {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: String,
}

impl NewField {
    /// Build a new field for the given key.
    #[must_use]
    pub fn new(key: FieldKey, field_type: FieldType, value: impl Into<String>) -> Self {
        Self {
            namespace: key.namespace.to_string(),
            key: key.key.to_string(),
            field_type,
            value: value.into(),
        }
    }
}

/// Where a planned write goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    /// Overwrite the field that was read.
    Update(MetafieldId),
    /// No field existed when the snapshot was taken.
    Create,
}

/// A desired new value for a single field, derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub key: FieldKey,
    pub target: WriteTarget,
    pub field_type: FieldType,
    pub value: String,
}

impl FieldWrite {
    /// Plan a write of `value` against the snapshot taken for `key`.
    ///
    /// A snapshot without an id (never persisted) is planned as a create.
    #[must_use]
    pub fn from_snapshot(
        key: FieldKey,
        snapshot: Option<&Field>,
        field_type: FieldType,
        value: String,
    ) -> Self {
        let target = snapshot
            .and_then(|field| field.id)
            .map_or(WriteTarget::Create, WriteTarget::Update);
        Self {
            key,
            target,
            field_type,
            value,
        }
    }

    /// The field to create when the target is [`WriteTarget::Create`].
    #[must_use]
    pub fn to_new_field(&self) -> NewField {
        NewField::new(self.key, self.field_type.clone(), self.value.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names() {
        assert_eq!(FieldType::from("json"), FieldType::Json);
        assert_eq!(FieldType::MetaobjectReference.as_str(), "metaobject_reference");
        assert_eq!(
            FieldType::from("number_integer"),
            FieldType::Other("number_integer".to_string())
        );
    }

    #[test]
    fn test_deserialize_rest_metafield() {
        let field: Field = serde_json::from_str(
            r#"{"id": 555, "namespace": "custom", "key": "dob", "type": "date", "value": "1990-04-01", "owner_id": 1}"#,
        )
        .unwrap();
        assert_eq!(field.id, Some(MetafieldId::new(555)));
        assert_eq!(field.field_type, FieldType::Date);
        assert!(FieldKey::DATE_OF_BIRTH.matches(&field));
    }

    #[test]
    fn test_deserialize_decoded_json_value() {
        let field: Field = serde_json::from_str(
            r#"{"id": 1, "namespace": "custom", "key": "customer_interactions", "type": "json", "value": [{"a": 1}]}"#,
        )
        .unwrap();
        assert_eq!(field.value, r#"[{"a":1}]"#);
    }

    #[test]
    fn test_new_field_serializes_type_key() {
        let field = NewField::new(FieldKey::SPA_FAVOURITE, FieldType::MetaobjectReference, "x");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "metaobject_reference");
        assert_eq!(json["namespace"], "custom");
        assert_eq!(json["key"], "spa_favourite");
    }

    #[test]
    fn test_plan_targets() {
        let stored = Field {
            id: Some(MetafieldId::new(9)),
            namespace: "custom".to_string(),
            key: "dob".to_string(),
            field_type: FieldType::Date,
            value: "2000-01-01".to_string(),
        };
        let update = FieldWrite::from_snapshot(
            FieldKey::DATE_OF_BIRTH,
            Some(&stored),
            FieldType::Date,
            "2001-01-01".to_string(),
        );
        assert_eq!(update.target, WriteTarget::Update(MetafieldId::new(9)));

        let create =
            FieldWrite::from_snapshot(FieldKey::DATE_OF_BIRTH, None, FieldType::Date, String::new());
        assert_eq!(create.target, WriteTarget::Create);
    }
}
