//! Shopify metaobjects (spa records) and their flattened client views.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geojson::{Feature, Geometry};
use super::id::MetaobjectId;

/// Field keys holding a spa's coordinates.
const LATITUDE_KEY: &str = "latitude";
const LONGITUDE_KEY: &str = "longitude";

/// One key/value pair on a metaobject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    pub value: Option<String>,
}

/// A metaobject as returned by the Admin GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metaobject {
    /// Global id, e.g. `gid://shopify/Metaobject/123`.
    pub id: String,
    pub handle: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub metaobject_type: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetaobjectField>,
}

impl Metaobject {
    /// The numeric part of the global id, or the raw id if it is not a
    /// metaobject gid.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.id
            .parse::<MetaobjectId>()
            .map_or_else(|_| self.id.clone(), |id| id.to_string())
    }

    /// Value of the field with `key`, if present and non-null.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .and_then(|field| field.value.as_deref())
    }

    /// Flatten into `{ id, handle, <key>: <value>, ... }`.
    ///
    /// Fields are applied after `id` and `handle`, so a field with one of
    /// those keys wins.
    #[must_use]
    pub fn flatten(&self) -> Map<String, Value> {
        let mut flat = Map::new();
        flat.insert("id".to_string(), Value::String(self.short_id()));
        flat.insert("handle".to_string(), Value::String(self.handle.clone()));
        for field in &self.fields {
            let value = field.value.clone().map_or(Value::Null, Value::String);
            flat.insert(field.key.clone(), value);
        }
        flat
    }

    /// Point geometry from the `longitude`/`latitude` fields.
    #[must_use]
    pub fn geometry(&self) -> Option<Geometry> {
        let latitude = self.field(LATITUDE_KEY)?.trim().parse::<f64>().ok()?;
        let longitude = self.field(LONGITUDE_KEY)?.trim().parse::<f64>().ok()?;
        Geometry::point(longitude, latitude)
    }

    /// GeoJSON feature with the flattened record as properties.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        Feature {
            id: Some(self.short_id()),
            geometry: self.geometry(),
            properties: self.flatten(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spa(fields: &[(&str, Option<&str>)]) -> Metaobject {
        Metaobject {
            id: "gid://shopify/Metaobject/321".to_string(),
            handle: "harbour-spa".to_string(),
            metaobject_type: Some("spa".to_string()),
            fields: fields
                .iter()
                .map(|(key, value)| MetaobjectField {
                    key: (*key).to_string(),
                    value: value.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn test_flatten() {
        let record = spa(&[("name", Some("Harbour Spa")), ("phone", None)]);
        assert_eq!(
            Value::Object(record.flatten()),
            json!({"id": "321", "handle": "harbour-spa", "name": "Harbour Spa", "phone": null})
        );
    }

    #[test]
    fn test_short_id_falls_back_to_raw() {
        let mut record = spa(&[]);
        record.id = "not-a-gid".to_string();
        assert_eq!(record.short_id(), "not-a-gid");
    }

    #[test]
    fn test_feature_with_coordinates() {
        let feature = spa(&[("latitude", Some("51.5")), ("longitude", Some(" -0.12 "))]).to_feature();
        assert_eq!(feature.id.as_deref(), Some("321"));
        assert_eq!(
            feature.geometry,
            Some(Geometry::Point {
                coordinates: [-0.12, 51.5]
            })
        );
        assert_eq!(feature.properties["handle"], "harbour-spa");
    }

    #[test]
    fn test_feature_without_coordinates() {
        let feature = spa(&[("latitude", Some("north")), ("longitude", Some("1"))]).to_feature();
        assert!(feature.geometry.is_none());
    }
}
