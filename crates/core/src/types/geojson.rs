//! Minimal GeoJSON (RFC 7946) types for spa locations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A geometry. Spas are only ever points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[longitude, latitude]`, in that order.
    Point { coordinates: [f64; 2] },
}

impl Geometry {
    /// Build a point, rejecting out-of-range or non-finite coordinates.
    #[must_use]
    pub fn point(longitude: f64, latitude: f64) -> Option<Self> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        valid.then_some(Self::Point {
            coordinates: [longitude, latitude],
        })
    }
}

/// A single feature. `geometry` is serialized as `null` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub geometry: Option<Geometry>,
    pub properties: Map<String, Value>,
}

/// A collection of features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_point_validation() {
        assert!(Geometry::point(-122.4, 37.7).is_some());
        assert!(Geometry::point(200.0, 0.0).is_none());
        assert!(Geometry::point(0.0, f64::NAN).is_none());
    }

    #[test]
    fn test_feature_collection_shape() {
        let collection: FeatureCollection = vec![
            Feature {
                id: Some("1".to_string()),
                geometry: Geometry::point(10.0, 20.0),
                properties: Map::new(),
            },
            Feature {
                id: None,
                geometry: None,
                properties: Map::new(),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "id": "1",
                        "geometry": {"type": "Point", "coordinates": [10.0, 20.0]},
                        "properties": {}
                    },
                    {"type": "Feature", "geometry": null, "properties": {}}
                ]
            })
        );
    }
}
