use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Serialize)]
pub struct GeoJson {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: Geometry,
}

/// Request body for registering a field boundary with the provider
#[derive(Serialize)]
pub struct PolygonRequest {
    pub name: String,
    pub geo_json: GeoJson,
}

impl PolygonRequest {
    /// Builds a square boundary centered on the given point, closed back
    /// on its first corner as GeoJSON requires
    ///
    /// # Arguments
    ///
    /// * 'name' - provider-side name of the polygon
    /// * 'lat' - latitude of the center point
    /// * 'lon' - longitude of the center point
    /// * 'half_side' - half the side length in degrees
    pub fn square(name: &str, lat: f64, lon: f64, half_side: f64) -> PolygonRequest {
        let d = half_side;
        let ring = vec![
            [lon - d, lat - d],
            [lon + d, lat - d],
            [lon + d, lat + d],
            [lon - d, lat + d],
            [lon - d, lat - d],
        ];

        PolygonRequest {
            name: name.to_string(),
            geo_json: GeoJson {
                feature_type: "Feature".to_string(),
                properties: serde_json::Map::new(),
                geometry: Geometry {
                    geometry_type: "Polygon".to_string(),
                    coordinates: vec![ring],
                },
            },
        }
    }
}

#[derive(Deserialize)]
pub struct CreatedPolygon {
    pub id: String,
}

/// Soil metrics for a polygon. The provider omits fields it has no data
/// for, so everything is optional here and defaulted during normalization.
#[derive(Deserialize, Default)]
pub struct SoilReadings {
    pub ph: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub organic_matter: Option<f64>,
    pub moisture: Option<f64>,
    /// Soil temperature at 10 cm depth, in °C
    pub t10: Option<f64>,
}

#[derive(Deserialize)]
pub struct NdviStats {
    pub mean: Option<f64>,
}

#[derive(Deserialize)]
pub struct SceneStats {
    pub ndvi: Option<NdviStats>,
}

/// One satellite scene from the image search, most recent first
#[derive(Deserialize)]
pub struct Scene {
    pub dt: i64,
    /// Cloud coverage percentage of the scene
    pub cl: Option<f64>,
    pub stats: Option<SceneStats>,
}
