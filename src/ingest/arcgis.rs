//! ArcGIS Feature Service client for the agency directory
//!
//! Retrieves the agency layer as GeoJSON and maps each feature to a
//! canonical `Agency`. Provider field names (`TEXTE`, `ADRESSE`, `HORAIRE`,
//! ...) stop at this module; nothing downstream sees them.
//!
//! Query reference: https://developers.arcgis.com/rest/services-reference/enterprise/query-feature-service-layer/

use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use crate::logging::{self, LogSource};
use crate::model::{Agency, IngestError};
use crate::schedule::normalize::{DayHours, normalize_days, normalize_text};

/// Agency layer, all fields, all rows, GeoJSON output.
pub const DEFAULT_FEED_URL: &str = "https://services6.arcgis.com/k3ZIRnRpeM4Ht4fG/arcgis/rest/services/Agences_opendata/FeatureServer/0/query?outFields=*&where=1%3D1&f=geojson";

// ============================================================================
// GeoJSON Response Structures
// ============================================================================

/// Features are kept as raw JSON here and decoded one by one in
/// `map_features`, so a malformed row cannot fail the whole feed.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: AgencyProperties,
}

/// Point geometry; GeoJSON orders coordinates `[longitude, latitude]`.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<f64>,
}

/// Attributes of one agency feature. Text-like fields are kept as raw JSON
/// values because the layer stores some of them (postal code, phone) as
/// numbers.
#[derive(Debug, Default, Deserialize)]
pub struct AgencyProperties {
    #[serde(rename = "TEXTE")]
    pub name: Option<String>,
    #[serde(rename = "ADRESSE")]
    pub address: Option<Value>,
    #[serde(rename = "CODE_POSTAL")]
    pub postal_code: Option<Value>,
    #[serde(rename = "VILLE")]
    pub city: Option<Value>,
    #[serde(rename = "TEL")]
    pub phone: Option<Value>,
    #[serde(rename = "FAX")]
    pub fax: Option<Value>,
    /// Free-text schedule, one `"LU : 08:00-12:00"` line per day.
    #[serde(rename = "HORAIRE")]
    pub hours_text: Option<String>,
    /// Structured schedule, one record per day.
    #[serde(rename = "HORAIRES")]
    pub hours_records: Option<Vec<DayHours>>,
}

/// Why a single feature could not become an `Agency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    Malformed(String),
    MissingName,
    MissingGeometry,
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureError::Malformed(msg) => write!(f, "malformed feature: {}", msg),
            FeatureError::MissingName => write!(f, "feature has no TEXTE attribute"),
            FeatureError::MissingGeometry => write!(f, "feature has no point geometry"),
        }
    }
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch the full agency layer.
///
/// # Parameters
/// - `client`: HTTP client (timeout configured by the caller)
/// - `url`: feature service query URL returning GeoJSON
pub fn fetch_feed(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<FeatureCollection, IngestError> {
    let response = client
        .get(url)
        .header("Accept", "application/geo+json, application/json")
        .send()
        .map_err(|e| IngestError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(IngestError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| IngestError::RequestFailed(e.to_string()))?;

    parse_feed(&body)
}

/// Parse a GeoJSON body into features.
pub fn parse_feed(body: &str) -> Result<FeatureCollection, IngestError> {
    serde_json::from_str(body).map_err(|e| IngestError::ParseError(e.to_string()))
}

// ============================================================================
// Feature Mapping
// ============================================================================

/// Decodes one raw feature of the collection.
pub fn decode_feature(value: &Value) -> Result<Feature, FeatureError> {
    Feature::deserialize(value).map_err(|e| FeatureError::Malformed(e.to_string()))
}

/// Maps one feature to an `Agency`, normalizing its schedule. When both
/// schedule shapes are present the structured records win.
pub fn agency_from_feature(feature: &Feature, zone: &Tz) -> Result<Agency, FeatureError> {
    let props = &feature.properties;

    let name = props
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(FeatureError::MissingName)?
        .to_string();

    let (longitude, latitude) = match feature.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
        Some([lng, lat, ..]) => (*lng, *lat),
        _ => return Err(FeatureError::MissingGeometry),
    };

    let schedule = match (&props.hours_records, &props.hours_text) {
        (Some(records), _) if !records.is_empty() => normalize_days(records, zone),
        (_, Some(text)) => normalize_text(text),
        _ => String::new(),
    };

    Ok(Agency {
        name,
        address: value_text(&props.address),
        postal_code: value_text(&props.postal_code),
        city: value_text(&props.city),
        phone: value_text(&props.phone),
        fax: value_text(&props.fax),
        latitude,
        longitude,
        schedule,
    })
}

/// Maps every usable feature. Unusable features are logged and skipped so
/// that one bad row never hides the rest of the directory.
pub fn map_features(collection: &FeatureCollection, zone: &Tz) -> Vec<Agency> {
    let mut agencies = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.iter().enumerate() {
        match decode_feature(feature).and_then(|f| agency_from_feature(&f, zone)) {
            Ok(agency) => agencies.push(agency),
            Err(e) => {
                let id = feature
                    .pointer("/properties/TEXTE")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| format!("feature #{}", i));
                logging::warn(LogSource::Feed, Some(&id), &format!("Skipping feature: {}", e));
            }
        }
    }

    logging::log_ingest_summary(
        collection.features.len(),
        agencies.len(),
        collection.features.len() - agencies.len(),
    );

    agencies
}

/// Renders a JSON attribute as display text. Null or missing becomes "".
fn value_text(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
