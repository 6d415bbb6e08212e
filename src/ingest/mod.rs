//! Agency directory ingestion.
//!
//! Submodules:
//! - `arcgis`: GeoJSON feature service client and feature → `Agency` mapping.

pub mod arcgis;
