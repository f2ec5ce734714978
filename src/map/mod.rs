//! # Coordinate Map
//!
//! Builds the marker set for the detected coordinate columns and renders it
//! as a standalone Leaflet page.
use crate::table::{Table, Value};
use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;
use tracing::debug;

/// Basemap tiles (Esri World Topo Map).
const TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}";
const TILE_ATTRIBUTION: &str = "Tiles &copy; Esri";
const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Row {row} of column '{column}' is not a number: '{value}'")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("No rows with both coordinates to plot")]
    NoCoordinates,
}

/// One map marker; the popup shows the literal coordinate values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
}

/// Markers for every unique coordinate pair, centred on their mean.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// Collects unique coordinate pairs from the table.
    ///
    /// Rows missing either coordinate are skipped; exact duplicate pairs keep
    /// their first occurrence.
    pub fn from_table(table: &Table, latitude: &str, longitude: &str) -> Result<Self, MapError> {
        let latitudes = table
            .column(latitude)
            .ok_or_else(|| MapError::ColumnNotFound(latitude.to_owned()))?;
        let longitudes = table
            .column(longitude)
            .ok_or_else(|| MapError::ColumnNotFound(longitude.to_owned()))?;

        let mut markers: Vec<Marker> = Vec::new();
        for (row, (lat, lon)) in latitudes
            .values()
            .iter()
            .zip(longitudes.values())
            .enumerate()
        {
            if lat.is_null() || lon.is_null() {
                continue;
            }
            let marker = Marker {
                latitude: degrees(lat, latitude, row)?,
                longitude: degrees(lon, longitude, row)?,
                popup: format!("Coordinates: {lat}, {lon}"),
            };
            let duplicate = markers.iter().any(|other| {
                other.latitude == marker.latitude && other.longitude == marker.longitude
            });
            if !duplicate {
                markers.push(marker);
            }
        }

        if markers.is_empty() {
            return Err(MapError::NoCoordinates);
        }
        let count = markers.len() as f64;
        let center = (
            markers.iter().map(|marker| marker.latitude).sum::<f64>() / count,
            markers.iter().map(|marker| marker.longitude).sum::<f64>() / count,
        );
        debug!(markers = markers.len(), ?center, "map built");
        Ok(MapView {
            center,
            zoom: 6,
            markers,
        })
    }

    /// Renders a standalone HTML page showing the markers.
    pub fn to_html(&self) -> String {
        let mut markers = String::new();
        for marker in &self.markers {
            // Writing into a String cannot fail.
            let _ = writeln!(
                markers,
                "L.circleMarker([{:?}, {:?}], {{radius: 5}}).bindPopup({}).addTo(map);",
                marker.latitude,
                marker.longitude,
                js_string(&marker.popup)
            );
        }
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Map of Coordinates</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{lat:?}, {lon:?}], {zoom});
L.tileLayer({tiles}, {{attribution: {attribution}}}).addTo(map);
{markers}</script>
</body>
</html>
"#,
            version = LEAFLET_VERSION,
            lat = self.center.0,
            lon = self.center.1,
            zoom = self.zoom,
            tiles = js_string(TILE_URL),
            attribution = js_string(TILE_ATTRIBUTION),
            markers = markers,
        )
    }
}

fn degrees(value: &Value, column: &str, row: usize) -> Result<f64, MapError> {
    value.as_f64().ok_or_else(|| MapError::NotNumeric {
        column: column.to_owned(),
        row,
        value: value.to_string(),
    })
}

/// Quotes a string as a JavaScript literal safe to embed in a script tag.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_default()
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::new(
                "lat",
                vec![
                    Value::Float(-45.0),
                    Value::Float(-45.0),
                    Value::Null,
                    Value::Float(-41.0),
                ],
            ),
            Column::new(
                "lon",
                vec![
                    Value::Float(170.0),
                    Value::Float(170.0),
                    Value::Float(172.0),
                    Value::Float(174.0),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn markers_are_unique_and_centred() {
        let view = MapView::from_table(&table(), "lat", "lon").unwrap();
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].popup, "Coordinates: -45.0, 170.0");
        assert_eq!(view.center, (-43.0, 172.0));
        assert_eq!(view.zoom, 6);
    }

    #[test]
    fn missing_column() {
        let result = MapView::from_table(&table(), "lat", "longitude");
        assert!(matches!(result, Err(MapError::ColumnNotFound(name)) if name == "longitude"));
    }

    #[test]
    fn text_coordinates_cannot_be_mapped() {
        let table = Table::new(vec![
            Column::new("lat", vec!["45S".into()]),
            Column::new("lon", vec![Value::Float(170.0)]),
        ])
        .unwrap();
        let result = MapView::from_table(&table, "lat", "lon");
        assert!(matches!(result, Err(MapError::NotNumeric { row: 0, .. })));
    }

    #[test]
    fn nothing_to_plot() {
        let table = Table::new(vec![
            Column::new("lat", vec![Value::Null]),
            Column::new("lon", vec![Value::Float(170.0)]),
        ])
        .unwrap();
        assert!(matches!(
            MapView::from_table(&table, "lat", "lon"),
            Err(MapError::NoCoordinates)
        ));
    }

    #[test]
    fn html_contains_markers() {
        let html = MapView::from_table(&table(), "lat", "lon").unwrap().to_html();
        assert!(html.contains("setView([-43.0, 172.0], 6)"));
        assert!(html.contains("L.circleMarker([-41.0, 174.0], {radius: 5})"));
        assert!(html.contains(r#"bindPopup("Coordinates: -45.0, 170.0")"#));
        assert!(html.contains("World_Topo_Map"));
    }
}
