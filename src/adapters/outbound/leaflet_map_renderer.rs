//! Leaflet Map Renderer
//!
//! Implements MapRenderer by producing a standalone HTML page that draws the
//! map with Leaflet and OpenStreetMap tiles.

use crate::domain::entities::{MapModel, RankedCarrier};
use crate::domain::ports::{MapRenderer, RenderError};
use crate::domain::value_objects::GeoPoint;
use serde::Serialize;

pub const DEFAULT_MAP_ZOOM: u8 = 10;

const HOME_COLOR: &str = "red";
const CARRIER_COLOR: &str = "blue";
const COVERAGE_COLOR: &str = "green";
const COVERAGE_FILL_OPACITY: f64 = 0.1;
const HOME_LABEL: &str = "Your Location";
const DATA_PLACEHOLDER: &str = "__MAP_DATA__";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Closest Carriers</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body, #map { height: 100%; margin: 0; }
.pin { width: 14px; height: 14px; border-radius: 50%; border: 2px solid #fff; box-shadow: 0 0 3px #333; }
</style>
</head>
<body>
<div id="map"></div>
<script>
var data = __MAP_DATA__;
var map = L.map("map").setView(data.center, data.zoom);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
function pin(color) {
  return L.divIcon({ className: "", html: '<div class="pin" style="background:' + color + '"></div>', iconSize: [18, 18] });
}
function place(m) {
  L.marker([m.lat, m.lon], { icon: pin(m.color) })
    .bindPopup(m.popup, { maxWidth: 300 })
    .bindTooltip(m.tooltip)
    .addTo(map);
}
place(data.home);
data.carriers.forEach(place);
L.circle(data.circle.center, {
  radius: data.circle.radius,
  color: data.circle.color,
  fill: true,
  fillOpacity: data.circle.fill_opacity
}).addTo(map);
</script>
</body>
</html>
"#;

/// Marker payload handed to the page script. Text is already HTML-escaped.
#[derive(Debug, Serialize)]
struct MarkerData {
    lat: f64,
    lon: f64,
    color: &'static str,
    popup: String,
    tooltip: String,
}

#[derive(Debug, Serialize)]
struct CircleData {
    center: [f64; 2],
    radius: f64,
    color: &'static str,
    fill_opacity: f64,
}

#[derive(Debug, Serialize)]
struct MapData {
    center: [f64; 2],
    zoom: u8,
    home: MarkerData,
    carriers: Vec<MarkerData>,
    circle: CircleData,
}

/// Renderer producing Leaflet HTML pages.
pub struct LeafletMapRenderer {
    zoom: u8,
}

impl LeafletMapRenderer {
    pub fn new(zoom: u8) -> Self {
        Self { zoom }
    }

    fn map_data(&self, map: &MapModel) -> MapData {
        let home = MarkerData {
            lat: map.user_marker.latitude(),
            lon: map.user_marker.longitude(),
            color: HOME_COLOR,
            popup: HOME_LABEL.to_string(),
            tooltip: HOME_LABEL.to_string(),
        };

        // carriers without a location have nowhere to go on the map
        let carriers = map
            .carrier_markers
            .iter()
            .filter_map(|ranked| {
                ranked.carrier.location.map(|location| MarkerData {
                    lat: location.latitude(),
                    lon: location.longitude(),
                    color: CARRIER_COLOR,
                    popup: carrier_popup(ranked),
                    tooltip: escape_html(&ranked.carrier.name),
                })
            })
            .collect();

        MapData {
            center: lat_lon(&map.center),
            zoom: self.zoom,
            home,
            carriers,
            circle: CircleData {
                center: lat_lon(&map.center),
                radius: map.coverage_radius_meters,
                color: COVERAGE_COLOR,
                fill_opacity: COVERAGE_FILL_OPACITY,
            },
        }
    }
}

impl Default for LeafletMapRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_ZOOM)
    }
}

impl MapRenderer for LeafletMapRenderer {
    fn render(&self, map: &MapModel) -> Result<String, RenderError> {
        let data = serde_json::to_string(&self.map_data(map))
            .map_err(|e| RenderError::Serialization(e.to_string()))?;
        Ok(PAGE_TEMPLATE.replace(DATA_PLACEHOLDER, &data))
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

fn lat_lon(point: &GeoPoint) -> [f64; 2] {
    [point.latitude(), point.longitude()]
}

fn carrier_popup(ranked: &RankedCarrier) -> String {
    let distance = if ranked.is_reachable() {
        format!("{:.2} km", ranked.distance_km)
    } else {
        "unknown".to_string()
    };
    format!(
        "<b>{}</b><br>State: {}<br>Address: {}<br>Distance: {}",
        escape_html(&ranked.carrier.name),
        escape_html(&ranked.carrier.state),
        escape_html(&ranked.carrier.address),
        distance
    )
}

/// Escape text for inclusion in HTML content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
