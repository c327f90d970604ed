use crate::domain::model::{Coordinate, MapArtifact};
use serde::{Deserialize, Serialize};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const MARKER_POPUP: &str = "Deployment Location";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub zoom: u8,
    pub stroke_color: String,
    pub fill_opacity: f64,
    pub height_px: u32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            zoom: 12,
            stroke_color: "#3F4F44".to_string(),
            fill_opacity: 0.2,
            height_px: 500,
        }
    }
}

/// Renders the coverage map as a self-contained Leaflet fragment.
#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    style: MapStyle,
}

impl MapRenderer {
    pub fn new(style: MapStyle) -> Self {
        Self { style }
    }

    /// Centers the map on `coordinate`, drops a marker there and draws a
    /// circle of `radius_km` kilometres around it.
    pub fn render(&self, coordinate: Coordinate, radius_km: f64) -> MapArtifact {
        let map_id = format!("map_{}", uuid::Uuid::new_v4().simple());
        let center = serde_json::json!([coordinate.latitude, coordinate.longitude]);
        let tile_options = serde_json::json!({
            "maxZoom": 19,
            "attribution": TILE_ATTRIBUTION,
        });
        let circle_options = serde_json::json!({
            "radius": radius_km * 1000.0,
            "color": self.style.stroke_color,
            "fill": true,
            "fillColor": self.style.stroke_color,
            "fillOpacity": self.style.fill_opacity,
        });

        let html = format!(
            r#"<link rel="stylesheet" href="{css}"/>
<script src="{js}"></script>
<div id="{id}" style="width: 100%; height: {height}px;"></div>
<script>
(function() {{
    var map = L.map({id_js}).setView({center}, {zoom});
    L.tileLayer({tiles}, {tile_options}).addTo(map);
    L.marker({center}).bindPopup({popup}).addTo(map);
    L.circle({center}, {circle_options}).addTo(map);
}})();
</script>"#,
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            id = map_id,
            id_js = serde_json::Value::from(map_id.as_str()),
            height = self.style.height_px,
            center = center,
            zoom = self.style.zoom,
            tiles = serde_json::Value::from(TILE_URL),
            tile_options = tile_options,
            popup = serde_json::Value::from(MARKER_POPUP),
            circle_options = circle_options,
        );

        tracing::debug!(
            "Rendered map {} at ({}, {}) with radius {} km",
            map_id,
            coordinate.latitude,
            coordinate.longitude,
            radius_km
        );

        MapArtifact {
            coordinate,
            radius_km,
            html,
        }
    }
}
