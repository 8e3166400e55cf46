//! Host-tunable settings. Every struct deserializes from partial camelCase JSON.

use crate::draw::config::DrawConfig;
use crate::model::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Hard outer limit for panning, active regardless of the selected region.
    pub country_bounds: LatLngBounds,
    pub default_center: LatLng,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub initial_boundary: Option<String>,
    /// Restricts selectable regions; `None` allows every registry entry.
    pub allowed_boundaries: Option<Vec<String>>,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            country_bounds: LatLngBounds::new(LatLng::new(-34.0, -74.0), LatLng::new(5.5, -32.0)),
            default_center: LatLng::new(-14.235, -51.925),
            default_zoom: 5.0,
            min_zoom: 5.0,
            max_zoom: 16.0,
            initial_boundary: None,
            allowed_boundaries: None,
        }
    }
}

/// How a boundary transition learns that the viewport has arrived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionMode {
    /// Fixed delay tuned to the fly duration.
    #[default]
    Timer,
    /// First `moveend` after the fly, with the timer as fallback.
    MoveEnd,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionConfig {
    pub fly_duration_ms: f64,
    pub ease_linearity: f64,
    pub guard_ms: f64,
    pub settle_ms: f64,
    pub tiles_loaded_ms: f64,
    pub completion: CompletionMode,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        TransitionConfig {
            fly_duration_ms: 1000.0,
            ease_linearity: 0.5,
            guard_ms: 100.0,
            settle_ms: 100.0,
            tiles_loaded_ms: 100.0,
            completion: CompletionMode::Timer,
        }
    }
}

impl TransitionConfig {
    pub fn arrival_delay_ms(&self, animate: bool) -> f64 {
        if animate {
            self.fly_duration_ms + self.guard_ms
        } else {
            self.settle_ms
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Attribute searched; `None` searches the drawing name attribute.
    pub field: Option<String>,
    pub fit_padding: f64,
    pub circle_focus_zoom: f64,
    pub highlight_weight: f64,
    pub highlight_fill_opacity: f64,
    pub dimmed_opacity: f64,
    pub dimmed_fill_opacity: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            field: None,
            fit_padding: 50.0,
            circle_focus_zoom: 15.0,
            highlight_weight: 4.0,
            highlight_fill_opacity: 0.45,
            dimmed_opacity: 0.25,
            dimmed_fill_opacity: 0.05,
        }
    }
}

/// Everything a session needs, as one deserializable document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub map: MapConfig,
    pub transition: TransitionConfig,
    pub draw: DrawConfig,
    pub search: SearchConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SessionConfig = serde_json::from_value(json!({
            "map": {"initialBoundary": "sp"},
            "transition": {"completion": "moveEnd", "guardMs": 250.0}
        }))
        .unwrap();
        assert_eq!(cfg.map.initial_boundary.as_deref(), Some("sp"));
        assert_eq!(cfg.map.max_zoom, 16.0);
        assert_eq!(cfg.transition.completion, CompletionMode::MoveEnd);
        assert_eq!(cfg.transition.arrival_delay_ms(true), 1250.0);
        assert_eq!(cfg.search.fit_padding, 50.0);
    }

    #[test]
    fn country_bounds_serialize_as_corner_pairs() {
        let v = serde_json::to_value(MapConfig::default().country_bounds).unwrap();
        assert_eq!(v, json!([[-34.0, -74.0], [5.5, -32.0]]));
    }
}
