use super::collection::{DrawnCollection, DrawnFeature};
use super::config::{DrawConfig, DrawControl};
use super::label;
use crate::color::{self, DrawColor};
use crate::geojson::{self, FeatureCollection, GeoFeature, Properties};
use crate::geometry::limits;
use crate::listener::MapListener;
use crate::model::{FeatureId, Shape};
use crate::surface::{absorb, ControlId, EventKind, ListenerId, MapSurface};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

/// `"0007 - PLOT"`
pub fn format_name(n: u32, label: &str) -> String {
    format!("{n:04} - {label}")
}

/// Leading decimal digits of a name, if any.
pub fn numeric_prefix(name: &str) -> Option<u32> {
    let end = name.find(|c: char| !c.is_ascii_digit()).unwrap_or(name.len());
    name[..end].parse().ok()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Single authority over the drawn collection and its rendering.
#[derive(Debug)]
pub struct DrawManager {
    config: DrawConfig,
    color: DrawColor,
    counter: u32,
    collection: DrawnCollection,
    control: Option<ControlId>,
    subscriptions: Vec<ListenerId>,
    destroyed: bool,
}

impl DrawManager {
    pub fn new(config: DrawConfig) -> Self {
        DrawManager {
            color: config.initial_color.clone(),
            config,
            counter: 1,
            collection: DrawnCollection::new(),
            control: None,
            subscriptions: Vec::new(),
            destroyed: false,
        }
    }

    fn live<S: MapSurface + ?Sized>(&self, surface: &S) -> bool {
        !self.destroyed && surface.is_alive()
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn collection(&self) -> &DrawnCollection {
        &self.collection
    }

    pub fn color(&self) -> &DrawColor {
        &self.color
    }

    pub fn next_counter(&self) -> u32 {
        self.counter
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Subscribes to the draw events and places the drawing toolbar.
    pub fn mount<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if !self.live(surface) {
            return;
        }
        for kind in [EventKind::Created, EventKind::Edited, EventKind::Deleted] {
            if let Some(id) = absorb("subscribe", surface.subscribe(kind)) {
                self.subscriptions.push(id);
            }
        }
        let control = DrawControl::new(&self.color, &self.config.locale);
        self.control = absorb("addControl", surface.add_draw_control(&control));
    }

    fn next_name(&mut self) -> String {
        let name = format_name(self.counter, &self.config.name_label);
        self.counter = self.counter.saturating_add(1);
        name
    }

    fn render<S: MapSurface + ?Sized>(&self, surface: &mut S, f: &DrawnFeature) {
        absorb("addLayer", surface.add_layer(f.id, &f.shape, &f.style()));
        self.relabel(surface, f);
    }

    fn relabel<S: MapSurface + ?Sized>(&self, surface: &mut S, f: &DrawnFeature) {
        let html = label::describe(f.attribute_str(&self.config.name_key), &f.shape, &self.config.locale);
        absorb("bindLabel", surface.bind_label(f.id, &html));
    }

    /// Handles a creation event: tags, stores and renders the new shape as editable.
    pub fn create<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        listener: &mut dyn MapListener,
        shape: Shape,
    ) -> Option<FeatureId> {
        if !self.live(surface) {
            return None;
        }
        if let Err(reason) = check_shape(&shape) {
            warn!(%reason, "ignoring invalid drawn shape");
            return None;
        }
        let kind = shape.kind();
        let mut properties = Properties::new();
        properties.insert(self.config.name_key.clone(), Value::String(self.next_name()));
        let id = self.collection.insert(shape, self.color.clone(), properties, false);
        let feature = self.collection.get(id)?.clone();
        self.render(surface, &feature);
        debug!(id = id.0, kind = kind.as_str(), "shape created");
        listener.on_shape_created(kind, id, &feature.to_geojson());
        Some(id)
    }

    /// Applies edited geometry and refreshes labels. Unknown stamps are ignored.
    pub fn edit<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        listener: &mut dyn MapListener,
        shapes: Vec<(FeatureId, Shape)>,
    ) -> Vec<FeatureId> {
        if !self.live(surface) {
            return Vec::new();
        }
        let mut touched = Vec::with_capacity(shapes.len());
        for (id, shape) in shapes {
            if let Err(reason) = check_shape(&shape) {
                warn!(id = id.0, %reason, "ignoring invalid edit");
                continue;
            }
            let Some(f) = self.collection.get_mut(id) else { continue };
            f.shape = shape;
            let f = f.clone();
            self.relabel(surface, &f);
            touched.push(id);
        }
        listener.on_shape_edited(&touched);
        touched
    }

    pub fn delete<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        listener: &mut dyn MapListener,
        ids: &[FeatureId],
    ) -> Vec<FeatureId> {
        if !self.live(surface) {
            return Vec::new();
        }
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.collection.remove(id).is_some() {
                absorb("removeLayer", surface.remove_layer(id));
                removed.push(id);
            }
        }
        listener.on_shape_deleted(&removed);
        removed
    }

    /// Colour for future shapes. Existing layers keep theirs; the toolbar is rebuilt.
    pub fn set_color<S: MapSurface + ?Sized>(&mut self, surface: &mut S, color: DrawColor) {
        if !self.live(surface) {
            return;
        }
        self.color = color;
        if let Some(old) = self.control.take() {
            if let Err(e) = surface.remove_draw_control(old) {
                warn!(error = %e, "could not remove draw control");
            }
        }
        let control = DrawControl::new(&self.color, &self.config.locale);
        match surface.add_draw_control(&control) {
            Ok(id) => self.control = Some(id),
            Err(e) => error!(error = %e, "could not add draw control"),
        }
    }

    /// Removes every editable feature. Returns how many were removed.
    pub fn clear<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        if !self.live(surface) {
            return 0;
        }
        let removed = self.collection.drain_editable();
        for &id in &removed {
            absorb("removeLayer", surface.remove_layer(id));
        }
        removed.len()
    }

    pub fn export(&self) -> FeatureCollection {
        FeatureCollection::new(self.collection.iter().map(DrawnFeature::to_geojson).collect())
    }

    /// Loads a collection. `initial` replaces everything and marks the result protected;
    /// otherwise editable features are replaced and protected ones kept.
    pub fn import<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        fc: &FeatureCollection,
        initial: bool,
    ) -> ImportReport {
        if !self.live(surface) {
            return ImportReport::default();
        }
        let dropped = if initial {
            self.collection.drain_all()
        } else {
            self.collection.drain_editable()
        };
        for id in dropped {
            absorb("removeLayer", surface.remove_layer(id));
        }

        let mut report = ImportReport::default();
        for (i, f) in fc.features.iter().enumerate() {
            if i >= limits::MAX_FEATURES {
                report.skipped += fc.features.len() - i;
                warn!(limit = limits::MAX_FEATURES, "import truncated");
                break;
            }
            let shape = match geojson::decode_shape(f) {
                Ok(shape) => shape,
                Err(e) => {
                    warn!(index = i, code = e.code(), error = %e, "skipping feature");
                    report.skipped += 1;
                    continue;
                }
            };
            let color = self.resolve_color(f);
            let properties = self.user_properties(f);
            let id = self.collection.insert(shape, color, properties, initial);
            if let Some(feature) = self.collection.get(id).cloned() {
                self.render(surface, &feature);
            }
            report.imported += 1;
        }

        self.reseed_counter();
        debug!(imported = report.imported, skipped = report.skipped, initial, "import finished");
        report
    }

    /// Explicit `drawColor`, then the legacy packed colour, then the configured default.
    fn resolve_color(&self, f: &GeoFeature) -> DrawColor {
        if let Some(c) = f.properties.get(geojson::DRAW_COLOR_KEY).and_then(DrawColor::from_value) {
            return c;
        }
        if let Some(rgb) = f.properties.get(&self.config.legacy_color_key).and_then(color::packed_rgb) {
            return DrawColor::from_packed_rgb(rgb);
        }
        self.config.initial_color.clone()
    }

    fn user_properties(&self, f: &GeoFeature) -> Properties {
        f.properties
            .iter()
            .filter(|(k, _)| !geojson::is_shape_attribute(k) && **k != self.config.legacy_color_key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn reseed_counter(&mut self) {
        let key = &self.config.name_key;
        let max = self
            .collection
            .iter()
            .filter_map(|f| f.attribute_str(key).and_then(numeric_prefix))
            .max()
            .unwrap_or(0);
        self.counter = max.saturating_add(1);
    }

    /// Unsubscribes, removes the toolbar and every rendered layer. Later calls are no-ops.
    pub fn destroy<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let subscriptions = std::mem::take(&mut self.subscriptions);
        let control = self.control.take();
        if !surface.is_alive() {
            return;
        }
        for id in subscriptions {
            absorb("unsubscribe", surface.unsubscribe(id));
        }
        if let Some(id) = control {
            absorb("removeControl", surface.remove_draw_control(id));
        }
        for id in self.collection.ids() {
            absorb("removeLayer", surface.remove_layer(id));
        }
        debug!("draw manager destroyed");
    }
}

fn check_shape(shape: &Shape) -> Result<(), String> {
    let valid = |p: &crate::model::LatLng| limits::in_lat_bounds(p.lat) && limits::in_lng_bounds(p.lng);
    match shape {
        Shape::Polygon { rings } => {
            if rings.is_empty() || rings.len() > limits::MAX_RINGS_PER_POLYGON {
                return Err("ring count out of range".into());
            }
            for r in rings {
                if r.len() < 3 || r.len() > limits::MAX_RING_VERTICES {
                    return Err(format!("ring with {} vertices", r.len()));
                }
                if !r.iter().all(valid) {
                    return Err("coordinate out of range".into());
                }
            }
            Ok(())
        }
        Shape::Rectangle { bounds } => {
            if valid(&bounds.south_west) && valid(&bounds.north_east) {
                Ok(())
            } else {
                Err("rectangle corner out of range".into())
            }
        }
        Shape::Circle { center, radius } => {
            if !valid(center) {
                Err("circle center out of range".into())
            } else if !limits::in_radius_bounds(*radius) {
                Err(format!("radius {radius} out of range"))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(format_name(8, "PLOT"), "0008 - PLOT");
        assert_eq!(format_name(12345, "X"), "12345 - X");
    }

    #[test]
    fn prefix_parsing() {
        assert_eq!(numeric_prefix("0007 - Y"), Some(7));
        assert_eq!(numeric_prefix("42"), Some(42));
        assert_eq!(numeric_prefix("PLOT 3"), None);
        assert_eq!(numeric_prefix(""), None);
    }
}
