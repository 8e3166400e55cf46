use crate::error;
use crate::interop;
use crate::DrawingSession;
use mapdraw::boundaries::detector;
use mapdraw::{color, plots, BoundaryRegistry, DrawColor, DrawConfig, FeatureCollection, FeatureId, MapEvent, Shape};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `tracing` output to the browser console at `level` ("error" .. "trace").
#[wasm_bindgen]
pub fn init_logging(level: &str) -> JsValue {
    match crate::logging::init(level) {
        Ok(()) => error::ok(JsValue::from_bool(true)),
        Err(message) => error::err("logging", message, None),
    }
}

#[wasm_bindgen]
pub fn palette() -> JsValue {
    interop::to_js(&color::palette()).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn boundary_names() -> JsValue {
    interop::to_js(&BoundaryRegistry::default().names()).unwrap_or(JsValue::NULL)
}

/// First region, in declaration order, whose box holds the point.
#[wasm_bindgen]
pub fn detect_boundary_at(lat: f64, lng: f64) -> Option<String> {
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    detector::detect_from_point(&BoundaryRegistry::default(), lat, lng).map(str::to_string)
}

#[wasm_bindgen]
pub fn plot_records_res(collection: JsValue, base_code: u32) -> JsValue {
    let value: serde_json::Value = match serde_wasm_bindgen::from_value(collection) {
        Ok(v) => v,
        Err(e) => return error::invalid_input("collection", e.to_string()),
    };
    let fc = match FeatureCollection::from_json_value(value) {
        Ok(fc) => fc,
        Err(e) => return error::map_error(&e),
    };
    let records = plots::collection_to_records(&fc, base_code, &DrawConfig::default());
    match interop::to_js(&records) {
        Ok(v) => error::ok(v),
        Err(e) => error::err("serialize", e.to_string(), None),
    }
}

#[wasm_bindgen]
pub fn plot_collection_res(records: JsValue) -> JsValue {
    let records: Vec<plots::PlotRecord> = match serde_wasm_bindgen::from_value(records) {
        Ok(r) => r,
        Err(e) => return error::invalid_input("records", e.to_string()),
    };
    let fc = plots::records_to_collection(&records, &DrawConfig::default());
    match interop::to_js(&fc) {
        Ok(v) => error::ok(v),
        Err(e) => error::err("serialize", e.to_string(), None),
    }
}

#[derive(Deserialize)]
struct EditedShape {
    id: FeatureId,
    shape: Shape,
}

#[wasm_bindgen]
impl DrawingSession {
    /// `host` is the map adapter, `callbacks` an optional object of `on*`
    /// functions and `config` an optional camelCase session config.
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsValue, callbacks: JsValue, config: JsValue) -> Result<DrawingSession, JsValue> {
        let config = interop::from_js_or_default(config).map_err(|e| error::invalid_input("config", e.to_string()))?;
        Ok(DrawingSession::rs_new(host, &callbacks, config))
    }

    /// Every `now` argument is the host clock in milliseconds, e.g. `performance.now()`,
    /// the same clock `tick` receives and `next_deadline` reports in.
    pub fn mount(&mut self, now: f64) -> bool {
        now.is_finite() && self.inner.mount(now).is_ok()
    }
    pub fn mount_res(&mut self, now: f64) -> JsValue {
        if !now.is_finite() {
            return error::non_finite("now");
        }
        match self.inner.mount(now) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::map_error(&e),
        }
    }

    // Regions
    pub fn select_boundary(&mut self, id: &str, now: f64) -> bool {
        now.is_finite() && self.inner.select_boundary(id, now).unwrap_or(false)
    }
    pub fn select_boundary_res(&mut self, id: &str, now: f64) -> JsValue {
        if self.inner.is_destroyed() {
            return error::destroyed();
        }
        if !now.is_finite() {
            return error::non_finite("now");
        }
        match self.inner.select_boundary(id, now) {
            Ok(changed) => error::ok(JsValue::from_bool(changed)),
            Err(e) => error::map_error(&e),
        }
    }
    pub fn current_boundary(&self) -> Option<String> {
        self.rs_current_boundary()
    }
    pub fn is_transitioning(&self) -> bool {
        self.inner.boundary().phase() == mapdraw::Phase::Transitioning
    }
    pub fn selectable_boundaries(&self) -> JsValue {
        interop::to_js(&self.inner.selectable().names()).unwrap_or(JsValue::NULL)
    }
    pub fn detect_boundaries(&self) -> JsValue {
        interop::to_js(&self.inner.detect_boundaries()).unwrap_or(JsValue::NULL)
    }

    // Host events
    pub fn on_drag(&mut self) {
        self.inner.dispatch(MapEvent::Drag);
    }
    pub fn on_move_end(&mut self, now: f64) {
        if now.is_finite() {
            self.inner.dispatch(MapEvent::MoveEnd { at: now });
        }
    }
    pub fn on_created(&mut self, shape: JsValue) -> bool {
        !error::is_err(&self.on_created_res(shape))
    }
    pub fn on_created_res(&mut self, shape: JsValue) -> JsValue {
        let shape: Shape = match serde_wasm_bindgen::from_value(shape) {
            Ok(s) => s,
            Err(e) => return error::invalid_input("shape", e.to_string()),
        };
        let before = self.inner.draw().collection().len();
        self.inner.dispatch(MapEvent::Created { shape });
        error::ok(JsValue::from_bool(self.inner.draw().collection().len() > before))
    }
    pub fn on_edited_res(&mut self, edits: JsValue) -> JsValue {
        let edits: Vec<EditedShape> = match serde_wasm_bindgen::from_value(edits) {
            Ok(e) => e,
            Err(e) => return error::invalid_input("edits", e.to_string()),
        };
        let shapes = edits.into_iter().map(|e| (e.id, e.shape)).collect();
        self.inner.dispatch(MapEvent::Edited { shapes });
        error::ok(JsValue::from_bool(true))
    }
    pub fn on_deleted(&mut self, ids: Vec<u32>) {
        let ids = ids.into_iter().map(FeatureId).collect();
        self.inner.dispatch(MapEvent::Deleted { ids });
    }

    /// Runs continuations due at `now` (milliseconds on the host clock).
    pub fn tick(&mut self, now: f64) {
        if now.is_finite() {
            self.inner.tick(now);
        }
    }
    pub fn tick_res(&mut self, now: f64) -> JsValue {
        if !now.is_finite() {
            return error::non_finite("now");
        }
        self.inner.tick(now);
        error::ok(self.next_deadline().map_or(JsValue::NULL, JsValue::from_f64))
    }
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner.next_deadline()
    }

    // Search
    pub fn search(&mut self, query: &str) -> JsValue {
        interop::to_js(&self.inner.search(query)).unwrap_or(JsValue::NULL)
    }
    pub fn cycle(&mut self) -> Option<u32> {
        self.inner.cycle().map(|id| id.0)
    }

    // Drawing
    pub fn set_color(&mut self, color: JsValue) -> bool {
        !error::is_err(&self.set_color_res(color))
    }
    pub fn set_color_res(&mut self, color: JsValue) -> JsValue {
        let value: serde_json::Value = match serde_wasm_bindgen::from_value(color) {
            Ok(v) => v,
            Err(e) => return error::invalid_input("color", e.to_string()),
        };
        match DrawColor::from_value(&value) {
            Some(c) => {
                self.inner.set_color(c);
                error::ok(JsValue::from_bool(true))
            }
            None => error::invalid_input("color", "expected {id, name, hex, fillOpacity}"),
        }
    }
    pub fn clear(&mut self) -> u32 {
        self.inner.clear() as u32
    }
    pub fn feature_count(&self) -> u32 {
        self.inner.draw().collection().len() as u32
    }

    // GeoJSON
    pub fn export(&self) -> JsValue {
        interop::to_js(&self.inner.export()).unwrap_or(JsValue::NULL)
    }
    pub fn export_json(&self) -> String {
        self.inner.export().to_json_value().to_string()
    }
    pub fn import_res(&mut self, collection: JsValue, initial: bool) -> JsValue {
        let value: serde_json::Value = match serde_wasm_bindgen::from_value(collection) {
            Ok(v) => v,
            Err(e) => return error::invalid_input("collection", e.to_string()),
        };
        let fc = match FeatureCollection::from_json_value(value) {
            Ok(fc) => fc,
            Err(e) => return error::map_error(&e),
        };
        let report = self.inner.import(&fc, initial);
        error::ok(interop::to_js(&report).unwrap_or(JsValue::NULL))
    }
    pub fn import_json_res(&mut self, text: &str, initial: bool) -> JsValue {
        match self.inner.import_json(text, initial) {
            Ok(report) => error::ok(interop::to_js(&report).unwrap_or(JsValue::NULL)),
            Err(e) => error::map_error(&e),
        }
    }

    // Persistence
    pub fn save(&mut self) -> bool {
        self.inner.save()
    }
    pub fn load(&mut self) -> bool {
        self.inner.load()
    }
    pub fn clear_storage(&mut self) -> bool {
        self.inner.clear_storage()
    }
    pub fn has_stored_drawings(&self) -> bool {
        self.inner.has_stored_drawings()
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_destroyed()
    }
}
