//! Adapters from the JS host objects to the `mapdraw` seams.

use crate::interop::{self, describe};
use js_sys::{Function, Reflect};
use mapdraw::draw::config::DrawControl;
use mapdraw::surface::{ControlId, FlyOptions, ListenerId};
use mapdraw::{
    EventKind, FeatureId, GeoFeature, KeyValueStore, LatLng, LatLngBounds, MapListener, MapSurface, Shape,
    ShapeKind, ShapeStyle, StoreError, SurfaceError,
};
use wasm_bindgen::{JsCast, JsValue};

/// Map widget driven through a host adapter object.
///
/// The adapter exposes `isAlive`, `setView`, `flyTo`, `setMinZoom`,
/// `setMaxBounds`, `panInsideBounds`, `fitBounds`, `on`, `off`, `addLayer`,
/// `removeLayer`, `setStyle`, `bindLabel`, `addDrawControl` and
/// `removeDrawControl`. Coordinates travel as `[lat, lng]`.
pub struct JsSurface {
    host: JsValue,
}

impl JsSurface {
    pub fn new(host: JsValue) -> Self {
        JsSurface { host }
    }

    fn call(&self, op: &'static str, args: &[JsValue]) -> Result<JsValue, SurfaceError> {
        interop::call_method(&self.host, op, args).map_err(|e| SurfaceError::Call { op, message: describe(&e) })
    }

    fn call_unit(&self, op: &'static str, args: &[JsValue]) -> Result<(), SurfaceError> {
        self.call(op, args).map(drop)
    }

    fn serialize<T: serde::Serialize + ?Sized>(op: &'static str, v: &T) -> Result<JsValue, SurfaceError> {
        interop::to_js(v).map_err(|e| SurfaceError::Call { op, message: e.to_string() })
    }

    fn numeric_id(op: &'static str, v: JsValue) -> Result<u32, SurfaceError> {
        match v.as_f64() {
            Some(n) if n.is_finite() && n >= 0.0 => Ok(n as u32),
            _ => Err(SurfaceError::Call { op, message: "host returned a non-numeric id".into() }),
        }
    }
}

fn id(f: FeatureId) -> JsValue {
    JsValue::from_f64(f64::from(f.0))
}

impl MapSurface for JsSurface {
    fn is_alive(&self) -> bool {
        self.call("isAlive", &[]).is_ok_and(|v| v.as_bool().unwrap_or(false))
    }

    fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool) -> Result<(), SurfaceError> {
        self.call_unit("setView", &[interop::latlng(center), zoom.into(), animate.into()])
    }

    fn fly_to(&mut self, center: LatLng, zoom: f64, opts: FlyOptions) -> Result<(), SurfaceError> {
        let o = interop::new_obj();
        interop::set_kv(&o, "duration", &opts.duration_secs.into());
        interop::set_kv(&o, "easeLinearity", &opts.ease_linearity.into());
        self.call_unit("flyTo", &[interop::latlng(center), zoom.into(), o.into()])
    }

    fn set_min_zoom(&mut self, zoom: f64) -> Result<(), SurfaceError> {
        self.call_unit("setMinZoom", &[zoom.into()])
    }

    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) -> Result<(), SurfaceError> {
        let arg = bounds.map_or(JsValue::NULL, interop::bounds);
        self.call_unit("setMaxBounds", &[arg])
    }

    fn pan_inside_bounds(&mut self, bounds: LatLngBounds, animate: bool) -> Result<(), SurfaceError> {
        self.call_unit("panInsideBounds", &[interop::bounds(bounds), animate.into()])
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f64) -> Result<(), SurfaceError> {
        self.call_unit("fitBounds", &[interop::bounds(bounds), padding.into()])
    }

    fn subscribe(&mut self, kind: EventKind) -> Result<ListenerId, SurfaceError> {
        let v = self.call("on", &[JsValue::from_str(kind.as_str())])?;
        Self::numeric_id("on", v).map(ListenerId)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> Result<(), SurfaceError> {
        self.call_unit("off", &[JsValue::from_f64(f64::from(id.0))])
    }

    fn add_layer(&mut self, fid: FeatureId, shape: &Shape, style: &ShapeStyle) -> Result<(), SurfaceError> {
        let shape = Self::serialize("addLayer", shape)?;
        let style = Self::serialize("addLayer", style)?;
        self.call_unit("addLayer", &[id(fid), shape, style])
    }

    fn remove_layer(&mut self, fid: FeatureId) -> Result<(), SurfaceError> {
        self.call_unit("removeLayer", &[id(fid)])
    }

    fn set_style(&mut self, fid: FeatureId, style: &ShapeStyle) -> Result<(), SurfaceError> {
        let style = Self::serialize("setStyle", style)?;
        self.call_unit("setStyle", &[id(fid), style])
    }

    fn bind_label(&mut self, fid: FeatureId, html: &str) -> Result<(), SurfaceError> {
        self.call_unit("bindLabel", &[id(fid), JsValue::from_str(html)])
    }

    fn add_draw_control(&mut self, control: &DrawControl) -> Result<ControlId, SurfaceError> {
        let control = Self::serialize("addDrawControl", control)?;
        let v = self.call("addDrawControl", &[control])?;
        Self::numeric_id("addDrawControl", v).map(ControlId)
    }

    fn remove_draw_control(&mut self, cid: ControlId) -> Result<(), SurfaceError> {
        self.call_unit("removeDrawControl", &[JsValue::from_f64(f64::from(cid.0))])
    }
}

/// Optional UI callbacks read once from a plain object.
#[derive(Default)]
pub struct JsCallbacks {
    shape_created: Option<Function>,
    shape_edited: Option<Function>,
    shape_deleted: Option<Function>,
    loading_start: Option<Function>,
    tiles_loaded: Option<Function>,
    boundary_changed: Option<Function>,
}

impl JsCallbacks {
    pub fn from_object(obj: &JsValue) -> Self {
        if obj.is_undefined() || obj.is_null() {
            return JsCallbacks::default();
        }
        let get = |name: &str| {
            Reflect::get(obj, &JsValue::from_str(name)).ok().and_then(|v| v.dyn_into::<Function>().ok())
        };
        JsCallbacks {
            shape_created: get("onShapeCreated"),
            shape_edited: get("onShapeEdited"),
            shape_deleted: get("onShapeDeleted"),
            loading_start: get("onLoadingStart"),
            tiles_loaded: get("onTilesLoaded"),
            boundary_changed: get("onBoundaryChanged"),
        }
    }
}

/// A throwing callback is logged and otherwise ignored.
fn invoke(name: &'static str, f: Option<&Function>, args: &[JsValue]) {
    let Some(f) = f else { return };
    let list = js_sys::Array::new();
    for a in args {
        list.push(a);
    }
    if let Err(e) = f.apply(&JsValue::NULL, &list) {
        tracing::warn!(callback = name, error = %describe(&e), "host callback threw");
    }
}

impl MapListener for JsCallbacks {
    fn on_shape_created(&mut self, kind: ShapeKind, fid: FeatureId, feature: &GeoFeature) {
        let feature = interop::to_js(feature).unwrap_or(JsValue::NULL);
        invoke("onShapeCreated", self.shape_created.as_ref(), &[JsValue::from_str(kind.as_str()), id(fid), feature]);
    }

    fn on_shape_edited(&mut self, ids: &[FeatureId]) {
        invoke("onShapeEdited", self.shape_edited.as_ref(), &[interop::ids_to_js(ids)]);
    }

    fn on_shape_deleted(&mut self, ids: &[FeatureId]) {
        invoke("onShapeDeleted", self.shape_deleted.as_ref(), &[interop::ids_to_js(ids)]);
    }

    fn on_loading_start(&mut self) {
        invoke("onLoadingStart", self.loading_start.as_ref(), &[]);
    }

    fn on_tiles_loaded(&mut self) {
        invoke("onTilesLoaded", self.tiles_loaded.as_ref(), &[]);
    }

    fn on_boundary_changed(&mut self, boundary: &str) {
        invoke("onBoundaryChanged", self.boundary_changed.as_ref(), &[JsValue::from_str(boundary)]);
    }
}

/// `window.localStorage`, resolved on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
    window
        .local_storage()
        .map_err(|e| StoreError::Unavailable(describe(&e)))?
        .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".into()))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| StoreError::Backend { op: "get", message: describe(&e) })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Backend { op: "set", message: describe(&e) })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Backend { op: "remove", message: describe(&e) })
    }
}
