use js_sys::{Array, Function, Object, Reflect, Uint32Array};
use mapdraw::{FeatureId, LatLng, LatLngBounds};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

pub fn new_obj() -> Object {
    Object::new()
}

pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice);
    arr
}

pub fn ids_to_js(ids: &[FeatureId]) -> JsValue {
    let raw: Vec<u32> = ids.iter().map(|id| id.0).collect();
    arr_u32(&raw).into()
}

/// `[lat, lng]`, the order Leaflet-style hosts expect.
pub fn latlng(p: LatLng) -> JsValue {
    let arr = Array::new();
    arr.push(&JsValue::from_f64(p.lat));
    arr.push(&JsValue::from_f64(p.lng));
    arr.into()
}

/// `[[south, west], [north, east]]`.
pub fn bounds(b: LatLngBounds) -> JsValue {
    let arr = Array::new();
    arr.push(&latlng(b.south_west));
    arr.push(&latlng(b.north_east));
    arr.into()
}

/// Plain objects only: maps become objects, not ES `Map`s.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// `undefined` and `null` give the type's default.
pub fn from_js_or_default<T: DeserializeOwned + Default>(v: JsValue) -> Result<T, serde_wasm_bindgen::Error> {
    if v.is_undefined() || v.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(v)
    }
}

/// Best-effort text for a thrown JS value.
pub fn describe(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{e:?}")
}

pub fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name)).ok()?.dyn_into::<Function>().ok()
}

/// Calls `target[name](...args)` with `target` as `this`.
pub fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f = method(target, name).ok_or_else(|| JsValue::from_str(&format!("host has no method `{name}`")))?;
    let list = Array::new();
    for a in args {
        list.push(a);
    }
    f.apply(target, &list)
}
