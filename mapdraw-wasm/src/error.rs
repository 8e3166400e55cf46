use crate::interop::{new_obj, set_kv};
use js_sys::Reflect;
use mapdraw::MapError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// True for an `{ ok: false }` result object.
pub fn is_err(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok")).ok().and_then(|x| x.as_bool()) == Some(false)
}

pub fn map_error(e: &MapError) -> JsValue {
    let data = match e {
        MapError::UnknownBoundary(id) | MapError::BoundaryNotAllowed(id) => {
            let d = new_obj();
            set_kv(&d, "id", &JsValue::from_str(id));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_input(param: &str, message: impl Into<String>) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_input", message, Some(d.into()))
}

#[inline]
pub fn destroyed() -> JsValue {
    err("destroyed", "session has been destroyed", None)
}
