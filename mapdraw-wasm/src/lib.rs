use wasm_bindgen::prelude::*;
mod api;
pub mod error;
pub mod host;
mod interop;
mod logging;

pub use api::{
    boundary_names, detect_boundary_at, init_logging, palette, plot_collection_res, plot_records_res,
    set_panic_hook,
};
use host::{JsCallbacks, JsSurface, LocalStorage};
use mapdraw::{DrawingStore, MapSession, SessionConfig};

#[wasm_bindgen]
pub struct DrawingSession {
    pub(crate) inner: MapSession<JsSurface, JsCallbacks>,
}

impl DrawingSession {
    pub fn rs_new(host: JsValue, callbacks: &JsValue, config: SessionConfig) -> DrawingSession {
        let inner = MapSession::new(JsSurface::new(host), JsCallbacks::from_object(callbacks), config)
            .with_store(DrawingStore::new(LocalStorage));
        DrawingSession { inner }
    }

    pub fn rs_current_boundary(&self) -> Option<String> {
        self.inner.current_boundary().map(|d| d.id.to_string())
    }
}
