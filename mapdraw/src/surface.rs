//! Rendering surface contract.
//!
//! The map widget is owned by the host. Managers receive it by reference and
//! probe [`MapSurface::is_alive`] before every mutation.

use crate::color::ShapeStyle;
use crate::draw::config::DrawControl;
use crate::error::SurfaceError;
use crate::geometry::tolerance;
use crate::model::{FeatureId, LatLng, LatLngBounds, Shape};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "drag")]
    Drag,
    #[serde(rename = "moveend")]
    MoveEnd,
    #[serde(rename = "draw:created")]
    Created,
    #[serde(rename = "draw:edited")]
    Edited,
    #[serde(rename = "draw:deleted")]
    Deleted,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Drag => "drag",
            EventKind::MoveEnd => "moveend",
            EventKind::Created => "draw:created",
            EventKind::Edited => "draw:edited",
            EventKind::Deleted => "draw:deleted",
        }
    }

    pub fn parse(s: &str) -> Option<EventKind> {
        match s {
            "drag" => Some(EventKind::Drag),
            "moveend" => Some(EventKind::MoveEnd),
            "draw:created" => Some(EventKind::Created),
            "draw:edited" => Some(EventKind::Edited),
            "draw:deleted" => Some(EventKind::Deleted),
            _ => None,
        }
    }
}

/// Event delivered by the host, in issuance order.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    Drag,
    /// `at` is the host clock in milliseconds when the move settled.
    MoveEnd { at: f64 },
    Created { shape: Shape },
    Edited { shapes: Vec<(FeatureId, Shape)> },
    Deleted { ids: Vec<FeatureId> },
}

impl MapEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::Drag => EventKind::Drag,
            MapEvent::MoveEnd { .. } => EventKind::MoveEnd,
            MapEvent::Created { .. } => EventKind::Created,
            MapEvent::Edited { .. } => EventKind::Edited,
            MapEvent::Deleted { .. } => EventKind::Deleted,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyOptions {
    pub duration_secs: f64,
    pub ease_linearity: f64,
}

pub trait MapSurface {
    /// Liveness probe; false once the host widget has been torn down.
    fn is_alive(&self) -> bool;

    fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool) -> Result<(), SurfaceError>;
    fn fly_to(&mut self, center: LatLng, zoom: f64, opts: FlyOptions) -> Result<(), SurfaceError>;
    fn set_min_zoom(&mut self, zoom: f64) -> Result<(), SurfaceError>;
    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) -> Result<(), SurfaceError>;
    fn pan_inside_bounds(&mut self, bounds: LatLngBounds, animate: bool) -> Result<(), SurfaceError>;
    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f64) -> Result<(), SurfaceError>;

    fn subscribe(&mut self, kind: EventKind) -> Result<ListenerId, SurfaceError>;
    fn unsubscribe(&mut self, id: ListenerId) -> Result<(), SurfaceError>;

    fn add_layer(&mut self, id: FeatureId, shape: &Shape, style: &ShapeStyle) -> Result<(), SurfaceError>;
    fn remove_layer(&mut self, id: FeatureId) -> Result<(), SurfaceError>;
    fn set_style(&mut self, id: FeatureId, style: &ShapeStyle) -> Result<(), SurfaceError>;
    fn bind_label(&mut self, id: FeatureId, html: &str) -> Result<(), SurfaceError>;

    fn add_draw_control(&mut self, control: &DrawControl) -> Result<ControlId, SurfaceError>;
    fn remove_draw_control(&mut self, id: ControlId) -> Result<(), SurfaceError>;
}

/// Logs a rejected surface call and carries on; guards never raise surface failures.
pub(crate) fn absorb<T>(op: &'static str, r: Result<T, SurfaceError>) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(op, error = %e, "surface call failed");
            None
        }
    }
}

/// Every mutating call the headless surface received, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    SetView { center: LatLng, zoom: f64, animate: bool },
    FlyTo { center: LatLng, zoom: f64 },
    SetMinZoom(f64),
    SetMaxBounds(Option<LatLngBounds>),
    PanInsideBounds(LatLngBounds),
    FitBounds { bounds: LatLngBounds, padding: f64 },
    Subscribe(EventKind),
    Unsubscribe(ListenerId),
    AddLayer(FeatureId),
    RemoveLayer(FeatureId),
    SetStyle(FeatureId),
    BindLabel(FeatureId),
    AddControl,
    RemoveControl(ControlId),
}

/// In-memory surface with a simple equirectangular viewport model.
///
/// Used by tests and by hosts without a real map widget. A viewport at zoom
/// `z` spans `360 * width / (256 * 2^z)` degrees of longitude and the same
/// degrees-per-pixel vertically.
#[derive(Debug)]
pub struct HeadlessSurface {
    alive: bool,
    width: f64,
    height: f64,
    center: LatLng,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    max_bounds: Option<LatLngBounds>,
    next_listener: u32,
    listeners: BTreeMap<ListenerId, EventKind>,
    next_control: u32,
    controls: BTreeMap<ControlId, DrawControl>,
    layers: BTreeMap<FeatureId, (Shape, ShapeStyle)>,
    labels: BTreeMap<FeatureId, String>,
    calls: Vec<SurfaceCall>,
    probes: Cell<usize>,
    reject_controls: bool,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        HeadlessSurface::new(800.0, 600.0)
    }
}

impl HeadlessSurface {
    pub fn new(width: f64, height: f64) -> Self {
        HeadlessSurface {
            alive: true,
            width: width.max(1.0),
            height: height.max(1.0),
            center: LatLng::new(0.0, 0.0),
            zoom: 0.0,
            min_zoom: 0.0,
            max_zoom: 18.0,
            max_bounds: None,
            next_listener: 1,
            listeners: BTreeMap::new(),
            next_control: 1,
            controls: BTreeMap::new(),
            layers: BTreeMap::new(),
            labels: BTreeMap::new(),
            calls: Vec::new(),
            probes: Cell::new(0),
            reject_controls: false,
        }
    }

    /// Simulates the host tearing the widget down.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Makes every draw-control call fail, as a broken toolbar plugin would.
    pub fn reject_controls(&mut self, reject: bool) {
        self.reject_controls = reject;
    }

    /// Moves the center as a user drag would. The host dispatches `MapEvent::Drag` afterwards.
    pub fn drag_by(&mut self, dlat: f64, dlng: f64) {
        self.center = LatLng::new(
            tolerance::clamp(self.center.lat + dlat, -90.0, 90.0),
            tolerance::clamp(self.center.lng + dlng, -180.0, 180.0),
        );
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_bounds(&self) -> Option<LatLngBounds> {
        self.max_bounds
    }

    pub fn viewport_bounds(&self) -> LatLngBounds {
        let (half_lat, half_lng) = self.half_spans(self.zoom);
        LatLngBounds::new(
            LatLng::new(self.center.lat - half_lat, self.center.lng - half_lng),
            LatLng::new(self.center.lat + half_lat, self.center.lng + half_lng),
        )
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of liveness probes received so far.
    pub fn probe_count(&self) -> usize {
        self.probes.get()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_style(&self, id: FeatureId) -> Option<&ShapeStyle> {
        self.layers.get(&id).map(|(_, style)| style)
    }

    pub fn layer_shape(&self, id: FeatureId) -> Option<&Shape> {
        self.layers.get(&id).map(|(shape, _)| shape)
    }

    pub fn label(&self, id: FeatureId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn controls(&self) -> impl Iterator<Item = &DrawControl> {
        self.controls.values()
    }

    fn half_spans(&self, zoom: f64) -> (f64, f64) {
        let deg_per_px = 360.0 / (256.0 * zoom.exp2());
        (0.5 * deg_per_px * self.height, 0.5 * deg_per_px * self.width)
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        tolerance::clamp(zoom, self.min_zoom, self.max_zoom.max(self.min_zoom))
    }

    fn guard(&self) -> Result<(), SurfaceError> {
        if self.alive {
            Ok(())
        } else {
            Err(SurfaceError::Detached)
        }
    }

    fn contain(&mut self, bounds: LatLngBounds) {
        let (half_lat, half_lng) = self.half_spans(self.zoom);
        let axis = |c: f64, lo: f64, hi: f64, half: f64| {
            if hi - lo <= 2.0 * half {
                0.5 * (lo + hi)
            } else {
                tolerance::clamp(c, lo + half, hi - half)
            }
        };
        self.center = LatLng::new(
            axis(self.center.lat, bounds.south_west.lat, bounds.north_east.lat, half_lat),
            axis(self.center.lng, bounds.south_west.lng, bounds.north_east.lng, half_lng),
        );
    }
}

impl MapSurface for HeadlessSurface {
    fn is_alive(&self) -> bool {
        self.probes.set(self.probes.get() + 1);
        self.alive
    }

    fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::SetView { center, zoom, animate });
        self.center = center;
        self.zoom = self.clamp_zoom(zoom);
        if let Some(b) = self.max_bounds {
            self.contain(b);
        }
        Ok(())
    }

    fn fly_to(&mut self, center: LatLng, zoom: f64, _opts: FlyOptions) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::FlyTo { center, zoom });
        self.center = center;
        self.zoom = self.clamp_zoom(zoom);
        Ok(())
    }

    fn set_min_zoom(&mut self, zoom: f64) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::SetMinZoom(zoom));
        self.min_zoom = zoom;
        self.zoom = self.clamp_zoom(self.zoom);
        Ok(())
    }

    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::SetMaxBounds(bounds));
        self.max_bounds = bounds;
        if let Some(b) = bounds {
            self.contain(b);
        }
        Ok(())
    }

    fn pan_inside_bounds(&mut self, bounds: LatLngBounds, _animate: bool) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::PanInsideBounds(bounds));
        self.contain(bounds);
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f64) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::FitBounds { bounds, padding });
        let usable_w = (self.width - 2.0 * padding).max(1.0);
        let usable_h = (self.height - 2.0 * padding).max(1.0);
        let fit = |px: f64, span: f64| {
            if span <= tolerance::EPS_COORD {
                f64::INFINITY
            } else {
                (360.0 * px / (256.0 * span)).log2()
            }
        };
        let zoom = fit(usable_w, bounds.lng_span()).min(fit(usable_h, bounds.lat_span()));
        self.center = bounds.center();
        self.zoom = self.clamp_zoom(if zoom.is_finite() { zoom.floor() } else { self.max_zoom });
        Ok(())
    }

    fn subscribe(&mut self, kind: EventKind) -> Result<ListenerId, SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::Subscribe(kind));
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, kind);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::Unsubscribe(id));
        self.listeners.remove(&id);
        Ok(())
    }

    fn add_layer(&mut self, id: FeatureId, shape: &Shape, style: &ShapeStyle) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::AddLayer(id));
        self.layers.insert(id, (shape.clone(), style.clone()));
        Ok(())
    }

    fn remove_layer(&mut self, id: FeatureId) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::RemoveLayer(id));
        self.layers.remove(&id);
        self.labels.remove(&id);
        Ok(())
    }

    fn set_style(&mut self, id: FeatureId, style: &ShapeStyle) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::SetStyle(id));
        if let Some(entry) = self.layers.get_mut(&id) {
            entry.1 = style.clone();
        }
        Ok(())
    }

    fn bind_label(&mut self, id: FeatureId, html: &str) -> Result<(), SurfaceError> {
        self.guard()?;
        self.calls.push(SurfaceCall::BindLabel(id));
        self.labels.insert(id, html.to_string());
        Ok(())
    }

    fn add_draw_control(&mut self, control: &DrawControl) -> Result<ControlId, SurfaceError> {
        self.guard()?;
        if self.reject_controls {
            return Err(SurfaceError::Call { op: "addControl", message: "toolbar unavailable".into() });
        }
        self.calls.push(SurfaceCall::AddControl);
        let id = ControlId(self.next_control);
        self.next_control += 1;
        self.controls.insert(id, control.clone());
        Ok(id)
    }

    fn remove_draw_control(&mut self, id: ControlId) -> Result<(), SurfaceError> {
        self.guard()?;
        if self.reject_controls {
            return Err(SurfaceError::Call { op: "removeControl", message: "toolbar unavailable".into() });
        }
        self.calls.push(SurfaceCall::RemoveControl(id));
        self.controls.remove(&id);
        Ok(())
    }
}
