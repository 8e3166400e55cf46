use crate::boundaries::detector;
use crate::boundaries::manager::{BoundaryManager, Phase};
use crate::boundaries::registry::{BoundaryDefinition, BoundaryRegistry};
use crate::color::DrawColor;
use crate::config::{MapConfig, SessionConfig};
use crate::draw::manager::{DrawManager, ImportReport};
use crate::error::{MapError, Result};
use crate::geojson::FeatureCollection;
use crate::listener::{MapListener, NoopListener};
use crate::model::FeatureId;
use crate::search::{SearchEngine, SearchState};
use crate::storage::DrawingStore;
use crate::surface::{absorb, EventKind, ListenerId, MapEvent, MapSurface};
use tracing::{debug, info, warn};

/// Wires user actions and surface events to the managers for one mounted map.
#[derive(Debug)]
pub struct MapSession<S: MapSurface, L: MapListener = NoopListener> {
    surface: S,
    listener: L,
    map: MapConfig,
    registry: BoundaryRegistry,
    draw: DrawManager,
    boundary: BoundaryManager,
    search: SearchEngine,
    query: String,
    refocus_pending: bool,
    store: Option<DrawingStore>,
    drag: Option<ListenerId>,
    destroyed: bool,
}

impl<S: MapSurface> MapSession<S, NoopListener> {
    pub fn headless(surface: S, config: SessionConfig) -> Self {
        MapSession::new(surface, NoopListener, config)
    }
}

impl<S: MapSurface, L: MapListener> MapSession<S, L> {
    pub fn new(surface: S, listener: L, config: SessionConfig) -> Self {
        let SessionConfig { map, transition, draw, search } = config;
        let registry = BoundaryRegistry::brazil(map.min_zoom);
        let search = SearchEngine::new(search, &draw.name_key);
        MapSession {
            surface,
            listener,
            registry,
            draw: DrawManager::new(draw),
            boundary: BoundaryManager::new(transition),
            search,
            map,
            query: String::new(),
            refocus_pending: false,
            store: None,
            drag: None,
            destroyed: false,
        }
    }

    pub fn with_store(mut self, store: DrawingStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_registry(mut self, registry: BoundaryRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn draw(&self) -> &DrawManager {
        &self.draw
    }

    pub fn boundary(&self) -> &BoundaryManager {
        &self.boundary
    }

    pub fn current_boundary(&self) -> Option<&BoundaryDefinition> {
        self.boundary.current()
    }

    pub fn search_state(&self) -> &SearchState {
        self.search.state()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Regions the user may select, in registry order.
    pub fn selectable(&self) -> BoundaryRegistry {
        self.registry.clone().restricted_to(self.map.allowed_boundaries.as_deref())
    }

    fn live(&self) -> bool {
        !self.destroyed && self.surface.is_alive()
    }

    /// Initial view, country limits, drag tracking, drawing toolbar and initial region.
    ///
    /// `now` is the host clock in milliseconds, the same clock later passed to [`MapSession::tick`].
    pub fn mount(&mut self, now: f64) -> Result<()> {
        if !self.live() {
            return Ok(());
        }
        let m = &self.map;
        absorb("setMinZoom", self.surface.set_min_zoom(m.min_zoom));
        absorb("setView", self.surface.set_view(m.default_center, m.default_zoom, false));
        absorb("setMaxBounds", self.surface.set_max_bounds(Some(m.country_bounds)));
        self.drag = absorb("subscribe", self.surface.subscribe(EventKind::Drag));
        self.draw.mount(&mut self.surface);
        info!(boundaries = self.registry.len(), "map session mounted");
        if let Some(id) = self.map.initial_boundary.clone() {
            self.select_boundary(&id, now)?;
        }
        Ok(())
    }

    /// Handles one surface event to completion.
    pub fn dispatch(&mut self, event: MapEvent) {
        if self.destroyed {
            return;
        }
        match event {
            MapEvent::Drag => {
                if self.drag.is_some() && self.surface.is_alive() {
                    absorb("panInsideBounds", self.surface.pan_inside_bounds(self.map.country_bounds, false));
                }
                self.boundary.handle_drag(&mut self.surface);
            }
            MapEvent::MoveEnd { at } => self.boundary.handle_move_end(&mut self.surface, &mut self.listener, at),
            MapEvent::Created { shape } => {
                if self.draw.create(&mut self.surface, &mut self.listener, shape).is_some() {
                    self.refresh_search();
                }
            }
            MapEvent::Edited { shapes } => {
                if !self.draw.edit(&mut self.surface, &mut self.listener, shapes).is_empty() {
                    self.refresh_search();
                }
            }
            MapEvent::Deleted { ids } => {
                if !self.draw.delete(&mut self.surface, &mut self.listener, &ids).is_empty() {
                    self.refresh_search();
                }
            }
        }
    }

    /// Runs scheduled continuations due at or before `now` (milliseconds).
    pub fn tick(&mut self, now: f64) {
        if self.destroyed {
            return;
        }
        self.boundary.advance(&mut self.surface, &mut self.listener, now);
        if self.refocus_pending && self.boundary.phase() == Phase::Idle {
            self.refocus_pending = false;
            self.search.focus_current(&mut self.surface, self.draw.collection());
        }
    }

    /// Absolute host-clock time of the next continuation, for hosts that arm real timers.
    pub fn next_deadline(&self) -> Option<f64> {
        self.boundary.next_deadline()
    }

    /// Makes `id` the active region. Returns `Ok(false)` when nothing changed.
    ///
    /// The first selection jumps; later ones animate. `now` is the host clock in milliseconds.
    pub fn select_boundary(&mut self, id: &str, now: f64) -> Result<bool> {
        if !self.live() {
            return Ok(false);
        }
        let Some(def) = self.registry.get(id).cloned() else {
            warn!(boundary = id, "unknown boundary");
            return Err(MapError::UnknownBoundary(id.to_string()));
        };
        if let Some(allowed) = self.map.allowed_boundaries.as_ref() {
            if !allowed.iter().any(|a| a == id) {
                warn!(boundary = id, "boundary not allowed");
                return Err(MapError::BoundaryNotAllowed(id.to_string()));
            }
        }
        let previous = self.boundary.current().map(|d| d.id);
        if previous == Some(def.id) {
            return Ok(false);
        }
        let animate = previous.is_some();
        self.boundary.change_boundary(&mut self.surface, &mut self.listener, &def, animate, now);
        self.refresh_search();
        Ok(true)
    }

    pub fn search(&mut self, query: &str) -> SearchState {
        if self.destroyed {
            return SearchState::default();
        }
        self.query = query.to_string();
        self.refocus_pending = false;
        self.search
            .search(&mut self.surface, &self.query, self.draw.collection(), self.boundary.current())
            .clone()
    }

    /// Re-runs a held query after the collection or the region changed.
    ///
    /// While a region transition is in flight the refocus waits for it to settle,
    /// so the fly is not cut short.
    fn refresh_search(&mut self) {
        if self.query.trim().is_empty() {
            return;
        }
        debug!(query = %self.query, "re-running search");
        self.search
            .restyle(&mut self.surface, &self.query, self.draw.collection(), self.boundary.current());
        if self.boundary.phase() == Phase::Transitioning {
            self.refocus_pending = true;
        } else {
            self.refocus_pending = false;
            self.search.focus_current(&mut self.surface, self.draw.collection());
        }
    }

    pub fn cycle(&mut self) -> Option<FeatureId> {
        if self.destroyed {
            return None;
        }
        self.search.cycle(&mut self.surface, self.draw.collection())
    }

    pub fn set_color(&mut self, color: DrawColor) {
        self.draw.set_color(&mut self.surface, color);
    }

    pub fn clear(&mut self) -> usize {
        let n = self.draw.clear(&mut self.surface);
        if n > 0 {
            self.refresh_search();
        }
        n
    }

    pub fn export(&self) -> FeatureCollection {
        self.draw.export()
    }

    pub fn import(&mut self, fc: &FeatureCollection, initial: bool) -> ImportReport {
        let report = self.draw.import(&mut self.surface, fc, initial);
        self.refresh_search();
        report
    }

    pub fn import_json(&mut self, text: &str, initial: bool) -> Result<ImportReport> {
        let fc = FeatureCollection::from_json_str(text)?;
        Ok(self.import(&fc, initial))
    }

    /// Regions touched by any drawn coordinate.
    pub fn detect_boundaries(&self) -> Vec<&'static str> {
        detector::detect_all(&self.registry, &self.draw.export())
    }

    pub fn save(&mut self) -> bool {
        let fc = self.draw.export();
        match self.store.as_mut() {
            Some(store) => store.save(&fc),
            None => false,
        }
    }

    /// Restores saved drawings as editable features.
    pub fn load(&mut self) -> bool {
        let Some(fc) = self.store.as_ref().and_then(DrawingStore::load) else {
            return false;
        };
        if !self.live() {
            return false;
        }
        self.import(&fc, false);
        true
    }

    pub fn clear_storage(&mut self) -> bool {
        self.store.as_mut().is_some_and(DrawingStore::clear)
    }

    pub fn has_stored_drawings(&self) -> bool {
        self.store.as_ref().is_some_and(DrawingStore::has_stored)
    }

    /// Tears down managers and listeners. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.boundary.destroy(&mut self.surface);
        self.draw.destroy(&mut self.surface);
        if let Some(id) = self.drag.take() {
            if self.surface.is_alive() {
                absorb("unsubscribe", self.surface.unsubscribe(id));
            }
        }
        self.search.reset();
        self.query.clear();
        self.refocus_pending = false;
        debug!("map session destroyed");
    }
}
