use super::registry::BoundaryDefinition;
use crate::config::{CompletionMode, TransitionConfig};
use crate::listener::MapListener;
use crate::model::LatLngBounds;
use crate::surface::{absorb, EventKind, FlyOptions, ListenerId, MapSurface};
use crate::timers::TimerQueue;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Viewport reached the region; containment goes back on.
    Arrived,
    TilesLoaded,
}

#[derive(Clone, Copy, Debug)]
struct Containment {
    bounds: LatLngBounds,
    listener: Option<ListenerId>,
}

/// Drives viewport transitions between regions and keeps panning inside the active one.
///
/// At most one transition is in flight: starting a new one clears every
/// pending step of the previous.
#[derive(Debug)]
pub struct BoundaryManager {
    config: TransitionConfig,
    current: Option<BoundaryDefinition>,
    phase: Phase,
    timers: TimerQueue<Step>,
    containment: Option<Containment>,
    move_end: Option<ListenerId>,
    destroyed: bool,
}

impl BoundaryManager {
    pub fn new(config: TransitionConfig) -> Self {
        BoundaryManager {
            config,
            current: None,
            phase: Phase::Idle,
            timers: TimerQueue::new(),
            containment: None,
            move_end: None,
            destroyed: false,
        }
    }

    fn live<S: MapSurface + ?Sized>(&self, surface: &S) -> bool {
        !self.destroyed && surface.is_alive()
    }

    pub fn current(&self) -> Option<&BoundaryDefinition> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Earliest pending continuation in host-clock milliseconds, for hosts that schedule real timers.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_due()
    }

    pub fn change_boundary<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        listener: &mut dyn MapListener,
        def: &BoundaryDefinition,
        animate: bool,
        now: f64,
    ) {
        if !self.live(surface) {
            return;
        }
        self.timers.clear();
        self.timers.settle(now);
        self.drop_move_end(surface);
        listener.on_loading_start();
        self.detach_containment(surface);

        self.current = Some(def.clone());
        self.phase = Phase::Transitioning;
        listener.on_boundary_changed(def.id);
        absorb("setMinZoom", surface.set_min_zoom(def.min_zoom));

        if animate {
            let opts = FlyOptions {
                duration_secs: self.config.fly_duration_ms / 1000.0,
                ease_linearity: self.config.ease_linearity,
            };
            absorb("flyTo", surface.fly_to(def.center, def.default_zoom, opts));
            if self.config.completion == CompletionMode::MoveEnd {
                self.move_end = absorb("subscribe", surface.subscribe(EventKind::MoveEnd));
            }
        } else {
            absorb("setView", surface.set_view(def.center, def.default_zoom, false));
        }
        self.timers.schedule(self.config.arrival_delay_ms(animate), Step::Arrived);
        debug!(boundary = def.id, animate, "boundary transition started");
    }

    /// Runs every continuation due at or before `now`.
    pub fn advance<S: MapSurface + ?Sized>(&mut self, surface: &mut S, listener: &mut dyn MapListener, now: f64) {
        while let Some(step) = self.timers.pop_due(now) {
            self.run(surface, listener, step);
        }
        self.timers.settle(now);
    }

    fn run<S: MapSurface + ?Sized>(&mut self, surface: &mut S, listener: &mut dyn MapListener, step: Step) {
        if !self.live(surface) {
            return;
        }
        match step {
            Step::Arrived => {
                self.drop_move_end(surface);
                if let Some(def) = self.current.as_ref() {
                    let bounds = def.bounds;
                    self.attach_containment(surface, bounds);
                }
                self.timers.schedule(self.config.tiles_loaded_ms, Step::TilesLoaded);
            }
            Step::TilesLoaded => {
                self.phase = Phase::Idle;
                debug!(boundary = self.current.as_ref().map(|d| d.id), "boundary settled");
                listener.on_tiles_loaded();
            }
        }
    }

    /// First `moveend` after a fly completes the arrival early.
    pub fn handle_move_end<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        listener: &mut dyn MapListener,
        now: f64,
    ) {
        if self.move_end.is_none() || !self.live(surface) {
            return;
        }
        self.timers.clear();
        self.timers.settle(now);
        self.run(surface, listener, Step::Arrived);
    }

    /// Clamps the viewport back inside the active region without animation.
    pub fn handle_drag<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(c) = self.containment else { return };
        if !self.live(surface) {
            return;
        }
        absorb("panInsideBounds", surface.pan_inside_bounds(c.bounds, false));
    }

    pub fn containment_bounds(&self) -> Option<LatLngBounds> {
        self.containment.map(|c| c.bounds)
    }

    fn attach_containment<S: MapSurface + ?Sized>(&mut self, surface: &mut S, bounds: LatLngBounds) {
        absorb("setMaxBounds", surface.set_max_bounds(Some(bounds)));
        let listener = absorb("subscribe", surface.subscribe(EventKind::Drag));
        self.containment = Some(Containment { bounds, listener });
    }

    fn detach_containment<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(Containment { listener: Some(id), .. }) = self.containment.take() {
            absorb("unsubscribe", surface.unsubscribe(id));
        }
        absorb("setMaxBounds", surface.set_max_bounds(None));
    }

    fn drop_move_end<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(id) = self.move_end.take() {
            absorb("unsubscribe", surface.unsubscribe(id));
        }
    }

    /// Cancels pending steps and detaches listeners. Later calls are no-ops.
    pub fn destroy<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.timers.clear();
        let containment = self.containment.take();
        let move_end = self.move_end.take();
        self.current = None;
        self.phase = Phase::Idle;
        if !surface.is_alive() {
            return;
        }
        if let Some(Containment { listener: Some(id), .. }) = containment {
            absorb("unsubscribe", surface.unsubscribe(id));
        }
        if let Some(id) = move_end {
            absorb("unsubscribe", surface.unsubscribe(id));
        }
    }
}
