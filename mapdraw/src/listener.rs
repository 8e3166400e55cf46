use crate::geojson::GeoFeature;
use crate::model::{FeatureId, ShapeKind};

/// Callbacks produced for the host UI. Every method defaults to a no-op.
pub trait MapListener {
    fn on_shape_created(&mut self, _kind: ShapeKind, _id: FeatureId, _feature: &GeoFeature) {}
    fn on_shape_edited(&mut self, _ids: &[FeatureId]) {}
    fn on_shape_deleted(&mut self, _ids: &[FeatureId]) {}
    fn on_loading_start(&mut self) {}
    fn on_tiles_loaded(&mut self) {}
    fn on_boundary_changed(&mut self, _id: &str) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl MapListener for NoopListener {}

/// Callback record, in firing order.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    ShapeCreated(ShapeKind, FeatureId),
    ShapeEdited(Vec<FeatureId>),
    ShapeDeleted(Vec<FeatureId>),
    LoadingStart,
    TilesLoaded,
    BoundaryChanged(String),
}

/// Listener that records every callback; handy for tests and event replay.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    pub notices: Vec<Notice>,
}

impl RecordingListener {
    pub fn count(&self, pred: impl Fn(&Notice) -> bool) -> usize {
        self.notices.iter().filter(|n| pred(n)).count()
    }
}

impl MapListener for RecordingListener {
    fn on_shape_created(&mut self, kind: ShapeKind, id: FeatureId, _feature: &GeoFeature) {
        self.notices.push(Notice::ShapeCreated(kind, id));
    }
    fn on_shape_edited(&mut self, ids: &[FeatureId]) {
        self.notices.push(Notice::ShapeEdited(ids.to_vec()));
    }
    fn on_shape_deleted(&mut self, ids: &[FeatureId]) {
        self.notices.push(Notice::ShapeDeleted(ids.to_vec()));
    }
    fn on_loading_start(&mut self) {
        self.notices.push(Notice::LoadingStart);
    }
    fn on_tiles_loaded(&mut self) {
        self.notices.push(Notice::TilesLoaded);
    }
    fn on_boundary_changed(&mut self, id: &str) {
        self.notices.push(Notice::BoundaryChanged(id.to_string()));
    }
}
