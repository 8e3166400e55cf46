use crate::color::{DrawColor, ShapeStyle};
use crate::geojson::{self, GeoFeature, Properties};
use crate::model::{FeatureId, Shape};
use std::collections::HashSet;

/// One drawn geometry with its materialized colour and free-form attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnFeature {
    pub id: FeatureId,
    pub shape: Shape,
    pub color: DrawColor,
    /// User attributes. Never holds shape or colour keys; those are rebuilt on export.
    pub properties: Properties,
}

impl DrawnFeature {
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub fn style(&self) -> ShapeStyle {
        self.color.shape_style()
    }

    pub fn to_geojson(&self) -> GeoFeature {
        let (geometry, attrs) = geojson::encode_shape(&self.shape);
        let mut properties = self.properties.clone();
        properties.extend(attrs);
        properties.insert(geojson::DRAW_COLOR_KEY.into(), self.color.to_value());
        GeoFeature::new(Some(geometry), properties)
    }
}

/// Insertion-ordered feature arena with a protected side-set.
///
/// Stamps are never reused within one collection, so a stale id can not
/// alias a newer feature.
#[derive(Clone, Debug, Default)]
pub struct DrawnCollection {
    features: Vec<DrawnFeature>,
    protected: HashSet<FeatureId>,
    next_stamp: u32,
}

impl DrawnCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, shape: Shape, color: DrawColor, properties: Properties, protected: bool) -> FeatureId {
        self.next_stamp += 1;
        let id = FeatureId(self.next_stamp);
        self.features.push(DrawnFeature { id, shape, color, properties });
        if protected {
            self.protected.insert(id);
        }
        id
    }

    pub(crate) fn get_mut(&mut self, id: FeatureId) -> Option<&mut DrawnFeature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    pub(crate) fn remove(&mut self, id: FeatureId) -> Option<DrawnFeature> {
        let idx = self.features.iter().position(|f| f.id == id)?;
        self.protected.remove(&id);
        Some(self.features.remove(idx))
    }

    /// Drops every editable feature and returns their stamps.
    pub(crate) fn drain_editable(&mut self) -> Vec<FeatureId> {
        let protected = &self.protected;
        let (keep, drop): (Vec<_>, Vec<_>) = self.features.drain(..).partition(|f| protected.contains(&f.id));
        self.features = keep;
        drop.into_iter().map(|f| f.id).collect()
    }

    /// Drops everything, protected included.
    pub(crate) fn drain_all(&mut self) -> Vec<FeatureId> {
        self.protected.clear();
        self.features.drain(..).map(|f| f.id).collect()
    }

    pub fn get(&self, id: FeatureId) -> Option<&DrawnFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawnFeature> {
        self.features.iter()
    }

    pub fn ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.id).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn is_protected(&self, id: FeatureId) -> bool {
        self.protected.contains(&id)
    }

    pub fn protected_count(&self) -> usize {
        self.protected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatLng;

    fn circle() -> Shape {
        Shape::Circle { center: LatLng::new(-10.0, -50.0), radius: 100.0 }
    }

    #[test]
    fn editable_drain_keeps_protected_order() {
        let mut c = DrawnCollection::new();
        let a = c.insert(circle(), DrawColor::default(), Properties::new(), true);
        let b = c.insert(circle(), DrawColor::default(), Properties::new(), false);
        let d = c.insert(circle(), DrawColor::default(), Properties::new(), true);
        assert_eq!(c.drain_editable(), vec![b]);
        assert_eq!(c.ids(), vec![a, d]);
        assert!(c.drain_editable().is_empty());
    }

    #[test]
    fn stamps_are_not_reused() {
        let mut c = DrawnCollection::new();
        let a = c.insert(circle(), DrawColor::default(), Properties::new(), false);
        c.drain_all();
        let b = c.insert(circle(), DrawColor::default(), Properties::new(), false);
        assert_ne!(a, b);
        assert!(c.get(a).is_none());
    }

    #[test]
    fn export_carries_colour_and_circle_block() {
        let mut c = DrawnCollection::new();
        let id = c.insert(circle(), DrawColor::default(), Properties::new(), false);
        let f = c.get(id).unwrap().to_geojson();
        assert_eq!(f.shape_tag(), Some("circle"));
        assert_eq!(f.properties["radius"], 100.0);
        assert_eq!(f.properties["drawColor"]["hex"], "#3b82f6");
    }
}
