use crate::boundaries::detector;
use crate::boundaries::registry::BoundaryDefinition;
use crate::color::ShapeStyle;
use crate::config::SearchConfig;
use crate::draw::collection::{DrawnCollection, DrawnFeature};
use crate::model::{FeatureId, Shape};
use crate::surface::{absorb, MapSurface};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Styling partition of one feature after a search pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visual {
    Default,
    Highlighted,
    Dimmed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub matches: Vec<FeatureId>,
    pub cursor: usize,
}

pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Text attribute, numbers included, used for matching.
fn attribute_text(f: &DrawnFeature, field: &str) -> Option<String> {
    match f.properties.get(field)? {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn in_region(f: &DrawnFeature, region: Option<&BoundaryDefinition>) -> bool {
    match region {
        None => true,
        Some(def) => f
            .shape
            .representative_point()
            .is_some_and(|p| detector::point_in_bounds(p, &def.bounds)),
    }
}

#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    field: String,
    state: SearchState,
}

impl SearchEngine {
    /// `default_field` is used when the config does not name one.
    pub fn new(config: SearchConfig, default_field: &str) -> Self {
        let field = config.field.clone().unwrap_or_else(|| default_field.to_string());
        SearchEngine { config, field, state: SearchState::default() }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn style_for(&self, f: &DrawnFeature, visual: Visual) -> ShapeStyle {
        let base = f.style();
        match visual {
            Visual::Default => base,
            Visual::Highlighted => ShapeStyle {
                opacity: 1.0,
                weight: self.config.highlight_weight,
                fill_opacity: base.fill_opacity.max(self.config.highlight_fill_opacity),
                ..base
            },
            Visual::Dimmed => ShapeStyle {
                opacity: self.config.dimmed_opacity,
                fill_opacity: self.config.dimmed_fill_opacity,
                ..base
            },
        }
    }

    /// Classifies the whole collection without touching any surface.
    pub fn classify(
        &self,
        query: &str,
        collection: &DrawnCollection,
        region: Option<&BoundaryDefinition>,
    ) -> Vec<(FeatureId, Visual)> {
        let needle = normalize(query);
        collection
            .iter()
            .map(|f| {
                let visual = if needle.is_empty() {
                    Visual::Default
                } else {
                    let text_hit = attribute_text(f, &self.field).is_some_and(|t| t.contains(&needle));
                    if text_hit && in_region(f, region) {
                        Visual::Highlighted
                    } else {
                        Visual::Dimmed
                    }
                };
                (f.id, visual)
            })
            .collect()
    }

    /// Restyles every feature, records matches in collection order and focuses the first.
    pub fn search<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        query: &str,
        collection: &DrawnCollection,
        region: Option<&BoundaryDefinition>,
    ) -> &SearchState {
        self.restyle(surface, query, collection, region);
        self.focus_current(surface, collection);
        &self.state
    }

    /// Same as [`SearchEngine::search`] but leaves the viewport alone.
    pub fn restyle<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        query: &str,
        collection: &DrawnCollection,
        region: Option<&BoundaryDefinition>,
    ) -> &SearchState {
        let partition = self.classify(query, collection, region);
        self.state = SearchState {
            query: normalize(query),
            matches: partition
                .iter()
                .filter(|(_, v)| *v == Visual::Highlighted)
                .map(|(id, _)| *id)
                .collect(),
            cursor: 0,
        };
        if !surface.is_alive() {
            return &self.state;
        }
        for (id, visual) in &partition {
            if let Some(f) = collection.get(*id) {
                absorb("setStyle", surface.set_style(*id, &self.style_for(f, *visual)));
            }
        }
        debug!(query = %self.state.query, matches = self.state.matches.len(), "search evaluated");
        &self.state
    }

    /// Focuses the match under the cursor, if any.
    pub fn focus_current<S: MapSurface + ?Sized>(&self, surface: &mut S, collection: &DrawnCollection) {
        let Some(&id) = self.state.matches.get(self.state.cursor) else { return };
        if surface.is_alive() {
            self.focus(surface, collection, id);
        }
    }

    /// Advances the cursor with wrap-around and refocuses. Never recomputes matches.
    pub fn cycle<S: MapSurface + ?Sized>(&mut self, surface: &mut S, collection: &DrawnCollection) -> Option<FeatureId> {
        if self.state.matches.is_empty() {
            return None;
        }
        self.state.cursor = (self.state.cursor + 1) % self.state.matches.len();
        let id = self.state.matches[self.state.cursor];
        if surface.is_alive() {
            self.focus(surface, collection, id);
        }
        Some(id)
    }

    pub fn reset(&mut self) {
        self.state = SearchState::default();
    }

    fn focus<S: MapSurface + ?Sized>(&self, surface: &mut S, collection: &DrawnCollection, id: FeatureId) {
        let Some(f) = collection.get(id) else { return };
        match &f.shape {
            Shape::Circle { center, .. } => {
                absorb("setView", surface.set_view(*center, self.config.circle_focus_zoom, true));
            }
            shape => {
                if let Some(b) = shape.bounds() {
                    absorb("fitBounds", surface.fit_bounds(b, self.config.fit_padding));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_folds() {
        assert_eq!(normalize("  PlOT 7 "), "plot 7");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn dimmed_and_highlighted_differ_from_default() {
        let engine = SearchEngine::new(SearchConfig::default(), "name");
        let f = DrawnFeature {
            id: FeatureId(1),
            shape: Shape::Circle { center: crate::model::LatLng::new(0.0, 0.0), radius: 1.0 },
            color: crate::color::DrawColor::default(),
            properties: Default::default(),
        };
        let d = engine.style_for(&f, Visual::Default);
        let h = engine.style_for(&f, Visual::Highlighted);
        let m = engine.style_for(&f, Visual::Dimmed);
        assert_eq!(d.opacity, 1.0);
        assert_eq!(h.weight, 4.0);
        assert_eq!(h.fill_opacity, 0.45);
        assert_eq!(m.opacity, 0.25);
        assert_eq!(m.fill_opacity, 0.05);
    }
}
