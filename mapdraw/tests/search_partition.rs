use mapdraw::surface::SurfaceCall;
use mapdraw::{FeatureCollection, FeatureId, HeadlessSurface, MapSession, SessionConfig};
use serde_json::json;

fn plot(name: &str, lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Polygon", "coordinates": [[
            [lng, lat], [lng + 0.05, lat], [lng + 0.05, lat + 0.05], [lng, lat + 0.05], [lng, lat]
        ]]},
        "properties": {"name": name}
    })
}

/// Three "fazenda" plots (two in São Paulo, one in Goiás) and two others in São Paulo.
fn session() -> MapSession<HeadlessSurface> {
    let mut s = MapSession::headless(HeadlessSurface::default(), SessionConfig::default());
    s.mount(0.0).unwrap();
    let fc = FeatureCollection::from_json_value(json!({
        "type": "FeatureCollection",
        "features": [
            plot("0001 - Fazenda Norte", -22.0, -48.0),
            plot("0002 - Sitio Alegre", -22.5, -48.5),
            plot("0003 - Fazenda Goiana", -16.0, -49.5),
            plot("0004 - Chacara", -23.5, -47.0),
            plot("0005 - FAZENDA Sul", -23.0, -49.0),
        ]
    }))
    .unwrap();
    let report = s.import(&fc, false);
    assert_eq!(report.imported, 5);
    s
}

fn ids_named(s: &MapSession<HeadlessSurface>, prefixes: &[&str]) -> Vec<FeatureId> {
    s.draw()
        .collection()
        .iter()
        .filter(|f| f.attribute_str("name").is_some_and(|n| prefixes.iter().any(|p| n.starts_with(p))))
        .map(|f| f.id)
        .collect()
}

#[test]
fn region_scoped_query_partitions_every_feature() {
    let mut s = session();
    s.select_boundary("sp", 0.0).unwrap();
    s.tick(1_000.0);
    let state = s.search("  fazenda ");
    let hits = ids_named(&s, &["0001", "0005"]);
    assert_eq!(state.matches, hits);
    assert_eq!(state.query, "fazenda");

    let mut highlighted = 0;
    let mut dimmed = 0;
    for id in s.draw().collection().ids() {
        let style = s.surface().layer_style(id).unwrap();
        if style.weight == 4.0 {
            highlighted += 1;
            assert!(hits.contains(&id));
        } else if style.opacity == 0.25 {
            dimmed += 1;
            assert_eq!(style.fill_opacity, 0.05);
        }
    }
    assert_eq!((highlighted, dimmed), (2, 3));
}

#[test]
fn first_match_is_focused() {
    let mut s = session();
    s.surface_mut().clear_calls();
    let state = s.search("fazenda");
    let first = s.draw().collection().get(state.matches[0]).unwrap().shape.bounds().unwrap();
    assert!(s
        .surface()
        .calls()
        .iter()
        .any(|c| matches!(c, SurfaceCall::FitBounds { bounds, padding } if *bounds == first && *padding == 50.0)));
}

#[test]
fn cycling_wraps_around_without_recomputing() {
    let mut s = session();
    let state = s.search("fazenda");
    assert_eq!(state.matches.len(), 3);
    assert_eq!(s.cycle(), Some(state.matches[1]));
    assert_eq!(s.cycle(), Some(state.matches[2]));
    assert_eq!(s.search_state().cursor, 2);
    assert_eq!(s.cycle(), Some(state.matches[0]));
    assert_eq!(s.search_state().cursor, 0);
    assert_eq!(s.search_state().matches, state.matches);
}

#[test]
fn selecting_a_region_reruns_held_query() {
    let mut s = session();
    assert_eq!(s.search("fazenda").matches.len(), 3);
    s.select_boundary("sp", 0.0).unwrap();
    assert_eq!(s.search_state().matches, ids_named(&s, &["0001", "0005"]));
    s.tick(1_000.0);
    s.select_boundary("go", 1_000.0).unwrap();
    assert_eq!(s.search_state().matches, ids_named(&s, &["0003"]));
}

#[test]
fn region_change_focuses_after_the_fly_settles() {
    let mut s = session();
    s.search("fazenda");
    s.select_boundary("sp", 0.0).unwrap();
    s.tick(1_000.0);
    s.surface_mut().clear_calls();

    s.select_boundary("go", 1_000.0).unwrap();
    let goiana = ids_named(&s, &["0003"]);
    assert_eq!(s.search_state().matches, goiana);
    let calls = s.surface().calls();
    assert!(calls.iter().any(|c| matches!(c, SurfaceCall::FlyTo { .. })));
    assert!(calls.iter().any(|c| matches!(c, SurfaceCall::SetStyle(_))));
    assert!(!calls.iter().any(|c| matches!(c, SurfaceCall::FitBounds { .. } | SurfaceCall::SetView { .. })));

    s.tick(2_099.0);
    assert!(!s.surface().calls().iter().any(|c| matches!(c, SurfaceCall::FitBounds { .. })));
    s.tick(2_200.0);
    let target = s.draw().collection().get(goiana[0]).unwrap().shape.bounds().unwrap();
    assert!(matches!(
        s.surface().calls().last(),
        Some(SurfaceCall::FitBounds { bounds, .. }) if *bounds == target
    ));
}

#[test]
fn empty_query_restores_default_styles_and_is_not_held() {
    let mut s = session();
    s.search("fazenda");
    let state = s.search("   ");
    assert!(state.matches.is_empty());
    for f in s.draw().collection().iter() {
        assert_eq!(s.surface().layer_style(f.id), Some(&f.style()));
    }
    assert_eq!(s.cycle(), None);

    s.surface_mut().clear_calls();
    s.select_boundary("sp", 0.0).unwrap();
    assert!(!s.surface().calls().iter().any(|c| matches!(c, SurfaceCall::SetStyle(_))));
}

#[test]
fn no_match_dims_everything() {
    let mut s = session();
    let state = s.search("pasto");
    assert!(state.matches.is_empty());
    for id in s.draw().collection().ids() {
        assert_eq!(s.surface().layer_style(id).unwrap().opacity, 0.25);
    }
}
