use mapdraw::surface::SurfaceCall;
use mapdraw::{
    HeadlessSurface, LatLngBounds, MapConfig, MapError, MapEvent, MapSession, Notice, Phase, RecordingListener,
    SessionConfig,
};
use proptest::prelude::*;

fn session(config: SessionConfig) -> MapSession<HeadlessSurface, RecordingListener> {
    let mut s = MapSession::new(HeadlessSurface::default(), RecordingListener::default(), config);
    s.mount(0.0).unwrap();
    s
}

fn settled(id: &str) -> MapSession<HeadlessSurface, RecordingListener> {
    let mut s = session(SessionConfig::default());
    assert!(s.select_boundary(id, 0.0).unwrap());
    s.tick(10_000.0);
    assert_eq!(s.boundary().phase(), Phase::Idle);
    s
}

fn inside(outer: &LatLngBounds, inner: &LatLngBounds) -> bool {
    const EPS: f64 = 1e-9;
    inner.south_west.lat >= outer.south_west.lat - EPS
        && inner.south_west.lng >= outer.south_west.lng - EPS
        && inner.north_east.lat <= outer.north_east.lat + EPS
        && inner.north_east.lng <= outer.north_east.lng + EPS
}

#[test]
fn first_selection_jumps_then_later_ones_fly() {
    let mut s = session(SessionConfig::default());
    s.surface_mut().clear_calls();
    s.select_boundary("go", 0.0).unwrap();
    assert!(s.surface().calls().iter().any(|c| matches!(c, SurfaceCall::SetView { animate: false, .. })));
    assert!(!s.surface().calls().iter().any(|c| matches!(c, SurfaceCall::FlyTo { .. })));
    s.tick(1_000.0);
    s.surface_mut().clear_calls();
    s.select_boundary("sp", 1_000.0).unwrap();
    assert!(s.surface().calls().iter().any(|c| matches!(c, SurfaceCall::FlyTo { .. })));
    assert_eq!(s.current_boundary().map(|d| d.id), Some("sp"));
}

#[test]
fn reselecting_active_region_is_a_no_op() {
    let mut s = settled("mt");
    s.surface_mut().clear_calls();
    assert!(!s.select_boundary("mt", 10_000.0).unwrap());
    assert!(s.surface().calls().is_empty());
}

#[test]
fn unknown_and_disallowed_regions_leave_state_unchanged() {
    let config = SessionConfig {
        map: MapConfig { allowed_boundaries: Some(vec!["go".into(), "mt".into()]), ..MapConfig::default() },
        ..SessionConfig::default()
    };
    let mut s = session(config);
    s.select_boundary("go", 0.0).unwrap();
    assert!(matches!(s.select_boundary("zz", 0.0), Err(MapError::UnknownBoundary(_))));
    let err = s.select_boundary("sp", 0.0).unwrap_err();
    assert_eq!(err.code(), "boundary_not_allowed");
    assert_eq!(s.current_boundary().map(|d| d.id), Some("go"));
    assert_eq!(s.selectable().all_ids(), vec!["go", "mt"]);
}

#[test]
fn initial_boundary_is_applied_on_mount() {
    let config = SessionConfig {
        map: MapConfig { initial_boundary: Some("ba".into()), ..MapConfig::default() },
        ..SessionConfig::default()
    };
    let mut s = session(config);
    assert_eq!(s.current_boundary().map(|d| d.id), Some("ba"));
    s.tick(200.0);
    let notices = &s.listener().notices;
    assert_eq!(
        notices,
        &vec![Notice::LoadingStart, Notice::BoundaryChanged("ba".into()), Notice::TilesLoaded]
    );
}

#[test]
fn transition_after_idle_gap_waits_on_host_clock() {
    let mut s = settled("go");
    s.select_boundary("sp", 60_000.0).unwrap();
    assert_eq!(s.next_deadline(), Some(61_100.0));
    s.tick(60_001.0);
    assert_eq!(s.boundary().phase(), Phase::Transitioning);
    assert_eq!(s.surface().max_bounds(), None);
    assert_eq!(s.listener().count(|n| *n == Notice::TilesLoaded), 1);

    s.tick(61_100.0);
    assert_eq!(s.surface().max_bounds(), Some(s.current_boundary().unwrap().bounds));
    assert_eq!(s.boundary().phase(), Phase::Transitioning);
    s.tick(61_200.0);
    assert_eq!(s.boundary().phase(), Phase::Idle);
    assert_eq!(s.listener().count(|n| *n == Notice::TilesLoaded), 2);
}

#[test]
fn region_min_zoom_is_applied() {
    let s = settled("df");
    assert_eq!(s.surface().min_zoom(), 7.0);
    assert_eq!(s.surface().zoom(), 9.0);
}

#[test]
fn drag_without_region_stays_in_country() {
    let mut s = session(SessionConfig::default());
    let country = MapConfig::default().country_bounds;
    s.surface_mut().drag_by(30.0, 40.0);
    s.dispatch(MapEvent::Drag);
    assert!(country.contains(s.surface().center()));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

    #[test]
    fn drags_never_leave_the_active_region(
        id in prop::sample::select(vec!["am", "mt", "pa", "ba", "mg"]),
        drags in prop::collection::vec((-25.0f64..25.0, -25.0f64..25.0), 1..20),
    ) {
        let mut s = settled(id);
        let bounds = s.current_boundary().unwrap().bounds;
        for (dlat, dlng) in drags {
            s.surface_mut().drag_by(dlat, dlng);
            s.dispatch(MapEvent::Drag);
            prop_assert!(inside(&bounds, &s.surface().viewport_bounds()));
        }
    }
}
