use mapdraw::{
    DrawingStore, HeadlessSurface, LatLng, MapEvent, MapSession, MemoryStore, SessionConfig, Shape, STORAGE_KEY,
};

fn session(backend: &MemoryStore) -> MapSession<HeadlessSurface> {
    let mut s = MapSession::headless(HeadlessSurface::default(), SessionConfig::default())
        .with_store(DrawingStore::new(backend.clone()));
    s.mount(0.0).unwrap();
    s
}

fn names(s: &MapSession<HeadlessSurface>) -> Vec<String> {
    s.export()
        .features
        .iter()
        .filter_map(|f| f.property_str("name").map(str::to_string))
        .collect()
}

#[test]
fn saved_drawings_restore_in_a_new_session() {
    let backend = MemoryStore::new();
    let mut first = session(&backend);
    first.dispatch(MapEvent::Created { shape: Shape::Circle { center: LatLng::new(-15.0, -47.0), radius: 300.0 } });
    first.dispatch(MapEvent::Created {
        shape: Shape::Polygon {
            rings: vec![vec![LatLng::new(-16.0, -48.0), LatLng::new(-16.0, -47.9), LatLng::new(-15.9, -47.95)]],
        },
    });
    assert!(first.save());
    assert!(backend.raw(STORAGE_KEY).is_some());

    let mut second = session(&backend);
    assert!(second.has_stored_drawings());
    assert!(second.load());
    assert_eq!(names(&second), vec!["0001 - PLOT", "0002 - PLOT"]);
    assert_eq!(second.export(), first.export());
    // restored features are editable
    assert_eq!(second.clear(), 2);
}

#[test]
fn clearing_storage_forgets_saved_drawings() {
    let backend = MemoryStore::new();
    let mut s = session(&backend);
    assert!(!s.has_stored_drawings());
    assert!(s.save());
    assert!(s.has_stored_drawings());
    assert!(s.clear_storage());
    assert!(!s.has_stored_drawings());
    assert!(!s.load());
}

#[test]
fn backend_failures_surface_as_false() {
    let backend = MemoryStore::new();
    let mut s = session(&backend);
    backend.set_failing(true);
    assert!(!s.save());
    assert!(!s.load());
    assert!(!s.clear_storage());
    assert!(!s.has_stored_drawings());
}

#[test]
fn corrupt_payload_is_ignored() {
    let backend = MemoryStore::new();
    backend.put_raw(STORAGE_KEY, "{not json");
    let mut s = session(&backend);
    assert!(!s.load());
    assert!(s.export().features.is_empty());
}

#[test]
fn session_without_store_reports_nothing_saved() {
    let mut s = MapSession::headless(HeadlessSurface::default(), SessionConfig::default());
    s.mount(0.0).unwrap();
    assert!(!s.save());
    assert!(!s.load());
    assert!(!s.has_stored_drawings());
}
