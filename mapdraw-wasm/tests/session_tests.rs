use js_sys::{Array, Function, Reflect, JSON};
use mapdraw_wasm::DrawingSession;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const HOST: &str = r#"
const calls = [];
let next = 1;
return {
  alive: true,
  calls,
  isAlive() { return this.alive; },
  setView(c, z, a) { calls.push('setView'); },
  flyTo(c, z, o) { calls.push('flyTo'); },
  setMinZoom(z) { calls.push('setMinZoom'); },
  setMaxBounds(b) { calls.push(b === null ? 'clearMaxBounds' : 'setMaxBounds'); },
  panInsideBounds(b, a) { calls.push('panInsideBounds'); },
  fitBounds(b, p) { calls.push('fitBounds'); },
  on(name) { calls.push('on:' + name); return next++; },
  off(id) { calls.push('off'); },
  addLayer(id, shape, style) { calls.push('addLayer'); this.lastStyle = style; },
  removeLayer(id) { calls.push('removeLayer'); },
  setStyle(id, style) { calls.push('setStyle'); },
  bindLabel(id, html) { calls.push('bindLabel'); this.lastLabel = html; },
  addDrawControl(c) { calls.push('addDrawControl'); this.control = c; return next++; },
  removeDrawControl(id) { calls.push('removeDrawControl'); },
};
"#;

const CALLBACKS: &str = r#"
const events = [];
return {
  events,
  onLoadingStart: () => events.push('loading'),
  onBoundaryChanged: (id) => events.push('boundary:' + id),
  onTilesLoaded: () => events.push('tiles'),
  onShapeCreated: (kind, id, feature) => events.push('created:' + kind + ':' + feature.properties.name),
  onShapeDeleted: (ids) => events.push('deleted:' + ids.length),
};
"#;

fn build(src: &str) -> JsValue {
    Function::new_no_args(src).call0(&JsValue::NULL).unwrap()
}

fn get(v: &JsValue, key: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(key)).unwrap()
}

fn strings(v: &JsValue) -> Vec<String> {
    Array::from(v).iter().filter_map(|x| x.as_string()).collect()
}

fn code(res: &JsValue) -> Option<String> {
    if get(res, "ok").as_bool() != Some(false) {
        return None;
    }
    get(&get(res, "error"), "code").as_string()
}

fn json(text: &str) -> JsValue {
    JSON::parse(text).unwrap()
}

fn mounted(callbacks: &JsValue, config: JsValue) -> (DrawingSession, JsValue) {
    let host = build(HOST);
    let mut s = DrawingSession::new(host.clone(), callbacks.clone(), config).unwrap();
    assert!(s.mount(0.0));
    (s, host)
}

#[wasm_bindgen_test]
fn mount_subscribes_and_installs_toolbar() {
    let (_s, host) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    let calls = strings(&get(&host, "calls"));
    assert!(calls.contains(&"on:drag".to_string()));
    assert!(calls.contains(&"on:draw:created".to_string()));
    assert!(calls.contains(&"addDrawControl".to_string()));
    let control = get(&host, "control");
    assert_eq!(get(&control, "position").as_string().as_deref(), Some("topleft"));
}

#[wasm_bindgen_test]
fn boundary_transition_reports_through_callbacks() {
    let callbacks = build(CALLBACKS);
    let (mut s, _host) = mounted(&callbacks, JsValue::UNDEFINED);
    let res = s.select_boundary_res("df", 5_000.0);
    assert_eq!(get(&res, "value").as_bool(), Some(true));
    assert!(s.is_transitioning());
    assert_eq!(s.next_deadline(), Some(5_100.0));
    s.tick(5_099.0);
    assert!(s.is_transitioning());
    s.tick(6_000.0);
    assert!(!s.is_transitioning());
    assert_eq!(s.current_boundary().as_deref(), Some("df"));
    assert_eq!(strings(&get(&callbacks, "events")), vec!["loading", "boundary:df", "tiles"]);

    assert_eq!(code(&s.select_boundary_res("zz", 6_000.0)).as_deref(), Some("unknown_boundary"));
    assert_eq!(get(&s.select_boundary_res("df", 6_000.0), "value").as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn allowed_boundaries_come_from_config() {
    let config = json(r#"{"map": {"allowedBoundaries": ["go"]}}"#);
    let (mut s, _host) = mounted(&JsValue::UNDEFINED, config);
    assert_eq!(code(&s.select_boundary_res("sp", 0.0)).as_deref(), Some("boundary_not_allowed"));
    assert!(s.select_boundary("go", 0.0));
    assert_eq!(Array::from(&s.selectable_boundaries()).length(), 1);
}

#[wasm_bindgen_test]
fn bad_inputs_return_typed_errors() {
    let bad = json(r#"{"map": {"defaultZoom": "far"}}"#);
    assert!(DrawingSession::new(build(HOST), JsValue::UNDEFINED, bad).is_err());

    let (mut s, _host) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    assert_eq!(code(&s.on_created_res(JsValue::from_str("nope"))).as_deref(), Some("invalid_input"));
    assert_eq!(code(&s.import_json_res("{", false)).as_deref(), Some("invalid_json"));
    assert_eq!(code(&s.tick_res(f64::NAN)).as_deref(), Some("non_finite"));
    assert_eq!(code(&s.select_boundary_res("go", f64::INFINITY)).as_deref(), Some("non_finite"));
    assert_eq!(code(&s.set_color_res(json(r#"{"hex": 3}"#))).as_deref(), Some("invalid_input"));
    assert_eq!(s.feature_count(), 0);
}

#[wasm_bindgen_test]
fn created_shapes_are_named_styled_and_exported() {
    let callbacks = build(CALLBACKS);
    let (mut s, host) = mounted(&callbacks, JsValue::UNDEFINED);
    let red = json(r##"{"id": "red", "name": "Red", "hex": "#ef4444", "fillOpacity": 0.3}"##);
    assert!(s.set_color(red));
    let res = s.on_created_res(json(r#"{"kind": "circle", "center": [-15.0, -47.0], "radius": 200.0}"#));
    assert_eq!(get(&res, "value").as_bool(), Some(true));
    assert_eq!(get(&get(&host, "lastStyle"), "color").as_string().as_deref(), Some("#ef4444"));
    assert!(get(&host, "lastLabel").as_string().unwrap().contains("0001 - PLOT"));
    assert_eq!(strings(&get(&callbacks, "events")), vec!["created:circle:0001 - PLOT"]);

    let exported = s.export();
    let features = Array::from(&get(&exported, "features"));
    assert_eq!(features.length(), 1);
    assert_eq!(get(&get(&features.get(0), "properties"), "shapeKind").as_string().as_deref(), Some("circle"));

    let text = s.export_json();
    let (mut other, _) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    let report = other.import_json_res(&text, true);
    assert_eq!(get(&get(&report, "value"), "imported").as_f64(), Some(1.0));
    assert_eq!(other.clear(), 0);
    assert_eq!(other.export_json(), text);
}

#[wasm_bindgen_test]
fn throwing_callback_does_not_abort_transition() {
    let callbacks = build("return { onBoundaryChanged: () => { throw new Error('boom'); } };");
    let (mut s, _host) = mounted(&callbacks, JsValue::UNDEFINED);
    assert!(s.select_boundary("ba", 0.0));
    s.tick(1000.0);
    assert!(!s.is_transitioning());
}

#[wasm_bindgen_test]
fn destroyed_or_dead_host_is_left_alone() {
    let (mut s, host) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    Reflect::set(&host, &JsValue::from_str("alive"), &JsValue::FALSE).unwrap();
    assert!(!s.select_boundary("go", 0.0));

    let (mut s, host) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    s.destroy();
    let before = Array::from(&get(&host, "calls")).length();
    assert_eq!(code(&s.select_boundary_res("go", 0.0)).as_deref(), Some("destroyed"));
    s.on_drag();
    s.tick(5000.0);
    assert!(s.is_destroyed());
    assert_eq!(Array::from(&get(&host, "calls")).length(), before);
}

#[wasm_bindgen_test]
fn drawings_persist_in_local_storage() {
    let (mut s, _host) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    s.clear_storage();
    assert!(!s.has_stored_drawings());
    s.on_created(json(r#"{"kind": "circle", "center": [-3.1, -60.0], "radius": 500.0}"#));
    assert!(s.save());

    let (mut restored, _host) = mounted(&JsValue::UNDEFINED, JsValue::UNDEFINED);
    assert!(restored.has_stored_drawings());
    assert!(restored.load());
    assert_eq!(restored.feature_count(), 1);
    assert_eq!(strings(&restored.detect_boundaries()), vec!["am"]);
    assert!(restored.clear_storage());
    assert!(!restored.has_stored_drawings());
}

#[wasm_bindgen_test]
fn free_functions() {
    assert_eq!(mapdraw_wasm::detect_boundary_at(-15.78, -47.93).as_deref(), Some("df"));
    assert_eq!(mapdraw_wasm::detect_boundary_at(f64::NAN, 0.0), None);
    assert_eq!(Array::from(&mapdraw_wasm::boundary_names()).length(), 27);
    assert!(Array::from(&mapdraw_wasm::palette()).length() > 1);
    let unknown = mapdraw_wasm::init_logging("loud");
    assert_eq!(code(&unknown).as_deref(), Some("logging"));
}
