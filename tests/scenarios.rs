use reis_promo::session::gate::FontCatalog;
use reis_promo::{
    AudioKey, AudioMap, FrameIndex, FrameRange, JsonLinesSink, ReelError, Registry,
    RenderSession, RenderSessionOpts, Script, StateDelta, derive_scene_state,
};
use serde_json::json;

fn open(id: &str, props: Option<serde_json::Value>) -> Result<RenderSession, ReelError> {
    let registry = Registry::builtin();
    let entry = registry.lookup(id)?;
    RenderSession::new(entry, props.as_ref(), RenderSessionOpts::default())
}

#[test]
fn intro_cue_sheet_follows_the_acts() {
    let sess = open("ReisIntroduction", None).unwrap();
    let range = FrameRange::full(450);
    let manifest = sess.audio_manifest(range, &AudioMap::default()).unwrap();

    let mut starts: Vec<(u64, AudioKey)> = manifest
        .entries
        .iter()
        .map(|e| (e.start_frame, e.key))
        .collect();
    starts.sort_by_key(|&(f, _)| f);
    assert_eq!(
        starts,
        vec![
            (0, AudioKey::IntroSwoosh),
            (150, AudioKey::ToggleOn),
            (200, AudioKey::Success),
            (220, AudioKey::Success),
            (240, AudioKey::Success),
            (360, AudioKey::OutroChime),
        ]
    );
    let outro = manifest
        .entries
        .iter()
        .find(|e| e.key == AudioKey::OutroChime)
        .unwrap();
    assert_eq!(outro.end_frame, 450);
    assert_eq!(outro.node, "reis-introduction/end");
    assert!((outro.offset_secs(range, sess.meta().fps) - 12.0).abs() < 1e-9);
}

#[test]
fn partial_range_trims_cues_already_playing() {
    let sess = open("ReisIntroduction", None).unwrap();
    let range = FrameRange::new(FrameIndex(210), FrameIndex(450)).unwrap();
    let manifest = sess.audio_manifest(range, &AudioMap::default()).unwrap();

    let select = manifest
        .entries
        .iter()
        .find(|e| e.node == "reis-introduction/hero/select")
        .unwrap();
    assert_eq!(select.start_frame, 210);
    assert_eq!(select.trim_frames, 60);
    assert_eq!(select.end_frame, 360);

    assert!(
        manifest
            .entries
            .iter()
            .all(|e| e.key != AudioKey::IntroSwoosh)
    );
}

#[test]
fn audio_map_overrides_reach_the_manifest() {
    let map: AudioMap = serde_json::from_value(json!({ "TICK": "sfx/tick.wav" })).unwrap();
    let sess = open("Spolky", None).unwrap();
    let manifest = sess.audio_manifest(FrameRange::full(240), &map).unwrap();
    let tick = manifest
        .entries
        .iter()
        .find(|e| e.key == AudioKey::Tick)
        .unwrap();
    assert_eq!(tick.asset, "sfx/tick.wav");
    assert_eq!(tick.start_frame, 90);
    assert_eq!(tick.volume, 1.0);
}

#[test]
fn props_are_validated_at_the_boundary() {
    let err = open("OutlookSync", Some(json!({ "progress": 1.5 }))).unwrap_err();
    match err {
        ReelError::Validation(msg) => assert!(msg.starts_with("OutlookSync:"), "{msg}"),
        other => panic!("unexpected error {other:?}"),
    }

    assert!(open("SubjectDrawer", Some(json!({ "subject": { "name": "", "code": "X", "credits": "", "status": "", "completion": "" } }))).is_err());
    assert!(open("WeeklyCalendar", Some(json!({ "start_hour": 14, "end_hour": 9 }))).is_err());
    assert!(open("Spolky", Some(json!({ "subscribe_id": "chess" }))).is_err());
    assert!(open("NoSuchComposition", None).is_err());
}

#[test]
fn props_change_what_is_drawn() {
    let sess = open(
        "SubjectDrawer",
        Some(json!({ "selected_ids": ["c3", "h1"], "active_tab": "files" })),
    )
    .unwrap();
    let snap = sess.render_frame(FrameIndex(40)).unwrap();
    let label = snap.root.find("download-label").unwrap().text_content();
    assert_eq!(label, "Stáhnout (2)");
}

#[test]
fn spolky_subscribes_at_ninety() {
    let sess = open("Spolky", None).unwrap();
    let before = sess.render_frame(FrameIndex(89)).unwrap();
    let after = sess.render_frame(FrameIndex(90)).unwrap();
    assert!(before.root.find("sub-esn").unwrap().style.background.is_none());
    assert!(after.root.find("sub-esn").unwrap().style.background.is_some());
    assert_ne!(before.digest, after.digest);
}

#[test]
fn missing_fonts_block_rendering() {
    let registry = Registry::builtin();
    let err = RenderSession::new(
        registry.lookup("ProfessionalText").unwrap(),
        None,
        RenderSessionOpts {
            fonts: FontCatalog::empty(),
            ..RenderSessionOpts::default()
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("Inter"), "{err}");
}

#[test]
fn frames_outside_the_composition_are_rejected() {
    let sess = open("Welcome", None).unwrap();
    assert!(sess.render_frame(FrameIndex(59)).is_ok());
    assert!(sess.render_frame(FrameIndex(60)).is_err());
}

#[test]
fn json_lines_sink_writes_header_and_frames() {
    let sess = open("BrandedEndSlide", None).unwrap();
    let mut sink = JsonLinesSink::new(Vec::new());
    sess.render_range(FrameRange::new(FrameIndex(0), FrameIndex(5)).unwrap(), &mut sink)
        .unwrap();
    let bytes = sink.into_inner().unwrap();
    let lines: Vec<serde_json::Value> = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0]["composition"], "BrandedEndSlide");
    assert_eq!(lines[3]["frame"], 2);
}

#[test]
fn script_thresholds_accumulate() {
    let script = Script::new()
        .at(20, StateDelta::insert("selected", "c3"))
        .at(35, StateDelta::insert("selected", "c4"))
        .at(50, StateDelta::insert("selected", "h1"));
    assert_eq!(derive_scene_state(40, &script).set("selected"), ["c3", "c4"]);
    assert!(derive_scene_state(19, &script).set("selected").is_empty());
}
