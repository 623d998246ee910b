use super::*;
use crate::animation::interpolate::InterpolateOpts;

fn selection() -> Script {
    Script::new()
        .at(20, StateDelta::insert("selected", "c3"))
        .at(35, StateDelta::insert("selected", "c4"))
        .at(50, StateDelta::insert("selected", "h1"))
}

#[test]
fn thresholds_accumulate_up_to_frame() {
    let snap = derive_scene_state(40, &selection());
    assert_eq!(snap.set("selected"), ["c3", "c4"]);
    assert!(!snap.contains("selected", "h1"));

    assert!(derive_scene_state(19, &selection()).set("selected").is_empty());
    assert_eq!(derive_scene_state(50, &selection()).set("selected").len(), 3);
}

#[test]
fn seeking_backwards_matches_fresh_evaluation() {
    let script = selection();
    let fresh = derive_scene_state(30, &script);
    let _later = derive_scene_state(90, &script);
    assert_eq!(derive_scene_state(30, &script), fresh);
}

#[test]
fn equal_thresholds_keep_declaration_order() {
    let script = Script::new()
        .at(10, StateDelta::insert("s", "a"))
        .at(10, StateDelta::remove("s", "a"))
        .at(5, StateDelta::insert("s", "b"));
    assert_eq!(derive_scene_state(10, &script).set("s"), ["b"]);

    let unordered = Script::from_steps(vec![
        (10, StateDelta::phase("status", "syncing")),
        (0, StateDelta::phase("status", "pending")),
        (10, StateDelta::phase("status", "completed")),
    ]);
    assert_eq!(derive_scene_state(10, &unordered).phase("status"), Some("completed"));
    assert_eq!(derive_scene_state(9, &unordered).phase("status"), Some("pending"));
}

#[test]
fn phases_flags_clear_and_progress() {
    let env = Envelope::new(vec![60.0, 180.0], vec![0.0, 1.0], InterpolateOpts::clamped()).unwrap();
    let script = Script::new()
        .at(0, StateDelta::insert("files", "x"))
        .at(45, StateDelta::flag("enabled", true))
        .at(60, StateDelta::progress("sync", env))
        .at(100, StateDelta::clear("files"));

    let early = derive_scene_state(10, &script);
    assert!(!early.flag("enabled"));
    assert_eq!(early.progress("sync"), 0.0);

    let mid = derive_scene_state(120, &script);
    assert!(mid.flag("enabled"));
    assert_eq!(mid.progress("sync"), 0.5);
    assert!(mid.set("files").is_empty());
    assert_eq!(derive_scene_state(500, &script).progress("sync"), 1.0);
}

#[test]
fn joined_at_tracks_membership_start() {
    let script = selection()
        .at(60, StateDelta::remove("selected", "c4"))
        .at(70, StateDelta::insert("selected", "c4"));
    assert_eq!(script.joined_at(10, "selected", "c3"), None);
    assert_eq!(script.joined_at(40, "selected", "c4"), Some(35));
    assert_eq!(script.joined_at(65, "selected", "c4"), None);
    assert_eq!(script.joined_at(90, "selected", "c4"), Some(70));
    assert_eq!(script.joined_at(90, "selected", "c3"), Some(20));
}
