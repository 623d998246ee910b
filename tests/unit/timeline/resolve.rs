use super::*;
use crate::audio::cue::{AudioCue, AudioKey};
use crate::timeline::sequence::Series;

fn window_node() -> Sequence {
    Sequence::new("root").child(Sequence::new("toggle").at(15).lasting(50))
}

#[test]
fn activation_window_boundaries() {
    let tl = Timeline::new(window_node(), 100).unwrap();
    let toggle = tl.find("root/toggle").unwrap();

    let at = |f: u64| tl.resolve(FrameIndex(f))[toggle.0 as usize];
    assert!(!at(14).active);
    assert!(!at(65).active);
    for f in 15..=64 {
        assert!(at(f).active, "frame {f}");
    }
    assert_eq!(at(15).local(), Some(0));
    assert_eq!(at(64).local(), Some(49));
    assert_eq!(at(65).local(), None);
}

#[test]
fn sequence_helpers_agree_with_resolution() {
    let node = Sequence::new("n").at(15).lasting(50);
    assert!(!node.is_active(14));
    assert!(node.is_active(15));
    assert!(!node.is_active(65));
    assert_eq!(node.local_frame(64), Some(49));
    assert_eq!(node.local_frame(70), None);
    assert_eq!(node.end(), Some(65));
}

#[test]
fn nested_children_use_parent_local_time() {
    let root = Sequence::new("root").child(
        Sequence::new("act")
            .at(100)
            .lasting(60)
            .child(Sequence::new("inner").at(10).lasting(100)),
    );
    let tl = Timeline::new(root, 300).unwrap();
    let inner = tl.find("root/act/inner").unwrap();
    assert_eq!(tl.child(tl.find("root/act").unwrap(), "inner"), Some(inner));

    let ctx = tl.resolve(FrameIndex(115))[inner.0 as usize];
    assert_eq!(ctx.local(), Some(5));

    // Parent window ends at 160 even though the child would run to 210.
    let ctx = tl.resolve(FrameIndex(170))[inner.0 as usize];
    assert!(!ctx.active);
    assert_eq!(tl.window(inner), GlobalWindow { start: 110, end: Some(160) });
}

#[test]
fn degenerate_nodes_are_rejected_at_build_time() {
    let zero = Sequence::new("root").child(Sequence::new("z").lasting(0));
    assert!(matches!(
        Timeline::new(zero, 10).unwrap_err(),
        ReelError::DegenerateTimeline(_)
    ));

    let far_back = Sequence::new("root").child(Sequence::new("early").at(-10));
    assert!(matches!(
        Timeline::new(far_back, 10).unwrap_err(),
        ReelError::DegenerateTimeline(_)
    ));

    let slightly_back = Sequence::new("root").child(Sequence::new("early").at(-9));
    assert!(Timeline::new(slightly_back, 10).is_ok());

    assert!(Timeline::new(Sequence::new("root"), 0).is_err());
}

#[test]
fn duplicate_sibling_names_are_rejected() {
    let root = Sequence::new("root")
        .child(Sequence::new("a"))
        .child(Sequence::new("a"));
    assert!(matches!(
        Timeline::new(root, 10).unwrap_err(),
        ReelError::Validation(_)
    ));
}

#[test]
fn cues_fire_once_on_activation() {
    let root = Sequence::new("root")
        .cue(AudioCue::new(AudioKey::Swoosh))
        .child(Sequence::sound("click", 45, AudioCue::new(AudioKey::ToggleOn)));
    let tl = Timeline::new(root, 240).unwrap();

    let fired: Vec<(u64, AudioKey)> = (0..240)
        .flat_map(|f| {
            tl.cues_at(FrameIndex(f))
                .into_iter()
                .map(move |c| (f, c.cue.key))
        })
        .collect();
    assert_eq!(fired, vec![(0, AudioKey::Swoosh), (45, AudioKey::ToggleOn)]);

    // Re-evaluating the same frame does not accumulate anything.
    assert_eq!(tl.cues_at(FrameIndex(45)), tl.cues_at(FrameIndex(45)));
}

#[test]
fn negative_offset_activates_at_first_frame() {
    let root = Sequence::new("root").child(Sequence::sound("late", -5, AudioCue::new(AudioKey::Tick)));
    let tl = Timeline::new(root, 20).unwrap();
    let late = tl.find("root/late").unwrap();
    assert_eq!(tl.activation_frame(late), Some(0));
    assert_eq!(tl.resolve(FrameIndex(0))[late.0 as usize].local(), Some(5));
    assert_eq!(tl.cues_at(FrameIndex(0)).len(), 1);
}

#[test]
fn series_lays_items_back_to_back() {
    let root = Series::new()
        .then(Sequence::new("hook").lasting(75))
        .then(Sequence::new("context").lasting(45))
        .then_offset(Sequence::new("hero").lasting(240), -10)
        .then(Sequence::new("outro"))
        .attach(Sequence::new("root"))
        .unwrap();
    let froms: Vec<i64> = root.children.iter().map(|c| c.from).collect();
    assert_eq!(froms, vec![0, 75, 110, 350]);

    let bad = Series::new()
        .then(Sequence::new("open"))
        .then(Sequence::new("after").lasting(5))
        .into_children();
    assert!(bad.is_err());
}
