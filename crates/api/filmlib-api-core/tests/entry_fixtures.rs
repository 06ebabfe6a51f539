use filmlib_api_core::{
    channel::{find_keyframes, Channel, FADE, OPACITY},
    BlendType, LibraryEntry, VisibilityMode,
};

#[test]
fn stage_demo_fixture_loads_with_full_strip_fields() {
    let entry: LibraryEntry =
        filmlib_test_fixtures::entries::load("stage-demo").expect("load stage-demo fixture");

    assert_eq!(entry.frame_start(), Some(0));
    assert_eq!(entry.frame_end(), Some(48));
    assert_eq!(entry.visible_objects_mode, VisibilityMode::Selected);
    assert_eq!(
        entry.object_names().collect::<Vec<_>>(),
        vec!["Cube", "Camera"]
    );

    let cube = entry.track_for("Cube").expect("cube track");
    let strip = cube.animation.strips().next().expect("cube strip");
    assert_eq!(strip.frame_start, Some(10.0));
    assert_eq!(strip.scale, Some(2.0));
    assert_eq!(strip.blend_type, BlendType::Replace);

    let channels = cube.animation.curves().map(Channel::Serialized);
    let opacity = find_keyframes(channels, OPACITY, 0);
    assert_eq!(opacity, vec![(0.0, -0.5), (10.0, 1.5)]);

    let camera = entry.track_for("Camera").expect("camera track");
    assert_eq!(
        camera.animation.active_action_name.as_deref(),
        Some("CameraPan")
    );
    let fade = find_keyframes(camera.animation.curves().map(Channel::Serialized), FADE, 0);
    assert_eq!(fade.len(), 3);

    let names: Vec<_> = entry.curve_set_names().into_iter().collect();
    assert_eq!(names, vec!["CameraPan".to_string(), "CubeMove".to_string()]);
}

#[test]
fn legacy_fixture_exposes_loose_action() {
    let entry: LibraryEntry =
        filmlib_test_fixtures::entries::load("legacy-action").expect("load legacy fixture");
    let cube = entry.track_for("Cube").expect("cube track");
    assert!(!cube.animation.has_track_structure());
    let action = cube.animation.action.as_ref().expect("legacy action");
    assert_eq!(action.name, "OldMove");
    assert!(entry.curve_set_names().contains("OldMove"));
    assert!(entry.timeline_markers.is_none());
    assert_eq!(entry.visible_objects_mode, VisibilityMode::All);
}
