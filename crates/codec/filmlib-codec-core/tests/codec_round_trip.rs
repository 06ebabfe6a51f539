use approx::assert_relative_eq;
use filmlib_api_core::{Interpolation, LiveCurveSet};
use filmlib_codec_core::{
    deserialize_curve_set, deserialize_tracks, serialize_curve_set, serialize_tracks,
    CurveSetResolution, MemoryHost, ObjectKind, SceneHost, StripProperty, StripRef,
};

fn sorted_points(set: &LiveCurveSet) -> Vec<(String, i32, Vec<(f64, f64, Interpolation)>)> {
    let mut out: Vec<_> = set
        .curves
        .iter()
        .map(|c| {
            let mut keys: Vec<_> = c
                .keyframes
                .iter()
                .map(|k| (k.frame, k.value, k.interpolation.clone()))
                .collect();
            keys.sort_by(|a, b| a.0.total_cmp(&b.0));
            (c.data_path.clone(), c.array_index, keys)
        })
        .collect();
    out.sort_by(|a, b| (a.0.as_str(), a.1).cmp(&(b.0.as_str(), b.1)));
    out
}

fn animated_host() -> MemoryHost {
    let mut host = MemoryHost::new();
    host.add_object("Cube", ObjectKind::Mesh);
    host.add_curve_set(
        "Walk",
        &[
            ("location", 0, &[(1.0, 0.0), (12.0, 4.0), (24.0, 0.5)]),
            ("location", 2, &[(1.0, 1.0), (24.0, 1.0)]),
            ("rotation_euler", 1, &[(1.0, 0.0), (24.0, 3.1)]),
            ("scale", 0, &[(6.0, 1.0), (18.0, 2.0)]),
            ("color", 3, &[(1.0, 1.0), (24.0, 0.0)]),
            ("[\"alpha\"]", 0, &[(1.0, 0.2)]),
        ],
    )
    .unwrap();
    host.set_keyframe_interpolation("Walk", "location", 0, 12.0, &Interpolation::Constant)
        .unwrap();
    host
}

#[test]
fn curve_set_round_trips_under_a_distinct_name() {
    let mut host = animated_host();
    let original = host.curve_set("Walk").unwrap();
    let mut data = serialize_curve_set(Some(&original)).unwrap();
    assert_eq!(data.frame_range, [1.0, 24.0]);

    data.name = String::new();
    let resolved = deserialize_curve_set(&mut host, &data, Some("Walk_copy")).unwrap();
    assert_eq!(resolved, CurveSetResolution::Created("Walk_copy".into()));

    let copy = host.curve_set("Walk_copy").unwrap();
    assert_eq!(sorted_points(&copy), sorted_points(&original));
}

#[test]
fn deserializing_twice_reuses_the_same_set() {
    let mut host = animated_host();
    let data = serialize_curve_set(host.curve_set("Walk").as_ref()).unwrap();
    let before = host.curve_set_names().len();

    let first = deserialize_curve_set(&mut host, &data, None).unwrap();
    let second = deserialize_curve_set(&mut host, &data, None).unwrap();
    assert_eq!(first, CurveSetResolution::Reused("Walk".into()));
    assert_eq!(first, second);
    assert_eq!(host.curve_set_names().len(), before);
}

#[test]
fn name_collision_after_removal_creates_fresh_set() {
    let mut host = animated_host();
    let data = serialize_curve_set(host.curve_set("Walk").as_ref()).unwrap();
    host.remove_curve_set("Walk").unwrap();
    let r = deserialize_curve_set(&mut host, &data, None).unwrap();
    assert_eq!(r, CurveSetResolution::Created("Walk".into()));
}

#[test]
fn unknown_interpolation_does_not_abort_other_points() {
    let mut host = MemoryHost::new();
    let mut data = serialize_curve_set(animated_host().curve_set("Walk").as_ref()).unwrap();
    data.curves[0].points[1].interpolation = Some(Interpolation::Other("SPRING".into()));

    let r = deserialize_curve_set(&mut host, &data, None).unwrap();
    let set = host.curve_set(r.name()).unwrap();
    let loc = set.curve("location", 0).unwrap();
    assert_eq!(loc.keyframes.len(), 3);
    assert_eq!(loc.keyframes[0].interpolation, Interpolation::Linear);
    assert_eq!(loc.keyframes[1].interpolation, Interpolation::default());
}

#[test]
fn tracks_replace_existing_structure_and_keep_strip_fields() {
    let mut src = animated_host();
    src.ensure_animation("Cube").unwrap();
    let t = src.new_track("Cube", "Main").unwrap();
    let s = src.new_strip("Cube", t, "WalkStrip", 10, Some("Walk")).unwrap();
    let target = StripRef {
        object: "Cube",
        track: t,
        strip: s,
    };
    src.set_strip_property(target, &StripProperty::Scale(2.0))
        .unwrap();
    src.set_strip_property(target, &StripProperty::Influence(0.5))
        .unwrap();
    src.set_active_curve_set("Cube", Some("Walk")).unwrap();

    let data = serialize_tracks(&src, "Cube");
    assert_eq!(data.active_action_name.as_deref(), Some("Walk"));
    let strip = &data.tracks[0].strips[0];
    assert_eq!(strip.action.as_ref().unwrap().name, "Walk");
    assert_relative_eq!(strip.scale.unwrap(), 2.0);

    let mut dst = MemoryHost::new();
    dst.add_object("Cube", ObjectKind::Mesh);
    dst.ensure_animation("Cube").unwrap();
    dst.new_track("Cube", "Stale").unwrap();
    dst.new_track("Cube", "Stale2").unwrap();

    let restored = deserialize_tracks(&mut dst, "Cube", &data).unwrap();
    assert_eq!(restored.curve_sets, vec!["Walk".to_string()]);
    assert_eq!(restored.saved_active.as_deref(), Some("Walk"));
    assert_eq!(restored.tracks_created, 1);
    assert_eq!(restored.fields_skipped, 0);

    let binding = dst.animation("Cube").unwrap();
    assert_eq!(binding.tracks.len(), 1);
    assert_eq!(binding.tracks[0].name, "Main");
    let strip = &binding.tracks[0].strips[0];
    assert_relative_eq!(strip.frame_start, 10.0);
    assert_relative_eq!(strip.scale.unwrap(), 2.0);
    assert_relative_eq!(strip.influence.unwrap(), 0.5);
    assert_eq!(strip.curve_set.as_deref(), Some("Walk"));
}

#[test]
fn object_without_animation_serializes_empty() {
    let host = animated_host();
    let data = serialize_tracks(&host, "Cube");
    assert!(data.active_action_name.is_none());
    assert!(data.tracks.is_empty());
    assert!(serialize_tracks(&host, "Nope").tracks.is_empty());
}
