use filmlib_codec_core::{clear_object_animation, CaptureOptions, MemoryHost, ObjectKind, SceneHost};
use filmlib_library_core::LibraryError;
use filmlib_orchestrator::{Orchestrator, OrchestratorConfig};
use filmlib_test_fixtures::external;
use tempfile::TempDir;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene() -> MemoryHost {
    let mut host = MemoryHost::new();
    host.add_object("Cube", ObjectKind::Mesh)
        .add_object("Lamp", ObjectKind::Light);
    host.set_frame_start(0).unwrap();
    host.set_frame_end(48).unwrap();
    host.add_curve_set("Move", &[("location", 0, &[(0.0, 0.0), (48.0, 4.0)])])
        .unwrap();
    host.ensure_animation("Cube").unwrap();
    let t = host.new_track("Cube", "Track_Move").unwrap();
    host.new_strip("Cube", t, "Move", 0, Some("Move")).unwrap();
    host
}

fn orchestrator(dir: Option<&TempDir>) -> Orchestrator<MemoryHost> {
    let mut config = OrchestratorConfig::default();
    config.library.external_folder = dir.map(|d| d.path().to_path_buf());
    Orchestrator::new(scene(), config)
}

fn not_found(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<LibraryError>(), Some(LibraryError::NotFound(_)))
}

#[test]
fn save_creates_then_updates_in_place() {
    init_logs();
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(Some(&dir));

    let first = orch.save("Walk", "first take").unwrap();
    assert!(first.created);
    assert_eq!(first.capture.captured, vec!["Cube".to_string()]);
    assert!(first.external_written);
    assert!(first.clip_written);
    assert!(dir.path().join("Walk.json").is_file());
    assert!(dir.path().join("three_Walk.json").is_file());

    let doc = orch.host.text("procedural_animations.json").unwrap();
    let doc: serde_json::Value = serde_json::from_str(&doc).unwrap();
    assert_eq!(doc["animations"]["Walk"]["description"], "first take");

    let second = orch.save("Walk", "ignored on update").unwrap();
    assert!(!second.created);
    assert_eq!(orch.get("Walk").unwrap().description, "first take");
    assert_eq!(orch.entry_names(), vec!["Walk".to_string()]);
}

#[test]
fn baked_clip_file_matches_the_scene() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(Some(&dir));
    orch.save("Walk", "").unwrap();

    let text = std::fs::read_to_string(dir.path().join("three_Walk.json")).unwrap();
    let clip: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(clip["name"], "Walk");
    assert_eq!(clip["tracks"][0]["name"], "Cube.position");
    assert_eq!(clip["tracks"][0]["times"], serde_json::json!([0.0, 2.0]));
}

#[test]
fn without_a_folder_only_the_internal_document_is_written() {
    let mut orch = orchestrator(None);
    let report = orch.save("Walk", "").unwrap();
    assert!(!report.external_written);
    assert!(!report.clip_written);
    assert!(orch.contains("Walk"));
    assert!(!orch.export_clip("Walk").unwrap());
    assert_eq!(orch.bake("Walk").unwrap().tracks.len(), 1);
}

#[test]
fn apply_of_a_missing_entry_leaves_the_scene_alone() {
    let mut orch = orchestrator(None);
    let before = orch.host.animation("Cube");
    let frame = orch.host.current_frame();

    let err = orch.apply("doesNotExist").unwrap_err();
    assert!(not_found(&err));
    assert_eq!(orch.host.animation("Cube"), before);
    assert_eq!(orch.host.current_frame(), frame);
    assert_eq!(orch.host.frame_range().unwrap(), (0, 48));
}

#[test]
fn apply_restores_cleared_animation() {
    let mut orch = orchestrator(None);
    orch.save("Walk", "").unwrap();
    clear_object_animation(&mut orch.host, "Cube");
    assert!(orch.host.animation("Cube").is_none());

    let report = orch.apply("Walk").unwrap();
    assert_eq!(report.applied, vec!["Cube".to_string()]);
    let binding = orch.host.animation("Cube").unwrap();
    assert_eq!(binding.tracks.len(), 1);
    assert_eq!(binding.tracks[0].strips[0].curve_set.as_deref(), Some("Move"));
}

#[test]
fn full_delete_purges_curve_sets_and_files() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(Some(&dir));
    orch.save("Walk", "").unwrap();

    let report = orch.delete("Walk", true).unwrap();
    assert!(report.removed_internal);
    assert!(report.external_removed);
    assert!(report.clip_removed);
    let purge = report.purge.unwrap();
    assert_eq!(purge.curve_sets_removed, vec!["Move".to_string()]);
    assert!(!orch.host.has_curve_set("Move"));
    assert!(orch.host.animation("Cube").map_or(true, |b| b.tracks.is_empty()));
    assert!(!dir.path().join("Walk.json").exists());
    assert!(!dir.path().join("three_Walk.json").exists());
    assert!(orch.entry_names().is_empty());
}

#[test]
fn curve_sets_shared_with_another_entry_survive() {
    let mut orch = orchestrator(None);
    orch.save("A", "").unwrap();
    orch.save("B", "").unwrap();

    let report = orch.delete("A", true).unwrap();
    assert_eq!(report.kept_shared, vec!["Move".to_string()]);
    assert!(report.purge.unwrap().curve_sets_removed.is_empty());
    assert!(orch.host.has_curve_set("Move"));
    assert_eq!(orch.entry_names(), vec!["B".to_string()]);
}

#[test]
fn delete_reports_where_the_entry_lived() {
    let dir = TempDir::new().unwrap();
    let copied = external::copy_into("flat-walk", dir.path()).unwrap();
    std::fs::rename(copied, dir.path().join("Walk.json")).unwrap();
    let mut orch = orchestrator(Some(&dir));
    assert!(orch.contains("Walk"));

    let report = orch.delete("Walk", false).unwrap();
    assert!(!report.removed_internal);
    assert!(report.external_removed);
    assert!(!report.clip_removed);
    assert!(report.purge.is_none());
    assert!(orch.host.has_curve_set("Move"));

    let err = orch.delete("Walk", false).unwrap_err();
    assert!(not_found(&err));
}

#[test]
fn selected_save_records_the_visible_set() {
    let mut orch = orchestrator(None);
    orch.host.select("Cube", true);
    orch.save_with("Solo", "", &CaptureOptions::selected()).unwrap();
    let entry = orch.get("Solo").unwrap();
    assert_eq!(entry.visible_objects, Some(vec!["Cube".to_string()]));

    orch.apply("Solo").unwrap();
    assert!(orch.host.is_hidden("Lamp"));
    assert!(!orch.host.is_hidden("Cube"));
}

#[test]
fn switching_folders_changes_the_merged_view() {
    let dir = TempDir::new().unwrap();
    external::copy_into("wrapped-run", dir.path()).unwrap();
    let mut orch = orchestrator(None);
    assert!(orch.entry_names().is_empty());

    orch.set_external_folder(Some(dir.path().to_path_buf()));
    assert_eq!(orch.entry_names(), vec!["Run".to_string()]);
    assert_eq!(orch.external_folder(), Some(dir.path()));

    orch.set_external_folder(None);
    assert!(orch.entry_names().is_empty());
}
