use std::fs;

use filmlib_api_core::LibraryEntry;
use filmlib_library_core::{
    DocumentSlot, FileSlot, Library, LibraryConfig, LibraryError, MemorySlot,
};
use filmlib_test_fixtures::{entries, external};
use tempfile::TempDir;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn library_in(dir: &TempDir) -> Library {
    Library::new(LibraryConfig::default().with_external_folder(dir.path()))
}

fn stage_demo() -> LibraryEntry {
    entries::load("stage-demo").unwrap()
}

#[test]
fn both_external_shapes_are_read_and_foreign_keys_ignored() {
    init_logs();
    let dir = TempDir::new().unwrap();
    external::copy_into("flat-walk", dir.path()).unwrap();
    external::copy_into("wrapped-run", dir.path()).unwrap();
    fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
    fs::write(dir.path().join("readme.txt"), "{}").unwrap();

    let lib = library_in(&dir);
    let ext = lib.read_external();
    let mut names: Vec<_> = ext.keys().cloned().collect();
    names.sort();
    assert_eq!(names, vec!["Run", "Walk"]);
    assert_eq!(ext["Walk"].frame_end(), Some(24));
}

#[test]
fn later_file_wins_on_name_collision() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"{"Walk": {"description": "from a", "tracks": []}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b.json"),
        r#"{"animations": {"Walk": {"description": "from b", "tracks": []}}}"#,
    )
    .unwrap();
    let lib = library_in(&dir);
    assert_eq!(lib.read_external()["Walk"].description, "from b");
}

#[test]
fn internal_shadows_external_in_merged_view() {
    let dir = TempDir::new().unwrap();
    external::copy_into("flat-walk", dir.path()).unwrap();
    let mut slot = MemorySlot::new();
    let mut lib = library_in(&dir);

    lib.put(&mut slot, "Walk", LibraryEntry::new("internal walk"))
        .unwrap();
    let merged = lib.entries(&slot);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged["Walk"].description, "internal walk");
}

#[test]
fn every_write_dirties_and_next_read_sees_it() {
    let dir = TempDir::new().unwrap();
    let mut slot = MemorySlot::new();
    let mut lib = library_in(&dir);
    assert!(lib.entries(&slot).is_empty());
    assert!(!lib.is_dirty());

    lib.put(&mut slot, "Demo", stage_demo()).unwrap();
    assert!(lib.is_dirty());
    assert!(lib.contains(&slot, "Demo"));

    assert!(lib.write_external_entry("Ext", &stage_demo()));
    assert!(lib.is_dirty());
    assert_eq!(lib.entry_names(&slot).len(), 2);

    assert!(lib.write_clip("Ext", &serde_json::json!({"name": "Ext", "tracks": []})));
    assert!(lib.is_dirty());
    // A clip file is not an entry.
    assert_eq!(lib.entry_names(&slot).len(), 2);

    assert!(lib.remove_external_entry("Ext"));
    assert!(lib.is_dirty());
    assert!(!lib.contains(&slot, "Ext"));

    assert!(lib.remove(&mut slot, "Demo").unwrap());
    assert!(lib.is_dirty());
    assert!(lib.entries(&slot).is_empty());

    lib.set_external_folder(None);
    assert!(lib.is_dirty());
}

#[test]
fn cached_reads_do_not_touch_disk() {
    let dir = TempDir::new().unwrap();
    let slot = MemorySlot::new();
    let mut lib = library_in(&dir);
    lib.entries(&slot);
    let refreshes = lib.cache().refreshes();

    // Written behind the library's back: invisible until invalidated.
    external::copy_into("flat-walk", dir.path()).unwrap();
    assert!(!lib.contains(&slot, "Walk"));
    assert_eq!(lib.cache().refreshes(), refreshes);

    lib.invalidate();
    assert!(lib.contains(&slot, "Walk"));
}

#[test]
fn missing_entry_is_not_found() {
    let mut lib = Library::new(LibraryConfig::default());
    let err = lib.get(&MemorySlot::new(), "doesNotExist").unwrap_err();
    assert!(matches!(err, LibraryError::NotFound(ref n) if n == "doesNotExist"));
}

#[test]
fn canonical_copy_is_wrapped_in_its_name() {
    let dir = TempDir::new().unwrap();
    let mut lib = library_in(&dir);
    assert!(lib.write_external_entry("Demo", &stage_demo()));

    let text = fs::read_to_string(dir.path().join("Demo.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(doc["Demo"]["tracks"].is_array());
    assert!(!lib.remove_clip("Demo"));
}

#[test]
fn no_external_folder_reports_failure() {
    let mut lib = Library::new(LibraryConfig::default());
    assert!(!lib.write_external_entry("Demo", &stage_demo()));
    assert!(!lib.remove_external_entry("Demo"));
    assert!(!lib.write_clip("Demo", &serde_json::json!({})));
    assert!(lib.read_external().is_empty());
}

#[test]
fn file_slot_persists_the_whole_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("procedural_animations.json");
    let mut slot = FileSlot::new(&path);
    assert!(slot.load().is_none());

    let mut lib = Library::new(LibraryConfig::default());
    lib.put(&mut slot, "Demo", stage_demo()).unwrap();
    lib.remove(&mut slot, "Demo").unwrap();

    let doc: serde_json::Value = serde_json::from_str(&slot.load().unwrap()).unwrap();
    assert_eq!(doc, serde_json::json!({"animations": {}}));
}

#[test]
fn unknown_entry_fields_survive_a_rewrite() {
    let mut slot = MemorySlot::with_text(
        r#"{"animations": {"A": {"description": "x", "tracks": [], "author": "kim"}}}"#,
    );
    let mut lib = Library::new(LibraryConfig::default());
    lib.put(&mut slot, "B", LibraryEntry::new("y")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(slot.text().unwrap()).unwrap();
    assert_eq!(doc["animations"]["A"]["author"], "kim");
    assert_eq!(
        doc["animations"].as_object().unwrap().keys().collect::<Vec<_>>(),
        vec!["A", "B"]
    );
}

#[test]
fn hand_edited_entries_stay_reachable() {
    init_logs();
    let cases = [
        ("float marker frame", r#"{"timeline_markers": [{"name": "m", "frame": 12.0}]}"#),
        (
            "nameless curve set",
            r#"{"tracks": [{"object_name": "Cube", "animation": {"tracks": [{"strips": [
                {"name": "S", "action": {"fcurves": [{"data_path": "location", "keyframes": []}]}}
            ]}]}}]}"#,
        ),
        (
            "null blend type",
            r#"{"tracks": [{"object_name": "Cube", "animation": {"tracks": [{"strips": [
                {"name": "S", "blend_type": null, "use_reverse": null}
            ]}]}}]}"#,
        ),
        ("null strips", r#"{"tracks": [{"object_name": "Cube", "animation": {"tracks": [{"strips": null}]}}]}"#),
    ];
    for (case, entry) in cases {
        let slot = MemorySlot::with_text(format!(r#"{{"animations": {{"A": {entry}}}}}"#));
        let mut lib = Library::new(LibraryConfig::default());
        assert!(lib.get(&slot, "A").is_ok(), "{case}: entry dropped");
    }
}
