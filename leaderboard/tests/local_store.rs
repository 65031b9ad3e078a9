use std::fs;

use asteroids_core::{HighscoreEntry, HighscoreList};
use leaderboard::LocalStore;
use tempfile::TempDir;

fn test_store() -> (LocalStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("top10.json"));
    (store, dir)
}

fn sample_list() -> HighscoreList {
    let mut list = HighscoreList::new();
    list.insert("ALPHA", 1_200, 5, "TERMINATOR");
    list.insert("BRAVO", 800, 3, "THE WAVE");
    list
}

#[test]
fn missing_file_loads_empty() {
    let (store, _dir) = test_store();
    assert!(store.load().is_empty());
}

#[test]
fn save_then_load() {
    let (store, _dir) = test_store();
    let list = sample_list();
    store.save(&list).unwrap();
    assert_eq!(store.load(), list);
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let (store, dir) = test_store();
    store.save(&sample_list()).unwrap();
    store.save(&sample_list()).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["top10.json".to_string()]);
}

#[test]
fn save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("nested").join("scores.json"));
    store.save(&sample_list()).unwrap();
    assert_eq!(store.load().len(), 2);
}

#[test]
fn corrupt_file_loads_empty() {
    let (store, _dir) = test_store();
    fs::write(store.path(), b"{ not json").unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn invalid_rows_are_filtered_on_load() {
    let (store, _dir) = test_store();
    fs::write(
        store.path(),
        br#"[
            {"name":"GOOD ","score":500,"wave":2,"ship":"THE WAVE"},
            {"name":"TOOLONG","score":900,"wave":2},
            {"name":"ZERO ","score":0,"wave":1},
            {"name":"OLDIE","score":300,"wave":1}
        ]"#,
    )
    .unwrap();

    let list = store.load();
    let names: Vec<&str> = list.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["GOOD ", "OLDIE"]);
    assert_eq!(list.entries()[1].ship, "");
}

#[test]
fn mistyped_rows_do_not_discard_the_table() {
    let (store, _dir) = test_store();
    fs::write(
        store.path(),
        br#"[
            {"name":"GOOD ","score":500,"wave":2},
            {"name":"BAD  ","score":"abc","wave":1},
            {"score":700,"wave":3},
            "not a row",
            {"name":"LATER","score":450,"wave":"2"}
        ]"#,
    )
    .unwrap();

    let list = store.load();
    assert_eq!(list.len(), 1);
    assert_eq!(list.entries()[0].name, "GOOD ");
    assert_eq!(list.entries()[0].score, 500);
}

#[test]
fn stored_file_is_a_plain_row_array() {
    let (store, _dir) = test_store();
    store.save(&sample_list()).unwrap();
    let rows: Vec<HighscoreEntry> =
        serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "ALPHA");
}
