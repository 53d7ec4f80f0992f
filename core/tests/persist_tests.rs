use std::fs;
use tempfile::tempdir;
use vsm_core::persist::{load_meta, load_postings_text, load_snapshot, save_meta, save_snapshot, IndexPaths, MetaFile, FORMAT_VERSION};
use vsm_core::{build_index, search, SearchOptions};

fn tiny_index() -> vsm_core::InvertedIndex {
    build_index([
        ("a.txt", "Warwickshire came from an ancient family"),
        ("b.txt", "the heiress to some land"),
        ("c.txt", "an ancient land"),
    ])
    .unwrap()
}

#[test]
fn snapshot_round_trip_ranks_identically() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let index = tiny_index();

    let meta = save_snapshot(&paths, &index).unwrap();
    assert_eq!(meta.num_docs, 3);
    assert_eq!(meta.version, FORMAT_VERSION);

    let (loaded, loaded_meta) = load_snapshot(&paths).unwrap();
    assert_eq!(loaded_meta, meta);
    for q in ["ancient land", "heiress", "warwikshire", "nothing"] {
        assert_eq!(search(&loaded, q, &SearchOptions::default()), search(&index, q, &SearchOptions::default()));
    }
}

#[test]
fn postings_file_is_written_and_parseable() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let index = tiny_index();
    save_snapshot(&paths, &index).unwrap();

    let text = fs::read_to_string(paths.postings_text()).unwrap();
    assert!(text.lines().any(|l| l == "ancient 2 -> (a.txt,1) -> (c.txt,1)"));

    let parsed = load_postings_text(&paths.postings_text()).unwrap();
    assert_eq!(parsed.len(), index.num_terms());
    assert_eq!(parsed["land"].len(), 2);
}

#[test]
fn mismatched_meta_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &tiny_index()).unwrap();

    let meta = load_meta(&paths).unwrap();
    save_meta(&paths, &MetaFile { num_docs: 99, ..meta.clone() }).unwrap();
    assert!(load_snapshot(&paths).is_err());

    save_meta(&paths, &MetaFile { version: FORMAT_VERSION + 1, ..meta }).unwrap();
    let err = load_snapshot(&paths).unwrap_err();
    assert!(err.to_string().contains("unsupported index version"));
}

#[test]
fn missing_snapshot_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_snapshot(&IndexPaths::new(dir.path().join("nope"))).is_err());
}
