use chronolane::{
    EventSource, FileSource, SourceError, StaticSource, load_events, load_events_strict,
    source_from_location,
};
use futures::executor::block_on;
use std::io::Write;

const PAYLOAD: &str = r#"[
  {"id": "a", "date": "2026-01-02", "title": "Kickoff"},
  {"id": 7, "date": "2026-01-05", "section": "engineering", "labels": ["rust"]}
]"#;

fn temp_payload(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_source_reads_events() {
    let file = temp_payload(PAYLOAD);
    let source = FileSource::new(file.path());
    let events = block_on(load_events(&source));
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["a", "7"]);
    assert_eq!(events[1].section.as_str(), "engineering");
}

#[test]
fn file_urls_and_plain_paths_resolve_to_files() {
    let file = temp_payload(PAYLOAD);
    let url = url::Url::from_file_path(file.path()).unwrap().to_string();

    let from_url = source_from_location(&url).unwrap();
    assert_eq!(block_on(load_events(from_url.as_ref())).len(), 2);

    let plain = file.path().to_str().unwrap();
    let from_path = source_from_location(plain).unwrap();
    assert_eq!(block_on(load_events(from_path.as_ref())).len(), 2);
}

#[test]
fn remote_schemes_are_rejected() {
    assert!(matches!(
        source_from_location("https://example.com/events.json"),
        Err(SourceError::UnsupportedLocation { .. })
    ));
}

#[test]
fn fetch_failures_degrade_to_no_events() {
    let dir = tempfile::tempdir().unwrap();
    let missing = FileSource::new(dir.path().join("missing.json"));
    assert!(block_on(load_events(&missing)).is_empty());
    assert!(matches!(
        block_on(load_events_strict(&missing)),
        Err(SourceError::Io { .. })
    ));
}

#[test]
fn malformed_payloads_degrade_to_no_events() {
    let garbage = StaticSource::new("{not json");
    assert!(block_on(load_events(&garbage)).is_empty());
    assert!(matches!(
        block_on(load_events_strict(&garbage)),
        Err(SourceError::Decode(_))
    ));

    let not_a_list = StaticSource::new(r#"{"id": "a"}"#);
    assert!(block_on(load_events(&not_a_list)).is_empty());
}

#[test]
fn static_source_describes_itself() {
    let source = StaticSource::new(PAYLOAD);
    assert!(source.describe().starts_with("<static "));
    assert_eq!(block_on(source.fetch()).unwrap(), PAYLOAD.as_bytes());
}
