use ethos_scenario::{ScenarioCatalog, ScenarioDefinition};
use ethos_session::{ReflectionField, Session};
use ethos_store::{FileStore, Persistence, SessionStore};

fn catalog() -> ScenarioCatalog {
    ScenarioCatalog::new(vec![
        ScenarioDefinition::new("Deepfake", "A clip goes viral.").with_signal("unverified"),
        ScenarioDefinition::new("Obituaries", "A vendor pitch."),
    ])
    .unwrap()
}

fn populated() -> Session {
    let mut session = Session::new();
    session.set_team_name("Metro Desk").unwrap();
    session
        .select_scenario(0, catalog().get(0).unwrap().clone())
        .unwrap();
    session.add_issue("consent").unwrap();
    session
        .add_safeguard("Verify with two sources", ["Accuracy", "Accountability"])
        .unwrap();
    session
        .set_reflection_field(ReflectionField::Confidence, "4")
        .unwrap();
    session
}

#[test]
fn test_file_persistence_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let session = populated();

    Persistence::new(FileStore::new(dir.path())).save(&session);

    let reopened = Persistence::new(FileStore::new(dir.path()));
    assert_eq!(reopened.load(&catalog()), session);
}

#[test]
fn test_clear_then_load_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = Persistence::new(FileStore::new(dir.path()));

    persistence.save(&populated());
    persistence.clear();

    let reloaded = Persistence::new(FileStore::new(dir.path())).load(&catalog());
    assert_eq!(reloaded, Session::Empty);
    assert!(reloaded.work().is_none());
}

#[test]
fn test_unwritable_store_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let store = FileStore::new(&blocker);
    assert!(store.put("x").is_err());

    let persistence = Persistence::new(store);
    assert!(!persistence.save(&populated()));
    assert_eq!(persistence.load(&catalog()), Session::Empty);
}

#[test]
fn test_load_picks_up_catalog_changes() {
    let dir = tempfile::tempdir().unwrap();
    Persistence::new(FileStore::new(dir.path())).save(&populated());

    let updated = ScenarioCatalog::new(vec![
        ScenarioDefinition::new("Obituaries", "A vendor pitch."),
        ScenarioDefinition::new("Deepfake", "A clip goes viral, again.").with_signal("new"),
    ])
    .unwrap();

    let session = Persistence::new(FileStore::new(dir.path())).load(&updated);
    let work = session.work().unwrap();
    assert_eq!(work.scenario_index(), 1);
    assert_eq!(work.scenario().story, "A clip goes viral, again.");
    assert_eq!(work.issues(), ["consent"]);
}
