use ethos_core::FacilitationFlow;
use ethos_remote::{SubmissionOutcome, Submitter};
use ethos_session::{ReflectionField, Session, Step};
use ethos_store::{FileStore, Persistence};
use ethos_test_utils::{sample_catalog, RecordingRemote};
use std::path::Path;
use std::sync::Arc;

fn open(dir: &Path, remote: &Arc<RecordingRemote>) -> FacilitationFlow {
    FacilitationFlow::open(
        sample_catalog(),
        Persistence::new(FileStore::new(dir)),
        Submitter::new(remote.clone()),
    )
}

/// Walk a fresh flow up to `Reflection` with one issue and one safeguard.
fn to_reflection(flow: &mut FacilitationFlow) {
    flow.begin("Metro Desk").unwrap();
    flow.select_scenario(0).unwrap();
    flow.add_issue("Consent of the person shown").unwrap();
    flow.advance().unwrap();
    flow.add_safeguard("Forensic review before airing", ["Accuracy", "Transparency"])
        .unwrap();
    flow.advance().unwrap();
    assert_eq!(flow.step(), Step::Reflection);
}

#[tokio::test]
async fn every_summary_arrival_submits_once() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::new());
    let mut flow = open(dir.path(), &remote);
    to_reflection(&mut flow);

    let first = flow.finish().unwrap().submission.unwrap();
    assert!(matches!(first.outcome().await, SubmissionOutcome::Stored { .. }));

    // Staying put is not an arrival.
    assert!(flow.go_to(Step::Summary).unwrap().submission.is_none());

    flow.back().unwrap();
    let second = flow.advance().unwrap().submission.unwrap();
    second.outcome().await;

    let records = remote.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].team_name, "Metro Desk");
    assert_eq!(
        records[0].safeguards,
        "Forensic review before airing [Accuracy, Transparency]"
    );
}

#[tokio::test]
async fn resuming_into_summary_submits_again() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::new());
    {
        let mut flow = open(dir.path(), &remote);
        to_reflection(&mut flow);
        flow.set_reflection(ReflectionField::Hardest, "Holding the story")
            .unwrap();
    }
    assert_eq!(remote.count(), 0);

    let mut reopened = open(dir.path(), &remote);
    assert!(reopened.is_resumable());
    let change = reopened.begin("Metro Desk").unwrap();
    assert_eq!(change.to, Step::Summary);
    change.submission.unwrap().outcome().await;
    assert_eq!(remote.count(), 1);
}

#[tokio::test]
async fn resumption_follows_the_data() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::new());
    {
        let mut flow = open(dir.path(), &remote);
        flow.begin("Sports").unwrap();
        flow.select_scenario(2).unwrap();
        flow.add_issue("Consent").unwrap();
    }

    let mut reopened = open(dir.path(), &remote);
    assert_eq!(reopened.step(), Step::Welcome);
    let change = reopened.begin("Sports").unwrap();
    assert_eq!(change.to, Step::Safeguards);
    assert!(change.submission.is_none());
    assert_eq!(
        reopened.session().work().unwrap().scenario().title,
        "Scraped Faces"
    );
}

#[tokio::test]
async fn restart_then_reload_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::new());
    {
        let mut flow = open(dir.path(), &remote);
        to_reflection(&mut flow);
        let change = flow.restart();
        assert_eq!(change.to, Step::Welcome);
        assert_eq!(*flow.session(), Session::Empty);
    }

    let reopened = open(dir.path(), &remote);
    assert_eq!(*reopened.session(), Session::Empty);
    assert!(!reopened.is_resumable());
}

#[tokio::test]
async fn new_team_name_discards_saved_work() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::new());
    {
        let mut flow = open(dir.path(), &remote);
        flow.begin("Team A").unwrap();
        flow.select_scenario(1).unwrap();
        flow.add_issue("Fabricated quotes").unwrap();
    }

    let mut reopened = open(dir.path(), &remote);
    let change = reopened.begin("Team B").unwrap();
    assert_eq!(change.to, Step::Selection);
    assert!(!reopened.session().has_scenario());

    let again = open(dir.path(), &remote);
    assert_eq!(again.session().team().unwrap().as_str(), "Team B");
    assert!(!again.session().has_scenario());
}

#[tokio::test]
async fn rejected_submission_keeps_local_state() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::rejecting("Invalid permissions"));
    let mut flow = open(dir.path(), &remote);
    to_reflection(&mut flow);

    let outcome = flow.finish().unwrap().submission.unwrap().outcome().await;
    assert!(outcome.is_warning());
    assert_eq!(flow.step(), Step::Summary);
    assert!(flow
        .export(chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
        .is_ok());

    let reopened = open(dir.path(), &remote);
    assert_eq!(reopened.session(), flow.session());
}

#[tokio::test]
async fn removals_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(RecordingRemote::new());
    {
        let mut flow = open(dir.path(), &remote);
        flow.begin("Metro Desk").unwrap();
        flow.select_scenario(0).unwrap();
        for issue in ["Consent", "Speed", "Sourcing"] {
            flow.add_issue(issue).unwrap();
        }
        assert_eq!(flow.remove_issue(1).unwrap(), "Speed");
        flow.advance().unwrap();
        flow.add_safeguard("Forensic review", ["Accuracy"]).unwrap();
        flow.add_safeguard("Label synthetic media", ["Transparency"])
            .unwrap();
        flow.add_safeguard("Editor sign-off", ["Accountability"])
            .unwrap();
        assert_eq!(flow.remove_safeguard(0).unwrap().text(), "Forensic review");
    }

    let mut reopened = open(dir.path(), &remote);
    assert_eq!(reopened.begin("Metro Desk").unwrap().to, Step::Reflection);

    let work = reopened.session().work().unwrap();
    assert_eq!(
        work.issues().to_vec(),
        vec!["Consent".to_string(), "Sourcing".to_string()]
    );
    let safeguards: Vec<&str> = work.safeguards().iter().map(|s| s.text()).collect();
    assert_eq!(safeguards, ["Label synthetic media", "Editor sign-off"]);
    assert_eq!(remote.count(), 0);
}
