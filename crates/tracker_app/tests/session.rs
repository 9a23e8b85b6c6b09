use std::fs;
use std::sync::Once;

use tempfile::TempDir;
use tracker_app::{Session, TrackerConfig};
use tracker_core::{Msg, Notice, Selector, SessionState};
use tracker_engine::{PersistError, UploadError};

const SCENARIO: &str = "Subject,Topic,ItemTitle,ItemURL\n\
                        Math,Algebra,Lesson 1,u1\n\
                        Math,Algebra,,u2\n\
                        Sci,Bio,Cell,u3\n";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

fn open(temp: &TempDir) -> Session {
    init_logging();
    Session::open(&TrackerConfig::with_progress_file(
        temp.path().join("progress.json"),
    ))
}

fn counts(session: &Session) -> (usize, usize) {
    let overall = session.overall();
    (overall.done, overall.total)
}

#[test]
fn upload_toggle_reset_scenario() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);

    let catalog = session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(counts(&session), (0, 3));
    assert_eq!(session.overall().pct, 0.0);

    session.toggle_item("u1", true).unwrap();
    assert_eq!(counts(&session), (1, 3));
    assert!((session.overall().pct - 1.0 / 3.0).abs() < 1e-9);

    session.reset_progress().unwrap();
    assert_eq!(counts(&session), (0, 3));
    assert_eq!(session.overall().pct, 0.0);
    assert!(session.store().state().is_empty());
}

#[test]
fn unsupported_upload_keeps_previous_catalog() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);

    let err = session.upload_catalog(b"whatever", "notes.txt").unwrap_err();
    assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
    assert!(session.catalog().is_none());

    session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    let err = session.upload_catalog(b"whatever", "notes.txt").unwrap_err();
    assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
    assert_eq!(session.catalog().map(|c| c.len()), Some(3));
    assert_eq!(
        session.view().notices,
        vec![
            Notice::UnsupportedFormat {
                filename: "notes.txt".into()
            },
            Notice::UnsupportedFormat {
                filename: "notes.txt".into()
            },
        ]
    );
}

#[test]
fn parse_error_is_reported_not_raised() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    let err = session
        .upload_catalog(b"Subject,ItemURL\nMath,u1,extra\n", "plan.csv")
        .unwrap_err();
    assert!(matches!(err, UploadError::Parse { .. }));
    assert_eq!(session.view().session, SessionState::NoCatalog);
    assert!(matches!(
        session.view().notices.as_slice(),
        [Notice::ParseFailed { .. }]
    ));
}

#[test]
fn empty_catalog_is_a_soft_warning() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    let catalog = session
        .upload_catalog(b"Subject,ItemURL\nMath,\n", "plan.csv")
        .unwrap();
    assert!(catalog.is_empty());
    let view = session.view();
    assert_eq!(view.session, SessionState::NoCatalog);
    assert_eq!(
        view.notices,
        vec![Notice::EmptyCatalog {
            filename: "plan.csv".into()
        }]
    );
}

#[test]
fn completion_survives_restart_and_corrected_upload() {
    let temp = TempDir::new().unwrap();
    {
        let mut session = open(&temp);
        session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
        session.toggle_item("u2", true).unwrap();
        session.toggle_item("u3", true).unwrap();
    }

    let mut session = open(&temp);
    assert!(session.catalog().is_none());
    let corrected = "Subject,Topic,ItemTitle,ItemURL\n\
                     Math,Algebra,Lesson 1,u1\n\
                     Math,Algebra,Lesson 2,u2\n";
    session.upload_catalog(corrected.as_bytes(), "plan-v2.csv").unwrap();
    assert_eq!(counts(&session), (1, 2));

    // u3 is inert but kept; it counts again once reintroduced.
    assert!(session.store().state().is_complete("u3"));
    session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    assert_eq!(counts(&session), (2, 3));
}

#[test]
fn corrupt_progress_file_starts_empty() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("progress.json"), "{{{").unwrap();
    let mut session = open(&temp);
    session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    assert_eq!(counts(&session), (0, 3));
    assert!(session.view().notices.is_empty());

    session.toggle_item("u1", true).unwrap();
    let written = fs::read_to_string(temp.path().join("progress.json")).unwrap();
    assert!(written.contains("\"u1\""));
}

#[test]
fn failed_write_surfaces_notice_and_keeps_memory() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let mut session = Session::open(&TrackerConfig::with_progress_file(
        blocker.join("progress.json"),
    ));
    session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();

    let err = session.toggle_item("u1", true).unwrap_err();
    assert!(matches!(err, PersistError::Directory { .. }));
    assert_eq!(counts(&session), (1, 3));
    let view = session.view();
    assert!(matches!(
        view.notices.as_slice(),
        [Notice::PersistFailed { .. }]
    ));
    assert!(view.notices[0].is_warning());

    session.dismiss_notices();
    assert!(session.view().notices.is_empty());
}

#[test]
fn set_filter_composes_and_validates() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();

    let view = session.set_filter(Some("Math"), Some("Algebra"), None);
    assert_eq!(view.visible_count, 2);
    assert_eq!(view.topic_options, vec!["Algebra"]);

    let view = session.set_filter(Some("Math"), None, Some("LESSON"));
    assert_eq!(view.visible_count, 1);
    assert_eq!(view.groups[0].items[0].url, "u1");

    // Topic from another subject is not a valid combination.
    let view = session.set_filter(Some("Sci"), Some("Algebra"), None);
    assert_eq!(view.filter.topic, Selector::All);
    assert_eq!(view.visible_count, 1);

    let view = session.set_filter(None, None, None);
    assert_eq!(view.visible_count, 3);
}

#[test]
fn empty_subject_and_topic_are_selectable_options() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    let csv = "Subject,Topic,ItemTitle,ItemURL\n\
               ,Loose,Orphan,u0\n\
               Math,,Warmup,u4\n\
               Math,Algebra,Lesson 1,u1\n\
               Sci,Bio,Cell,u3\n";
    session.upload_catalog(csv.as_bytes(), "plan.csv").unwrap();

    let view = session.set_filter(Some(""), None, None);
    assert_eq!(view.subject_options, vec!["", "Math", "Sci"]);
    assert_eq!(view.filter.subject, Selector::Only(String::new()));
    assert_eq!(view.visible_count, 1);
    assert_eq!(view.groups[0].items[0].url, "u0");

    let view = session.set_filter(Some("Math"), Some(""), None);
    assert_eq!(view.topic_options, vec!["", "Algebra"]);
    assert_eq!(view.filter.topic, Selector::Only(String::new()));
    assert_eq!(view.visible_count, 1);
    assert_eq!(view.groups[0].items[0].url, "u4");
}

#[test]
fn group_aggregates_follow_toggles() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    session.toggle_item("u2", true).unwrap();

    let view = session.view();
    let algebra = &view.groups[0];
    assert_eq!(algebra.aggregate.label(), "1/2");
    assert_eq!(algebra.aggregate.percent(), 50);

    let catalog = session.catalog().unwrap().clone();
    let sci = catalog.items().iter().filter(|i| i.subject == "Sci");
    assert_eq!(session.aggregate(sci).total, 1);
}

#[test]
fn identical_reupload_is_served_from_cache() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    let first = session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    let second = session.upload_catalog(SCENARIO.as_bytes(), "plan.csv").unwrap();
    assert!(first.shares_storage_with(&second));
}

#[test]
fn messages_can_drive_the_whole_session() {
    let temp = TempDir::new().unwrap();
    let mut session = open(&temp);
    session.dispatch(Msg::CatalogUploaded {
        filename: "plan.csv".into(),
        bytes: SCENARIO.as_bytes().to_vec(),
    });
    assert_eq!(session.view().session, SessionState::CatalogLoaded);

    session.dispatch(Msg::ItemToggled {
        url: "u3".into(),
        complete: true,
    });
    assert!(session.take_render().is_some());
    assert!(session.take_render().is_none());
    assert!(session.store().state().is_complete("u3"));
}
