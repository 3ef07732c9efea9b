use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use super::debouncer::Debouncer;
use super::types::ChangeKind;
use super::{FsActor, flush, watch_dir};
use crate::actor::messages::{PreviewMsg, RenderReason};

const TARGET: &str = "/tmp/gempeek-test/notes.gmi";
const QUIET: Duration = Duration::from_millis(40);

fn make_debouncer() -> Debouncer {
    Debouncer::new(PathBuf::from(TARGET), QUIET)
}

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

fn rename_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Name(
        notify::event::RenameMode::To,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

#[test]
fn test_debouncer_empty() {
    let debouncer = make_debouncer();
    assert!(!debouncer.is_ready());
    assert!(debouncer.sleep_duration() > Duration::from_secs(3600));
}

#[test]
fn test_target_events_arm() {
    let mut debouncer = make_debouncer();
    assert!(debouncer.add_event(&make_event(vec![TARGET], modify_kind())));
    assert_eq!(debouncer.pending, Some(ChangeKind::Modified));
    assert!(debouncer.last_event.is_some());
}

#[test]
fn test_rename_onto_target_arms() {
    let mut debouncer = make_debouncer();
    let event = make_event(vec!["/tmp/gempeek-test/.notes.gmi.swp", TARGET], rename_kind());
    assert!(debouncer.add_event(&event));
}

#[test]
fn test_other_paths_ignored() {
    let mut debouncer = make_debouncer();
    assert!(!debouncer.add_event(&make_event(
        vec!["/tmp/gempeek-test/other.gmi"],
        modify_kind()
    )));
    assert!(!debouncer.add_event(&make_event(
        vec!["/tmp/elsewhere/notes.gmi"],
        modify_kind()
    )));
    assert!(debouncer.pending.is_none());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_metadata_and_remove_ignored() {
    let mut debouncer = make_debouncer();
    assert!(!debouncer.add_event(&make_event(vec![TARGET], metadata_kind())));
    assert!(!debouncer.add_event(&make_event(vec![TARGET], remove_kind())));
    assert!(debouncer.pending.is_none());
}

#[test]
fn test_first_kind_in_burst_wins() {
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(vec![TARGET], create_kind()));
    debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
    assert_eq!(debouncer.pending, Some(ChangeKind::Created));
}

#[test]
fn test_not_ready_before_quiet_interval() {
    let mut debouncer = Debouncer::new(PathBuf::from(TARGET), Duration::from_secs(60));
    debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
    assert!(!debouncer.is_ready());
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.sleep_duration() <= Duration::from_secs(60));
}

#[test]
fn test_burst_fires_once_after_quiet() {
    let mut debouncer = make_debouncer();
    for _ in 0..5 {
        debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!debouncer.is_ready());

    std::thread::sleep(QUIET + Duration::from_millis(10));
    assert_eq!(debouncer.take_if_ready(), Some(ChangeKind::Modified));
    // Consumed: nothing left to fire
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_new_event_rearms_interval() {
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
    std::thread::sleep(QUIET + Duration::from_millis(10));
    assert!(debouncer.is_ready());

    // A late event pushes the trigger out again
    debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
    assert!(!debouncer.is_ready());
}

#[test]
fn test_watch_dir_is_parent() {
    assert_eq!(
        watch_dir(&PathBuf::from(TARGET)),
        PathBuf::from("/tmp/gempeek-test")
    );
}

#[tokio::test]
async fn test_flush_sends_render() {
    let (tx, mut rx) = mpsc::channel(4);
    let mut debouncer = make_debouncer();

    flush(&mut debouncer, &tx).await.unwrap();
    assert!(rx.try_recv().is_err());

    debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
    tokio::time::sleep(QUIET + Duration::from_millis(10)).await;
    flush(&mut debouncer, &tx).await.unwrap();

    match rx.try_recv() {
        Ok(PreviewMsg::Render { reason }) => assert_eq!(reason, RenderReason::FileChanged),
        other => panic!("expected render, got {other:?}"),
    }
}

#[tokio::test]
async fn test_flush_reports_closed_channel() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(vec![TARGET], modify_kind()));
    tokio::time::sleep(QUIET + Duration::from_millis(10)).await;
    assert!(flush(&mut debouncer, &tx).await.is_err());
}

#[test]
fn test_watcher_on_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("missing/notes.gmi");
    let (tx, _rx) = mpsc::channel(1);
    assert!(FsActor::new(&file, QUIET, tx).is_err());
}
