use std::rc::Rc;

use chrono::NaiveDate;
use tempfile::TempDir;

use readcoach::annotate::{HighlightColor, HighlightStore, TextRange};
use readcoach::auth::User;
use readcoach::clock::{Clock, FixedClock};
use readcoach::engine::xp::XpTracker;
use readcoach::progress::ProgressStore;
use readcoach::store::export::{EXPORT_VERSION, UserExport, export_user, import_user};
use readcoach::store::{JsonStore, MemoryStore, SharedStore};

const NS: &str = "readcoach_test";
const PASSAGE: &str = "<p>Evidence beats opinion.</p>";

fn seeded_store(dir: &TempDir, user: &User) -> SharedStore {
    let store: SharedStore = Rc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    let clock: Rc<dyn Clock> = Rc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()));

    let progress = ProgressStore::new(Rc::clone(&store), NS, Rc::clone(&clock));
    progress.mark_week_complete(&user.id, 1);
    progress.record_mistake(&user.id, 2, "w2q4");
    progress.log_attempt(&user.id, 2, "w2q4", false);

    let mut xp = XpTracker::load(Rc::clone(&store), NS, &user.id, clock);
    xp.add_xp(250);

    let highlights = HighlightStore::new(Rc::clone(&store), NS);
    let mut passage = highlights.open(&user.id, 1, 0, PASSAGE);
    let selection = TextRange::new(passage.point_at(0, 0).unwrap(), passage.point_at(0, 8).unwrap());
    passage.apply_highlight(Some(&selection), HighlightColor::Evidence);
    highlights.save(&user.id, 1, 0, &passage);

    store
}

#[test]
fn export_then_import_into_a_fresh_store_restores_everything() {
    let dir = TempDir::new().unwrap();
    let user = User::from_name("Ada");
    let source = seeded_store(&dir, &user);

    let exported = export_user(&*source, NS, &user);
    assert_eq!(exported.readcoach_export_version, EXPORT_VERSION);
    assert_eq!(exported.completed_weeks, vec![1]);
    assert_eq!(exported.mistakes.len(), 1);
    assert_eq!(exported.history.len(), 1);
    assert_eq!(exported.xp.xp, 250);
    assert!(exported.highlights.contains_key("1:0"));

    // Through JSON, the way the CLI moves it between machines.
    let json = serde_json::to_string_pretty(&exported).unwrap();
    let parsed: UserExport = serde_json::from_str(&json).unwrap();

    let target = MemoryStore::shared();
    import_user(&*target, NS, &parsed).unwrap();
    let again = export_user(&*target, NS, &user);
    assert_eq!(again.completed_weeks, exported.completed_weeks);
    assert_eq!(again.mistakes, exported.mistakes);
    assert_eq!(again.history, exported.history);
    assert_eq!(again.xp, exported.xp);
    assert_eq!(again.highlights, exported.highlights);
}

#[test]
fn import_rejects_an_unknown_version_without_writing() {
    let dir = TempDir::new().unwrap();
    let user = User::from_name("Ada");
    let source = seeded_store(&dir, &user);

    let mut exported = export_user(&*source, NS, &user);
    exported.readcoach_export_version = EXPORT_VERSION + 1;

    let target = MemoryStore::shared();
    let err = import_user(&*target, NS, &exported).unwrap_err();
    assert!(err.to_string().contains("Unsupported export version"));
    assert!(export_user(&*target, NS, &user).completed_weeks.is_empty());
}

#[test]
fn export_of_an_unknown_user_is_empty() {
    let dir = TempDir::new().unwrap();
    let source = seeded_store(&dir, &User::from_name("Ada"));

    let stranger = export_user(&*source, NS, &User::from_name("Grace"));
    assert!(stranger.completed_weeks.is_empty());
    assert!(stranger.mistakes.is_empty());
    assert!(stranger.history.is_empty());
    assert_eq!(stranger.xp.xp, 0);
    assert!(stranger.highlights.is_empty());
}
