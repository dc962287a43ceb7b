//! End-to-end tests: stores, the shared stylesheet and reload notification.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use namehue::{
    read_entries, ChangeAction, Config, Error, Identity, OverrideChange, OverrideKind,
    OverrideListener, Overrides, Region, ReloadError, ReloadNotifier,
};
use tempfile::{tempdir, TempDir};

// ============================================================================
// Test helpers
// ============================================================================

fn config(dir: &TempDir) -> Config {
    Config::default()
        .with_data_dir(dir.path().join("db"))
        .with_stylesheet(dir.path().join("config").join("custom.css"))
}

fn stylesheet(overrides: &Overrides) -> String {
    fs::read_to_string(&overrides.config().stylesheet).unwrap()
}

/// The region including its marker lines.
fn region_of(text: &str, kind: OverrideKind) -> String {
    namehue_region::extract_region(text, &kind.region())
        .unwrap()
        .unwrap_or_else(|| panic!("{} region missing", kind))
        .to_string()
}

fn write_stylesheet(config: &Config, text: &str) {
    let path = &config.stylesheet;
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn assert_every_store_holds(dir: &Path, count: usize) {
    for kind in OverrideKind::ALL {
        let entries = read_entries(&dir.join(kind.storage_file())).unwrap().unwrap();
        assert_eq!(entries.len(), count, "{}", kind);
    }
}

#[derive(Clone, Default)]
struct CountingReload(Arc<AtomicUsize>);

impl CountingReload {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ReloadNotifier for CountingReload {
    fn reload(&self) -> Result<(), ReloadError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<OverrideChange>>>);

impl OverrideListener for Recorder {
    fn on_change(&self, change: &OverrideChange) {
        self.0.lock().unwrap().push(change.clone());
    }
}

// ============================================================================
// Stylesheet regions
// ============================================================================

#[test]
fn test_regions_are_appended_then_patched_in_place() {
    let dir = tempdir().unwrap();
    let config = config(&dir);
    write_stylesheet(&config, ".header { color: #333; }\n");
    let overrides = Overrides::open(config).unwrap();

    overrides
        .set(OverrideKind::Icon, "Brock", "https://x.test/b.png")
        .unwrap();
    overrides.set(OverrideKind::NameColor, "Ash", "#ff0000").unwrap();

    let text = stylesheet(&overrides);
    assert!(text.starts_with(".header { color: #333; }\n/* ICONS START */\n"));
    assert_eq!(
        region_of(&text, OverrideKind::Icon),
        "/* ICONS START */\n\
         [id$=\"-userlist-user-brock\"] { background: rgba(17, 72, 79, 0.6) \
         url(\"https://x.test/b.png\") right no-repeat !important;}\n\
         /* ICONS END */\n"
    );
    assert!(region_of(&text, OverrideKind::NameColor).contains("chatmessage-ash\"] strong"));

    // The icon region keeps its place ahead of the colors region.
    overrides.delete(OverrideKind::Icon, "brock").unwrap();
    let text = stylesheet(&overrides);
    let icons = text.find("/* ICONS START */").unwrap();
    let colors = text.find("/* COLORS START */").unwrap();
    assert!(icons < colors);
    assert!(text.contains("/* ICONS START */\n/* ICONS END */\n"));
    assert!(text.starts_with(".header { color: #333; }\n"));
}

#[test]
fn test_rules_follow_insertion_order() {
    let dir = tempdir().unwrap();
    let overrides = Overrides::open(config(&dir)).unwrap();

    for name in ["zarel", "alice", "misty"] {
        overrides
            .set(OverrideKind::Icon, name, format!("https://x.test/{}.png", name))
            .unwrap();
    }

    let region = region_of(&stylesheet(&overrides), OverrideKind::Icon);
    let positions: Vec<usize> = ["zarel", "alice", "misty"]
        .iter()
        .map(|name| region.find(&format!("user-{}\"", name)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_reload_is_idempotent() {
    let dir = tempdir().unwrap();
    let overrides = Overrides::open(config(&dir)).unwrap();
    overrides.set(OverrideKind::SymbolColor, "misty", "#00aaff").unwrap();

    let before = stylesheet(&overrides);
    overrides.reload_all().unwrap();
    overrides.reload_all().unwrap();
    let after = stylesheet(&overrides);

    assert_eq!(
        region_of(&before, OverrideKind::SymbolColor),
        region_of(&after, OverrideKind::SymbolColor)
    );
    assert!(after.contains("/* COLORS START */\n/* COLORS END */\n"));
    assert!(after.contains("/* ICONS START */\n/* ICONS END */\n"));

    overrides.reload_all().unwrap();
    assert_eq!(stylesheet(&overrides), after);
}

#[test]
fn test_reload_restores_hand_deleted_region() {
    let dir = tempdir().unwrap();
    let overrides = Overrides::open(config(&dir)).unwrap();
    overrides.set(OverrideKind::NameColor, "ash", "#ff0000").unwrap();

    write_stylesheet(overrides.config(), ".footer { margin: 0; }\n");
    overrides.reload(OverrideKind::NameColor).unwrap();

    let text = stylesheet(&overrides);
    assert!(text.starts_with(".footer { margin: 0; }\n/* COLORS START */\n"));
    assert!(region_of(&text, OverrideKind::NameColor).contains("color: #ff0000 !important;"));
}

#[test]
fn test_corrupt_markers_leave_stylesheet_untouched() {
    let dir = tempdir().unwrap();
    let config = config(&dir);
    let broken = ".a {}\n/* ICONS END */\n.b {}\n/* ICONS START */\n";
    write_stylesheet(&config, broken);
    let overrides = Overrides::open(config).unwrap();

    let err = overrides
        .set(OverrideKind::Icon, "lance", "https://x.test/l.png")
        .unwrap_err();
    assert!(matches!(err, Error::RegionCorruption { .. }));
    assert_eq!(stylesheet(&overrides), broken);

    // The store is ahead of the stylesheet until the markers are repaired.
    assert_eq!(
        overrides.get(OverrideKind::Icon, "lance").as_deref(),
        Some("https://x.test/l.png")
    );
    write_stylesheet(overrides.config(), ".a {}\n.b {}\n");
    overrides.reload(OverrideKind::Icon).unwrap();
    assert!(region_of(&stylesheet(&overrides), OverrideKind::Icon).contains("user-lance\""));
}

#[test]
fn test_value_cannot_plant_another_kinds_marker() {
    let dir = tempdir().unwrap();
    let config = config(&dir).with_template(OverrideKind::NameColor, "{{ value }}\n");
    let overrides = Overrides::open(config).unwrap();

    let err = overrides
        .set(OverrideKind::NameColor, "bob", "/* ICONS START */")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
    assert_eq!(overrides.get(OverrideKind::NameColor, "bob"), None);

    overrides.set(OverrideKind::NameColor, "amy", "#00ff00").unwrap();
    overrides.set(OverrideKind::Icon, "amy", "a.png").unwrap();
    let text = stylesheet(&overrides);
    assert_eq!(
        region_of(&text, OverrideKind::NameColor),
        "/* COLORS START */\n#00ff00\n/* COLORS END */\n"
    );
    assert!(region_of(&text, OverrideKind::Icon).contains("url(\"a.png\")"));
}

#[test]
fn test_kind_regions_use_named_markers() {
    let region = Region::named("ICONS");
    assert_eq!(OverrideKind::Icon.region(), region);
    assert_eq!(region.start_marker(), "/* ICONS START */");
    assert_eq!(region.end_marker(), "/* ICONS END */");
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_restart_round_trip() {
    let dir = tempdir().unwrap();
    {
        let overrides = Overrides::open(config(&dir)).unwrap();
        overrides.set(OverrideKind::NameColor, "Ash", "#ff0000").unwrap();
        overrides.set(OverrideKind::NameColor, "Misty", "#0000ff").unwrap();
        overrides.set(OverrideKind::Icon, "Brock", "https://x.test/b.png").unwrap();
        overrides.delete(OverrideKind::NameColor, "ash").unwrap();
        overrides.reload_all().unwrap();
    }

    let overrides = Overrides::open(config(&dir)).unwrap();
    let before = stylesheet(&overrides);
    assert_eq!(overrides.get(OverrideKind::NameColor, "ash"), None);
    assert_eq!(overrides.color_for("misty"), "#0000ff");
    assert_eq!(overrides.color_for("ash"), "#27a836");
    assert_eq!(overrides.entries(OverrideKind::Icon).len(), 1);

    overrides.reload_all().unwrap();
    assert_eq!(stylesheet(&overrides), before);
}

#[test]
fn test_storage_files_are_plain_json() {
    let dir = tempdir().unwrap();
    let overrides = Overrides::open(config(&dir)).unwrap();
    overrides.set(OverrideKind::SymbolColor, "Serena", "#4b42f4").unwrap();

    let path = dir.path().join("db").join("symbolcolors.json");
    assert_eq!(fs::read_to_string(&path).unwrap(), r##"{"serena":"#4b42f4"}"##);
    let entries = read_entries(&path).unwrap().unwrap();
    assert_eq!(entries.get(&Identity::new("serena")).map(String::as_str), Some("#4b42f4"));
}

#[test]
fn test_unreadable_store_starts_empty() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db");
    fs::create_dir_all(&db).unwrap();
    fs::write(db.join("usericons.json"), "{ not json").unwrap();

    let overrides = Overrides::open(config(&dir)).unwrap();
    assert!(overrides.entries(OverrideKind::Icon).is_empty());

    overrides.set(OverrideKind::Icon, "bob", "https://x.test/bob.png").unwrap();
    assert!(read_entries(&db.join("usericons.json")).unwrap().is_some());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_mutations_across_kinds() {
    let dir = tempdir().unwrap();
    let overrides = Overrides::open(config(&dir)).unwrap();

    thread::scope(|scope| {
        for kind in OverrideKind::ALL {
            for i in 0..8 {
                let overrides = &overrides;
                scope.spawn(move || {
                    let value = if kind.is_color() {
                        format!("#{:02x}{:02x}{:02x}", i * 16, i * 8, i * 4)
                    } else {
                        format!("https://x.test/{}.png", i)
                    };
                    overrides.set(kind, &format!("user{}", i), value).unwrap();
                });
            }
        }
    });

    let text = stylesheet(&overrides);
    for kind in OverrideKind::ALL {
        let region = region_of(&text, kind);
        for i in 0..8 {
            assert!(region.contains(&format!("user{}\"", i)), "{} missing user{}", kind, i);
        }
        assert_eq!(overrides.entries(kind).len(), 8);
    }
    assert_every_store_holds(&dir.path().join("db"), 8);
}

#[test]
fn test_concurrent_duplicate_sets_admit_one() {
    let dir = tempdir().unwrap();
    let overrides = Overrides::open(config(&dir)).unwrap();
    let successes = AtomicUsize::new(0);

    thread::scope(|scope| {
        for i in 0..8 {
            let overrides = &overrides;
            let successes = &successes;
            scope.spawn(move || {
                match overrides.set(OverrideKind::NameColor, "ash", format!("#0000{:02x}", i)) {
                    Ok(()) => {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(Error::AlreadyExists { .. }) => {}
                    Err(other) => panic!("unexpected error: {}", other),
                }
            });
        }
    });

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(overrides.entries(OverrideKind::NameColor).len(), 1);
}

// ============================================================================
// Notification
// ============================================================================

#[test]
fn test_reload_notifier_fires_once_per_write() {
    let dir = tempdir().unwrap();
    let reloads = CountingReload::default();
    let overrides = Overrides::builder(config(&dir))
        .notifier(reloads.clone())
        .build()
        .unwrap();

    overrides.set(OverrideKind::NameColor, "ash", "#ff0000").unwrap();
    assert_eq!(reloads.count(), 1);

    assert!(overrides.set(OverrideKind::NameColor, "ash", "#00ff00").is_err());
    assert!(overrides.delete(OverrideKind::Icon, "ash").is_err());
    assert_eq!(reloads.count(), 1);

    overrides.delete(OverrideKind::NameColor, "ash").unwrap();
    assert_eq!(reloads.count(), 2);

    overrides.reload_all().unwrap();
    assert_eq!(reloads.count(), 5);
}

#[test]
fn test_listener_sees_successful_changes() {
    let dir = tempdir().unwrap();
    let recorder = Recorder::default();
    let overrides = Overrides::builder(config(&dir))
        .listener(recorder.clone())
        .build()
        .unwrap();

    overrides.set(OverrideKind::SymbolColor, "Zarel", "#4cb9a2").unwrap();
    assert!(overrides.set(OverrideKind::SymbolColor, "zarel", "#000000").is_err());
    overrides.delete(OverrideKind::SymbolColor, "ZAREL").unwrap();

    let changes = recorder.0.lock().unwrap();
    assert_eq!(
        *changes,
        vec![
            OverrideChange {
                kind: OverrideKind::SymbolColor,
                identity: Identity::new("zarel"),
                action: ChangeAction::Set { value: "#4cb9a2".into() },
            },
            OverrideChange {
                kind: OverrideKind::SymbolColor,
                identity: Identity::new("zarel"),
                action: ChangeAction::Deleted { previous: "#4cb9a2".into() },
            },
        ]
    );
}
