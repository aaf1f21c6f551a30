#![forbid(unsafe_code)]
use anyhow::bail;
use boutique::model::StoreConfig;
use boutique::monitor::{boundary_state, StatusMonitor};
use boutique::notification::{Embed, Notifier};
use boutique::settings::{keys, JsonSettingsStore, SettingsStore};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use tempfile::tempdir;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Embed>>,
}

impl RecordingNotifier {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
    fn last(&self) -> Option<Embed> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, embed: Embed) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(embed);
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _embed: Embed) -> anyhow::Result<()> {
        bail!("unreachable endpoint")
    }
}

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 6, h, m, 0).unwrap()
}

/// Store sur fichier temporaire, décalage mural forcé à zéro pour que les
/// heures UTC des tests soient aussi les heures murales.
fn seeded_store(dir: &std::path::Path) -> JsonSettingsStore {
    let store = JsonSettingsStore::open(dir.join("settings.json")).unwrap();
    store.upsert(keys::UTC_OFFSET, "0").unwrap();
    store
}

#[test]
fn first_tick_primes_without_notifying() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let notifier = RecordingNotifier::default();
    let mut monitor = StatusMonitor::new(&store, &notifier);

    let status = monitor.tick(utc(9, 0));
    assert!(status.open);
    assert_eq!(notifier.count(), 0);
    assert_eq!(monitor.last_open(), Some(true));
}

#[test]
fn transition_sends_exactly_once() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let notifier = RecordingNotifier::default();
    let mut monitor = StatusMonitor::new(&store, &notifier);

    monitor.tick(utc(13, 58));
    monitor.tick(utc(13, 59)); // toujours ouvert, rien à envoyer
    assert_eq!(notifier.count(), 0);

    monitor.tick(utc(14, 0)); // bascule ouvert → fermé
    assert_eq!(notifier.count(), 1);
    let embed = notifier.last().unwrap();
    assert!(embed.title.contains("fermée"));

    monitor.tick(utc(14, 1)); // toujours fermé, pas de doublon
    assert_eq!(notifier.count(), 1);
}

#[test]
fn vacation_toggle_notifies_once_and_boundary_stays_silent() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let notifier = RecordingNotifier::default();
    let mut monitor = StatusMonitor::new(&store, &notifier);

    monitor.tick(utc(9, 0)); // amorce : ouvert
    store.upsert(keys::VACATION_MODE, "true").unwrap();
    store
        .upsert(keys::VACATION_MESSAGE, "Retour en septembre")
        .unwrap();

    monitor.tick(utc(9, 1));
    assert_eq!(notifier.count(), 1);
    let embed = notifier.last().unwrap();
    assert!(embed.title.contains("vacances"));
    assert!(embed
        .fields
        .iter()
        .any(|f| f.value.contains("Retour en septembre")));

    // le chemin « borne horaire » est entièrement court-circuité en vacances,
    // même pile sur une borne de shift (08:00 murales)
    assert_eq!(monitor.boundary(utc(8, 0)), None);
    assert_eq!(notifier.count(), 1);
}

#[test]
fn boundary_minutes_follow_shift_edges() {
    let config = StoreConfig::default(); // 08:00–14:00 et 16:00–22:00

    assert_eq!(boundary_state(8 * 60, &config), Some(true));
    assert_eq!(boundary_state(14 * 60, &config), Some(false)); // creux fermé
    assert_eq!(boundary_state(16 * 60, &config), Some(true));
    assert_eq!(boundary_state(22 * 60, &config), Some(false));
    assert_eq!(boundary_state(8 * 60 + 1, &config), None);
    assert_eq!(boundary_state(15 * 60, &config), None);
}

#[test]
fn boundary_handles_single_and_overnight_shifts() {
    let mut config = StoreConfig::default();

    // matin seul : sa fin annonce la fermeture
    config.evening.enabled = false;
    assert_eq!(boundary_state(14 * 60, &config), Some(false));

    // soir seul, à cheval sur minuit : la fin (06:00) annonce la fermeture
    let mut config = StoreConfig::default();
    config.morning.enabled = false;
    config.evening.start = "22:00".to_string();
    config.evening.end = "06:00".to_string();
    assert_eq!(boundary_state(22 * 60, &config), Some(true));
    assert_eq!(boundary_state(6 * 60, &config), Some(false));
    assert_eq!(boundary_state(12 * 60, &config), None);

    // soir actif mais illisible : traité comme absent
    let mut config = StoreConfig::default();
    config.evening.start = "zz:zz".to_string();
    assert_eq!(boundary_state(14 * 60, &config), Some(false));
}

#[test]
fn boundary_dispatches_auto_embed() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let notifier = RecordingNotifier::default();
    let monitor = StatusMonitor::new(&store, &notifier);

    assert_eq!(monitor.boundary(utc(8, 0)), Some(true));
    assert_eq!(notifier.count(), 1);
    let embed = notifier.last().unwrap();
    assert!(embed.title.contains("ouverte"));
    assert!(embed.footer.text.contains("automatique"));
}

#[test]
fn both_paths_may_fire_on_the_same_tick() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let notifier = RecordingNotifier::default();
    let mut monitor = StatusMonitor::new(&store, &notifier);

    monitor.tick(utc(7, 59)); // amorce : fermé
    monitor.tick(utc(8, 0)); // transition → 1 envoi
    monitor.boundary(utc(8, 0)); // borne → 1 envoi de plus, doublon toléré
    assert_eq!(notifier.count(), 2);
}

#[test]
fn dispatch_failure_is_swallowed() {
    let dir = tempdir().unwrap();
    let store = seeded_store(dir.path());
    let notifier = FailingNotifier;
    let mut monitor = StatusMonitor::new(&store, &notifier);

    monitor.tick(utc(7, 59));
    let status = monitor.tick(utc(8, 0)); // l'envoi échoue, le statut reste juste
    assert!(status.open);
    assert_eq!(monitor.last_open(), Some(true));
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    // le chemin des réglages est un répertoire : lecture impossible
    let store = JsonSettingsStore::open(dir.path()).unwrap();
    let notifier = RecordingNotifier::default();
    let mut monitor = StatusMonitor::new(&store, &notifier);

    // défauts : UTC+3, donc 06:00 UTC = 09:00 murales → shift du matin
    let status = monitor.tick(utc(6, 0));
    assert!(status.open);
}
