//! Surveillance du statut : relecture périodique des réglages, détection de
//! transition et détection de borne horaire.
//!
//! Les deux déclencheurs sont volontairement distincts et peuvent tirer sur
//! le même tour ; le doublon de notification est toléré (pas de verrou, pas
//! d'anti-rebond, pas d'annulation d'un envoi en cours).

use crate::model::{StoreConfig, StoreStatus};
use crate::notification::{self, Notifier};
use crate::settings::{self, SettingsStore};
use crate::status;
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use std::time::Duration;
use tracing::info;

/// Minute du jour dans le fuseau mural de la boutique.
pub fn local_minute(now: DateTime<Utc>, offset_hours: i8) -> u16 {
    let seconds = i32::from(offset_hours).clamp(-12, 14) * 3600;
    let offset = FixedOffset::east_opt(seconds).unwrap();
    let local = now.with_timezone(&offset);
    (local.hour() * 60 + local.minute()) as u16
}

/// Heure murale "HH:MM" pour l'affichage.
pub fn local_hhmm(at: DateTime<Utc>, offset_hours: i8) -> String {
    let seconds = i32::from(offset_hours).clamp(-12, 14) * 3600;
    let offset = FixedOffset::east_opt(seconds).unwrap();
    let local = at.with_timezone(&offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}

/// La minute courante coïncide-t-elle exactement avec une borne de shift ?
///
/// Retourne l'état à annoncer (`Some(open)`), ou `None` hors borne. L'ordre
/// d'examen des règles fait foi en cas de collision de bornes :
/// début de matinée → ouvert ; fin de matinée sans shift du soir → fermé ;
/// début de soirée → ouvert ; fin de soirée → fermé ; fin de matinée avec
/// les deux shifts actifs → fermé (le creux entre shifts est fermé, et il
/// l'emporte). Le mode vacances court-circuite tout : jamais d'envoi
/// automatique.
pub fn boundary_state(minute: u16, config: &StoreConfig) -> Option<bool> {
    if config.vacation.active {
        return None;
    }

    let morning = config
        .morning
        .enabled
        .then(|| status::window_span(&config.morning))
        .flatten();
    let evening = config
        .evening
        .enabled
        .then(|| status::window_span(&config.evening))
        .flatten();

    let mut state = None;

    if let Some(span) = morning {
        if minute == span.start {
            state = Some(true);
        }
        if minute == span.end && evening.is_none() {
            state = Some(false);
        }
    }
    if let Some(span) = evening {
        if minute == span.start {
            state = Some(true);
        }
        if minute == span.end {
            state = Some(false);
        }
    }
    if let (Some(span), Some(_)) = (morning, evening) {
        if minute == span.end {
            state = Some(false);
        }
    }

    state
}

/// Boucle de surveillance : un état booléen retenu entre deux tours, rien
/// d'autre — la configuration est relue à chaque tour.
pub struct StatusMonitor<'a> {
    store: &'a dyn SettingsStore,
    notifier: &'a dyn Notifier,
    last_open: Option<bool>,
}

impl<'a> StatusMonitor<'a> {
    pub fn new(store: &'a dyn SettingsStore, notifier: &'a dyn Notifier) -> Self {
        Self {
            store,
            notifier,
            last_open: None,
        }
    }

    pub fn last_open(&self) -> Option<bool> {
        self.last_open
    }

    /// Un tour du chemin « transition » : relit, réévalue, notifie si le
    /// booléen a basculé. Le tout premier tour amorce sans notifier.
    pub fn tick(&mut self, now: DateTime<Utc>) -> StoreStatus {
        let config = settings::load_store_config(self.store);
        let minute = local_minute(now, config.utc_offset_hours);
        let current = status::evaluate(minute, &config);

        if let Some(previous) = self.last_open {
            notification::notify_if_changed(previous, &current, &config, now, self.notifier);
        }
        self.last_open = Some(current.open);
        current
    }

    /// Un tour du chemin « borne horaire » : indépendant de `tick`, sans
    /// mémoire — exactement ce qu'exécute un cron à la minute.
    pub fn boundary(&self, now: DateTime<Utc>) -> Option<bool> {
        let config = settings::load_store_config(self.store);
        let minute = local_minute(now, config.utc_offset_hours);
        let state = boundary_state(minute, &config)?;
        notification::dispatch(
            self.notifier,
            notification::auto_status_embed(state, &config, now),
        );
        Some(state)
    }

    /// Enchaîne les deux chemins à cadence fixe, sans fin.
    pub fn watch(&mut self, interval: Duration) -> ! {
        loop {
            let now = Utc::now();
            let current = self.tick(now);
            self.boundary(now);
            info!(open = current.open, reason = current.reason.label(), "tick");
            std::thread::sleep(interval);
        }
    }
}

/// Passe planifiée sans état : ce qu'invoque un cron externe à la minute.
/// Relit les réglages, détecte une borne, envoie le cas échéant.
pub fn scheduled_pass(
    store: &dyn SettingsStore,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Option<bool> {
    StatusMonitor::new(store, notifier).boundary(now)
}
