//! Évaluation pure du statut d'ouverture.
//!
//! Tout se ramène à des minutes depuis minuit ([0, 1440)) ; aucune erreur
//! possible : une heure illisible rend simplement sa fenêtre inerte.

use crate::model::{ShiftWindow, StatusReason, StoreConfig, StoreStatus};
use chrono::{NaiveTime, Timelike};

/// Parse "HH:MM" en minute du jour. `None` si la chaîne est invalide.
pub fn parse_hhmm(raw: &str) -> Option<u16> {
    let (h, m) = raw.trim().split_once(':')?;
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

pub fn minute_of_day(t: NaiveTime) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// Intervalle demi-ouvert `[start, end)` en minutes du jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpan {
    pub start: u16,
    pub end: u16,
}

impl WindowSpan {
    /// Appartenance demi-ouverte : `start` est dedans, `end` est dehors.
    ///
    /// Un intervalle avec `end <= start` chevauche minuit : ouvert dès
    /// `start` OU avant `end`. Cas limite : `start == end` tombe dans la
    /// branche chevauchante, dont la condition couvre alors toutes les
    /// minutes — une fenêtre vide se lit « toujours ouverte », pas
    /// « jamais ouverte ». Vraisemblablement involontaire ; à trancher
    /// côté produit avant de changer de branche.
    pub fn contains(&self, minute: u16) -> bool {
        if self.end > self.start {
            minute >= self.start && minute < self.end
        } else {
            minute >= self.start || minute < self.end
        }
    }

    pub fn wraps(&self) -> bool {
        self.end <= self.start
    }
}

/// Bornes d'une fenêtre, sans tenir compte de son drapeau `enabled`.
/// `None` si l'une des deux heures ne se parse pas.
pub fn window_span(window: &ShiftWindow) -> Option<WindowSpan> {
    let start = parse_hhmm(&window.start)?;
    let end = parse_hhmm(&window.end)?;
    Some(WindowSpan { start, end })
}

fn active_span(window: &ShiftWindow) -> Option<WindowSpan> {
    if !window.enabled {
        return None;
    }
    window_span(window)
}

/// Statut à la minute donnée.
///
/// Vacances > pause des deux shifts > appartenance aux fenêtres. Quand les
/// deux shifts sont actifs le résultat est le OU des deux fenêtres : le
/// creux entre fin de matinée et début de soirée reste fermé.
pub fn evaluate(minute: u16, config: &StoreConfig) -> StoreStatus {
    if config.vacation.active {
        return StoreStatus::closed(StatusReason::Vacation);
    }
    if !config.morning.enabled && !config.evening.enabled {
        return StoreStatus::closed(StatusReason::ShiftsPaused);
    }

    if let Some(span) = active_span(&config.morning) {
        if span.contains(minute) {
            return StoreStatus::open(StatusReason::MorningShift);
        }
    }
    if let Some(span) = active_span(&config.evening) {
        if span.contains(minute) {
            return StoreStatus::open(StatusReason::EveningShift);
        }
    }

    StoreStatus::closed(StatusReason::OutsideShifts)
}

/// Raccourci booléen sur une heure murale.
pub fn is_store_open(now: NaiveTime, config: &StoreConfig) -> bool {
    evaluate(minute_of_day(now), config).open
}
