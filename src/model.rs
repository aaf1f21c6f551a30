use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fenêtre de shift quotidienne, bornes en heure murale "HH:MM".
///
/// `end` peut être numériquement inférieur à `start` : la fenêtre chevauche
/// alors minuit (ex. 22:00 → 06:00).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub enabled: bool,
    pub start: String,
    pub end: String,
}

impl ShiftWindow {
    pub fn new<S: Into<String>, E: Into<String>>(enabled: bool, start: S, end: E) -> Self {
        Self {
            enabled,
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Mode vacances : force « fermé » et remplace le message affiché.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VacationState {
    pub active: bool,
    #[serde(default)]
    pub message: String,
}

impl VacationState {
    pub fn with_message<S: Into<String>>(active: bool, message: S) -> Self {
        Self {
            active,
            message: message.into(),
        }
    }
}

/// Configuration complète du statut de la boutique.
///
/// Les valeurs par défaut servent aussi de repli quand les réglages sont
/// absents ou illisibles : deux shifts actifs, 08:00–14:00 et 16:00–22:00,
/// décalage UTC+3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub morning: ShiftWindow,
    pub evening: ShiftWindow,
    pub vacation: VacationState,
    #[serde(default)]
    pub discord_message: String,
    pub utc_offset_hours: i8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            morning: ShiftWindow::new(true, "08:00", "14:00"),
            evening: ShiftWindow::new(true, "16:00", "22:00"),
            vacation: VacationState::default(),
            discord_message: String::new(),
            utc_offset_hours: 3,
        }
    }
}

/// Pourquoi la boutique est ouverte ou fermée à l'instant évalué.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReason {
    Vacation,
    ShiftsPaused,
    MorningShift,
    EveningShift,
    OutsideShifts,
}

impl StatusReason {
    pub fn label(&self) -> &'static str {
        match self {
            StatusReason::Vacation => "vacances",
            StatusReason::ShiftsPaused => "shifts en pause",
            StatusReason::MorningShift => "shift du matin",
            StatusReason::EveningShift => "shift du soir",
            StatusReason::OutsideShifts => "hors shift",
        }
    }
}

/// Statut dérivé, recalculé à chaque évaluation — jamais persisté.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatus {
    pub open: bool,
    pub reason: StatusReason,
}

impl StoreStatus {
    pub fn open(reason: StatusReason) -> Self {
        Self { open: true, reason }
    }
    pub fn closed(reason: StatusReason) -> Self {
        Self { open: false, reason }
    }
}

/// Identifiant fort pour StaffMember
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Membre du staff de la boutique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub handle: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl StaffMember {
    pub fn new<H: Into<String>, D: Into<String>>(handle: H, display_name: D) -> Self {
        Self {
            id: StaffId::random(),
            handle: handle.into(),
            display_name: display_name.into(),
            role: None,
        }
    }
}

/// Entrée du journal de pointage (horodatages UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    pub staff: StaffId,
    pub checked_in_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Journal complet : membres + pointages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaffLog {
    pub people: Vec<StaffMember>,
    pub checkins: Vec<CheckinRecord>,
}

impl StaffLog {
    pub fn find_member_by_handle<'a>(&'a self, handle: &str) -> Option<&'a StaffMember> {
        self.people.iter().find(|p| p.handle == handle)
    }
    pub fn find_member_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a StaffMember> {
        self.people.iter().find(|p| &p.id == id)
    }
    pub fn active_record_mut(&mut self, id: &StaffId) -> Option<&mut CheckinRecord> {
        self.checkins.iter_mut().find(|c| &c.staff == id && c.active)
    }
    pub fn has_active_record(&self, id: &StaffId) -> bool {
        self.checkins.iter().any(|c| &c.staff == id && c.active)
    }
}
