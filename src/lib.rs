#![forbid(unsafe_code)]
//! Boutique — statut d'ouverture, pointage du staff et annonces, en local.
//!
//! - Réglages et journaux en fichiers JSON (pas de base de données).
//! - Évaluation pure des fenêtres de shift (matin/soir, chevauchement minuit,
//!   mode vacances prioritaire).
//! - Notifications Discord « meilleur effort » : tracées en cas d'échec,
//!   jamais rejouées, jamais bloquantes.
//! - Tout en UTC en interne ; l'heure murale applique le décalage configuré.

pub mod announce;
pub mod io;
pub mod model;
pub mod monitor;
pub mod notification;
pub mod recruitment;
pub mod settings;
pub mod staff;
pub mod status;
pub mod storage;

pub use announce::{Announcement, AnnouncementBook, AnnouncementKind, AnnouncementPatch};
pub use model::{
    CheckinRecord, ShiftWindow, StaffId, StaffLog, StaffMember, StatusReason, StoreConfig,
    StoreStatus, VacationState,
};
pub use monitor::{boundary_state, scheduled_pass, StatusMonitor};
pub use notification::{
    auto_status_embed, notify_if_changed, status_embed, DiscordNotifier, Embed, Notifier,
    NullNotifier,
};
pub use recruitment::{ApplicationId, ApplicationLedger, Decision, JobApplication};
pub use settings::{
    config_from_settings, load_store_config, JsonSettingsStore, Setting, SettingsStore,
};
pub use staff::{CheckinAction, CheckinBoard};
pub use status::{evaluate, is_store_open, parse_hhmm, WindowSpan};
pub use storage::{JsonStorage, Storage};
