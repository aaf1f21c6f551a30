//! Réglages de la boutique : paires clé/valeur (chaînes) persistées.
//!
//! Lecture par liste de clés, écriture par upsert individuel. Toute clé
//! absente ou illisible retombe sur la valeur par défaut de [`StoreConfig`].

use crate::model::StoreConfig;
use crate::storage::{JsonStorage, Storage};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

pub mod keys {
    pub const MORNING_ENABLED: &str = "morning_shift_enabled";
    pub const MORNING_START: &str = "morning_shift_start";
    pub const MORNING_END: &str = "morning_shift_end";
    pub const EVENING_ENABLED: &str = "evening_shift_enabled";
    pub const EVENING_START: &str = "evening_shift_start";
    pub const EVENING_END: &str = "evening_shift_end";
    pub const VACATION_MODE: &str = "store_vacation_mode";
    pub const VACATION_MESSAGE: &str = "store_vacation_message";
    pub const DISCORD_MESSAGE: &str = "store_discord_message";
    pub const UTC_OFFSET: &str = "store_utc_offset";

    /// Les clés consommées par l'évaluateur de statut.
    pub const STORE_STATUS: &[&str] = &[
        MORNING_ENABLED,
        MORNING_START,
        MORNING_END,
        EVENING_ENABLED,
        EVENING_START,
        EVENING_END,
        VACATION_MODE,
        VACATION_MESSAGE,
        DISCORD_MESSAGE,
        UTC_OFFSET,
    ];
}

/// Un réglage nommé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

pub trait SettingsStore {
    /// Lit les réglages correspondant aux clés demandées (absents omis).
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Setting>>;
    /// Crée ou remplace un réglage.
    fn upsert(&self, key: &str, value: &str) -> Result<()>;
}

/// Réglages dans un unique fichier JSON (carte plate clé → valeur).
pub struct JsonSettingsStore {
    store: JsonStorage<BTreeMap<String, String>>,
}

impl JsonSettingsStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            store: JsonStorage::open(path)?,
        })
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Setting>> {
        let map = self.store.load_or_default()?;
        Ok(keys
            .iter()
            .filter_map(|k| {
                map.get(*k).map(|v| Setting {
                    key: (*k).to_string(),
                    value: v.clone(),
                })
            })
            .collect())
    }

    fn upsert(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.store.load_or_default()?;
        map.insert(key.to_string(), value.to_string());
        self.store.save(&map)
    }
}

/// Booléens tels qu'on les tape dans un terminal ou un fichier de réglages.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "non" | "off" => Some(false),
        _ => None,
    }
}

/// Assemble une [`StoreConfig`] à partir de réglages bruts.
///
/// Chaque clé écrase le défaut correspondant ; une valeur booléenne ou
/// numérique illisible est signalée puis ignorée.
pub fn config_from_settings(settings: &[Setting]) -> StoreConfig {
    let mut config = StoreConfig::default();

    for setting in settings {
        let value = setting.value.as_str();
        match setting.key.as_str() {
            keys::MORNING_ENABLED => apply_bool(&mut config.morning.enabled, setting),
            keys::MORNING_START => config.morning.start = value.to_string(),
            keys::MORNING_END => config.morning.end = value.to_string(),
            keys::EVENING_ENABLED => apply_bool(&mut config.evening.enabled, setting),
            keys::EVENING_START => config.evening.start = value.to_string(),
            keys::EVENING_END => config.evening.end = value.to_string(),
            keys::VACATION_MODE => apply_bool(&mut config.vacation.active, setting),
            keys::VACATION_MESSAGE => config.vacation.message = value.to_string(),
            keys::DISCORD_MESSAGE => config.discord_message = value.to_string(),
            keys::UTC_OFFSET => match value.trim().parse::<i8>() {
                Ok(h) => config.utc_offset_hours = h.clamp(-12, 14),
                Err(_) => warn!(key = %setting.key, value = %value, "unreadable offset, keeping default"),
            },
            _ => {}
        }
    }

    config
}

fn apply_bool(target: &mut bool, setting: &Setting) {
    match parse_bool(&setting.value) {
        Some(b) => *target = b,
        None => {
            warn!(key = %setting.key, value = %setting.value, "unreadable boolean, keeping default")
        }
    }
}

/// Charge la configuration courante depuis un store.
///
/// Un échec de lecture est tracé et retombe sur les défauts : l'évaluation
/// ne doit jamais échouer pour un problème de réglages.
pub fn load_store_config(store: &dyn SettingsStore) -> StoreConfig {
    match store.get_many(keys::STORE_STATUS) {
        Ok(settings) => config_from_settings(&settings),
        Err(err) => {
            warn!(error = %err, "settings fetch failed, falling back to defaults");
            StoreConfig::default()
        }
    }
}

/// Vue inverse : la configuration éclatée en réglages individuels, pour
/// l'affichage et les exports.
pub fn config_to_settings(config: &StoreConfig) -> Vec<Setting> {
    let kv = |key: &str, value: String| Setting {
        key: key.to_string(),
        value,
    };
    vec![
        kv(keys::MORNING_ENABLED, config.morning.enabled.to_string()),
        kv(keys::MORNING_START, config.morning.start.clone()),
        kv(keys::MORNING_END, config.morning.end.clone()),
        kv(keys::EVENING_ENABLED, config.evening.enabled.to_string()),
        kv(keys::EVENING_START, config.evening.start.clone()),
        kv(keys::EVENING_END, config.evening.end.clone()),
        kv(keys::VACATION_MODE, config.vacation.active.to_string()),
        kv(keys::VACATION_MESSAGE, config.vacation.message.clone()),
        kv(keys::DISCORD_MESSAGE, config.discord_message.clone()),
        kv(keys::UTC_OFFSET, config.utc_offset_hours.to_string()),
    ]
}
