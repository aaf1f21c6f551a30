//! Notifications Discord (webhook entrant) : rendu d'embeds et envoi.
//!
//! L'envoi est « meilleur effort » : un échec est tracé puis avalé, jamais
//! rejoué, jamais remonté au chemin d'évaluation.

use crate::model::{ShiftWindow, StatusReason, StoreConfig, StoreStatus};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const COLOR_OPEN: u32 = 0x22c55e;
pub const COLOR_CLOSED: u32 = 0xef4444;
pub const COLOR_VACATION: u32 = 0xf59e0b;
pub const COLOR_INFO: u32 = 0x3b82f6;

pub const FOOTER_TEXT: &str = "Boutique communautaire";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Document accepté par le webhook : titre, couleur, champs, horodatage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: EmbedFooter,
}

impl Embed {
    pub fn new<T: Into<String>, F: Into<String>>(
        title: T,
        color: u32,
        at: DateTime<Utc>,
        footer: F,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            fields: Vec::new(),
            timestamp: at.to_rfc3339(),
            footer: EmbedFooter {
                text: footer.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

/// Canal d'envoi : une implémentation HTTP réelle, des doubles en test.
pub trait Notifier {
    fn send(&self, embed: Embed) -> Result<()>;
}

/// POST JSON vers une URL de webhook Discord fixe.
pub struct DiscordNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl DiscordNotifier {
    pub fn new<U: Into<String>>(url: U) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building http client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl Notifier for DiscordNotifier {
    fn send(&self, embed: Embed) -> Result<()> {
        let payload = WebhookPayload {
            embeds: vec![embed],
        };
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .context("posting webhook")?;
        let status = response.status();
        if !status.is_success() {
            bail!("webhook returned {status}");
        }
        debug!(%status, "webhook delivered");
        Ok(())
    }
}

/// Notifier inerte, utilisé quand aucune URL de webhook n'est configurée.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn send(&self, embed: Embed) -> Result<()> {
        debug!(title = %embed.title, "no webhook configured, dropping notification");
        Ok(())
    }
}

/// Envoi sans retour : l'échec est tracé, l'appelant n'en sait rien.
pub fn dispatch(notifier: &dyn Notifier, embed: Embed) {
    if let Err(err) = notifier.send(embed) {
        warn!(error = %err, "webhook dispatch failed");
    }
}

/// Envoie le statut courant si — et seulement si — il vient de basculer.
pub fn notify_if_changed(
    previous_open: bool,
    status: &StoreStatus,
    config: &StoreConfig,
    at: DateTime<Utc>,
    notifier: &dyn Notifier,
) {
    if previous_open == status.open {
        return;
    }
    dispatch(notifier, status_embed(status, config, at));
}

fn shift_line(label: &str, window: &ShiftWindow) -> String {
    let mark = if window.enabled { "✅" } else { "❌" };
    format!("{mark} {label} ({} - {})", window.start, window.end)
}

fn push_common_fields(embed: &mut Embed, config: &StoreConfig, include_disabled: bool) {
    let mut lines = Vec::new();
    if include_disabled || config.morning.enabled {
        lines.push(shift_line("Shift du matin", &config.morning));
    }
    if include_disabled || config.evening.enabled {
        lines.push(shift_line("Shift du soir", &config.evening));
    }
    if !lines.is_empty() {
        embed
            .fields
            .push(EmbedField::new("⚡ Shifts", lines.join("\n"), false));
    }
    if !config.discord_message.trim().is_empty() {
        embed.fields.push(EmbedField::new(
            "💬 Message",
            config.discord_message.clone(),
            false,
        ));
    }
}

/// Embed du chemin « transition d'état » (et des envois manuels).
///
/// En vacances : titre dédié et message de vacances seul, sans les horaires.
pub fn status_embed(status: &StoreStatus, config: &StoreConfig, at: DateTime<Utc>) -> Embed {
    let (emoji, text, color) = if status.reason == StatusReason::Vacation {
        ("🏖️", "en vacances", COLOR_VACATION)
    } else if status.open {
        ("🟢", "ouverte", COLOR_OPEN)
    } else {
        ("🔴", "fermée", COLOR_CLOSED)
    };

    let mut embed = Embed::new(
        format!("{emoji} Statut de la boutique : {text}"),
        color,
        at,
        FOOTER_TEXT,
    );

    if status.reason == StatusReason::Vacation {
        if !config.vacation.message.trim().is_empty() {
            embed.fields.push(EmbedField::new(
                "📝 Message de vacances",
                config.vacation.message.clone(),
                false,
            ));
        }
        if !config.discord_message.trim().is_empty() {
            embed.fields.push(EmbedField::new(
                "💬 Message",
                config.discord_message.clone(),
                false,
            ));
        }
    } else {
        push_common_fields(&mut embed, config, true);
    }

    embed
}

/// Embed du chemin « borne horaire » (déclencheur planifié).
///
/// Seuls les shifts actifs sont listés ; le pied de page marque l'envoi
/// automatique. Le mode vacances ne passe jamais par ici.
pub fn auto_status_embed(open: bool, config: &StoreConfig, at: DateTime<Utc>) -> Embed {
    let (emoji, text, color) = if open {
        ("🟢", "ouverte", COLOR_OPEN)
    } else {
        ("🔴", "fermée", COLOR_CLOSED)
    };

    let mut embed = Embed::new(
        format!("{emoji} Statut de la boutique : {text}"),
        color,
        at,
        format!("{FOOTER_TEXT} — mise à jour automatique"),
    );
    push_common_fields(&mut embed, config, false);
    embed
}
