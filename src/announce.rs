//! Annonces de la boutique : CRUD fichier et embed typé par gravité.

use crate::notification::{
    Embed, EmbedField, COLOR_CLOSED, COLOR_INFO, COLOR_OPEN, COLOR_VACATION, FOOTER_TEXT,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl AnnouncementKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "🚨",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Self::Info => COLOR_INFO,
            Self::Success => COLOR_OPEN,
            Self::Warning => COLOR_VACATION,
            Self::Error => COLOR_CLOSED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub kind: AnnouncementKind,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Champs modifiables d'une annonce. `expires_at` distingue « ne pas
/// toucher » (None) de « remplacer par » (Some, y compris Some(None)).
#[derive(Debug, Clone, Default)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<AnnouncementKind>,
    pub active: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Error, Debug)]
pub enum AnnounceError {
    #[error("unknown announcement: {0}")]
    Unknown(String),
}

/// Registre des annonces.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnnouncementBook {
    pub announcements: Vec<Announcement>,
}

impl AnnouncementBook {
    pub fn create(
        &mut self,
        title: String,
        content: String,
        kind: AnnouncementKind,
        expires_at: Option<DateTime<Utc>>,
        created_by: String,
        at: DateTime<Utc>,
    ) -> &Announcement {
        self.announcements.push(Announcement {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            kind,
            active: true,
            expires_at,
            created_by,
            created_at: at,
        });
        self.announcements.last().unwrap()
    }

    pub fn find(&self, id: &str) -> Option<&Announcement> {
        self.announcements.iter().find(|a| a.id == id)
    }

    pub fn update(&mut self, id: &str, patch: AnnouncementPatch) -> Result<&Announcement, AnnounceError> {
        let announcement = self
            .announcements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AnnounceError::Unknown(id.to_string()))?;

        if let Some(title) = patch.title {
            announcement.title = title;
        }
        if let Some(content) = patch.content {
            announcement.content = content;
        }
        if let Some(kind) = patch.kind {
            announcement.kind = kind;
        }
        if let Some(active) = patch.active {
            announcement.active = active;
        }
        if let Some(expires_at) = patch.expires_at {
            announcement.expires_at = expires_at;
        }

        Ok(announcement)
    }

    pub fn remove(&mut self, id: &str) -> Result<Announcement, AnnounceError> {
        let index = self
            .announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AnnounceError::Unknown(id.to_string()))?;
        Ok(self.announcements.remove(index))
    }

    /// Toutes les annonces, plus récentes d'abord.
    pub fn list(&self) -> Vec<&Announcement> {
        let mut out: Vec<&Announcement> = self.announcements.iter().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Annonces visibles : actives et non expirées à l'instant donné.
    pub fn active_now(&self, now: DateTime<Utc>) -> Vec<&Announcement> {
        self.list()
            .into_iter()
            .filter(|a| a.active && a.expires_at.map_or(true, |exp| exp > now))
            .collect()
    }
}

/// Embed publié à la création d'une annonce.
pub fn announcement_embed(announcement: &Announcement) -> Embed {
    let kind = announcement.kind;
    let mut embed = Embed::new(
        format!("{} {}", kind.emoji(), announcement.title),
        kind.color(),
        announcement.created_at,
        format!("{FOOTER_TEXT} — annonce"),
    );
    embed.description = Some(announcement.content.clone());
    embed
        .fields
        .push(EmbedField::new("📋 Type", kind.as_str(), true));
    embed
        .fields
        .push(EmbedField::new("👤 Par", announcement.created_by.clone(), true));
    embed
}
