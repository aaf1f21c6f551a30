//! Candidatures de recrutement : dépôt, décision, trace de qui a traité.

use crate::notification::{Embed, EmbedField, COLOR_CLOSED, COLOR_OPEN, FOOTER_TEXT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifiant fort pour JobApplication
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Candidature à un poste du staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub account_name: String,
    pub character_name: String,
    pub discord_handle: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

/// Décision d'un admin sur une candidature en attente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept { role: String },
    Reject,
}

#[derive(Error, Debug)]
pub enum RecruitError {
    #[error("unknown application: {0}")]
    Unknown(String),
    #[error("application already processed: {0}")]
    AlreadyProcessed(String),
}

/// Registre des candidatures.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplicationLedger {
    pub applications: Vec<JobApplication>,
}

impl ApplicationLedger {
    /// Dépose une candidature, en attente de décision.
    pub fn submit<A, C, D>(&mut self, account: A, character: C, discord: D, at: DateTime<Utc>) -> ApplicationId
    where
        A: Into<String>,
        C: Into<String>,
        D: Into<String>,
    {
        let application = JobApplication {
            id: ApplicationId::random(),
            account_name: account.into(),
            character_name: character.into(),
            discord_handle: discord.into(),
            status: ApplicationStatus::Pending,
            submitted_at: at,
            assigned_role: None,
            handled_by: None,
            processed_at: None,
        };
        let id = application.id.clone();
        self.applications.push(application);
        id
    }

    pub fn find(&self, id: &ApplicationId) -> Option<&JobApplication> {
        self.applications.iter().find(|a| &a.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &JobApplication> {
        self.applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
    }

    /// Applique une décision. Seule une candidature encore en attente peut
    /// être traitée ; l'admin décideur et l'instant sont consignés.
    pub fn process(
        &mut self,
        id: &ApplicationId,
        decision: Decision,
        handled_by: &str,
        at: DateTime<Utc>,
    ) -> Result<&JobApplication, RecruitError> {
        let application = self
            .applications
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| RecruitError::Unknown(id.as_str().to_string()))?;

        if application.status != ApplicationStatus::Pending {
            return Err(RecruitError::AlreadyProcessed(id.as_str().to_string()));
        }

        match decision {
            Decision::Accept { role } => {
                application.status = ApplicationStatus::Accepted;
                application.assigned_role = Some(role);
            }
            Decision::Reject => {
                application.status = ApplicationStatus::Rejected;
            }
        }
        application.handled_by = Some(handled_by.to_string());
        application.processed_at = Some(at);

        Ok(application)
    }
}

/// Embed annonçant la décision sur une candidature traitée.
pub fn decision_embed(application: &JobApplication, at: DateTime<Utc>) -> Embed {
    let (title, color) = match application.status {
        ApplicationStatus::Accepted => ("✅ Candidature acceptée", COLOR_OPEN),
        _ => ("🔴 Candidature refusée", COLOR_CLOSED),
    };

    let mut embed = Embed::new(title, color, at, FOOTER_TEXT);
    embed.fields.push(EmbedField::new(
        "Compte",
        application.account_name.clone(),
        true,
    ));
    embed.fields.push(EmbedField::new(
        "Personnage",
        application.character_name.clone(),
        true,
    ));
    embed.fields.push(EmbedField::new(
        "Discord",
        application.discord_handle.clone(),
        true,
    ));
    if let Some(role) = &application.assigned_role {
        embed.fields.push(EmbedField::new("Rôle", role.clone(), true));
    }
    if let Some(by) = &application.handled_by {
        embed.fields.push(EmbedField::new("Traité par", by.clone(), true));
    }

    embed
}
