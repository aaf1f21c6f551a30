//! Pointage du staff : prises et fins de service, résumé Discord.

use crate::model::{CheckinRecord, StaffId, StaffLog, StaffMember};
use crate::monitor::local_hhmm;
use crate::notification::{Embed, EmbedField, COLOR_CLOSED, COLOR_OPEN, FOOTER_TEXT};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffError {
    #[error("unknown staff handle: {0}")]
    UnknownHandle(String),
    #[error("already checked in: {0}")]
    AlreadyActive(String),
    #[error("not checked in: {0}")]
    NotActive(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinAction {
    In,
    Out,
}

/// Rôle affiché quand un membre n'en a pas.
const DEFAULT_ROLE: &str = "Membres";

/// Encapsule un journal de pointage en cours de modification.
#[derive(Debug, Default)]
pub struct CheckinBoard {
    log: StaffLog,
}

impl CheckinBoard {
    pub fn new() -> Self {
        Self {
            log: StaffLog::default(),
        }
    }

    pub fn log(&self) -> &StaffLog {
        &self.log
    }
    pub fn log_mut(&mut self) -> &mut StaffLog {
        &mut self.log
    }

    pub fn add_members(&mut self, members: Vec<StaffMember>) {
        self.log.people.extend(members);
    }

    /// Prise de service. Refusée si un pointage est déjà actif.
    pub fn check_in(&mut self, handle: &str, at: DateTime<Utc>) -> Result<StaffId, StaffError> {
        let member = self
            .log
            .find_member_by_handle(handle)
            .ok_or_else(|| StaffError::UnknownHandle(handle.to_string()))?;
        let id = member.id.clone();
        if self.log.has_active_record(&id) {
            return Err(StaffError::AlreadyActive(handle.to_string()));
        }
        self.log.checkins.push(CheckinRecord {
            staff: id.clone(),
            checked_in_at: at,
            checked_out_at: None,
            active: true,
        });
        Ok(id)
    }

    /// Fin de service. Refusée si aucun pointage n'est actif.
    pub fn check_out(&mut self, handle: &str, at: DateTime<Utc>) -> Result<StaffId, StaffError> {
        let member = self
            .log
            .find_member_by_handle(handle)
            .ok_or_else(|| StaffError::UnknownHandle(handle.to_string()))?;
        let id = member.id.clone();
        let record = self
            .log
            .active_record_mut(&id)
            .ok_or_else(|| StaffError::NotActive(handle.to_string()))?;
        record.active = false;
        record.checked_out_at = Some(at);
        Ok(id)
    }

    /// Pointages actifs joints à leur membre, ordre d'arrivée.
    pub fn active(&self) -> Vec<(&StaffMember, &CheckinRecord)> {
        self.log
            .checkins
            .iter()
            .filter(|c| c.active)
            .filter_map(|c| self.log.find_member_by_id(&c.staff).map(|m| (m, c)))
            .collect()
    }

    /// Résumé Discord d'un pointage : qui vient d'entrer/sortir, puis le
    /// staff actif groupé par rôle avec l'heure murale de prise de service.
    pub fn summary_embed(
        &self,
        who: &str,
        action: CheckinAction,
        at: DateTime<Utc>,
        utc_offset_hours: i8,
    ) -> Embed {
        let (emoji, text, color) = match action {
            CheckinAction::In => ("✅", "a pris son service", COLOR_OPEN),
            CheckinAction::Out => ("❌", "a quitté son service", COLOR_CLOSED),
        };

        let mut by_role: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (member, record) in self.active() {
            let role = member.role.as_deref().unwrap_or(DEFAULT_ROLE);
            let time = local_hhmm(record.checked_in_at, utc_offset_hours);
            by_role
                .entry(role)
                .or_default()
                .push(format!("✅ {} ({time})", member.display_name));
        }

        let mut embed = Embed::new(
            format!("{emoji} {who} {text}"),
            color,
            at,
            format!("{FOOTER_TEXT} — pointage du staff"),
        );
        embed.description = Some("**Staff actuellement en service :**".to_string());

        if by_role.is_empty() {
            embed.fields.push(EmbedField::new(
                "📋 Staff",
                "❌ Personne en service actuellement",
                false,
            ));
        } else {
            for (role, members) in by_role {
                embed
                    .fields
                    .push(EmbedField::new(format!("📋 {role}"), members.join("\n"), false));
            }
        }

        embed
    }
}

impl From<StaffLog> for CheckinBoard {
    fn from(log: StaffLog) -> Self {
        Self { log }
    }
}
