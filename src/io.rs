use crate::model::{StaffLog, StaffMember};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Import de membres depuis CSV: header `handle,display_name[,role]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffMember>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if handle.is_empty() || display.is_empty() {
            bail!("invalid staff row (empty)");
        }
        let mut member = StaffMember::new(handle.to_string(), display.to_string());
        if let Some(role) = rec.get(2) {
            let role = role.trim();
            if !role.is_empty() {
                member.role = Some(role.to_string());
            }
        }
        out.push(member);
    }
    Ok(out)
}

/// Export CSV du journal de pointage:
/// header `handle,display_name,checked_in_at,checked_out_at,active`
pub fn export_checkins_csv<P: AsRef<Path>>(path: P, log: &StaffLog) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "handle",
        "display_name",
        "checked_in_at",
        "checked_out_at",
        "active",
    ])?;
    for record in &log.checkins {
        let member = log.find_member_by_id(&record.staff);
        let handle = member.map(|m| m.handle.as_str()).unwrap_or("");
        let display = member.map(|m| m.display_name.as_str()).unwrap_or("");
        let checked_in = record.checked_in_at.to_rfc3339();
        let checked_out = record
            .checked_out_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        let active = if record.active { "true" } else { "false" };
        w.write_record([handle, display, checked_in.as_str(), checked_out.as_str(), active])?;
    }
    w.flush()?;
    Ok(())
}
