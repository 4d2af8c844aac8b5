// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::{Contact, ProductLead};

/// Parse a backend timestamp, treating anything unparseable as the epoch so
/// that broken rows sink to the bottom of their status group.
fn parse_timestamp(raw: &str) -> OffsetDateTime {
    OffsetDateTime::parse(raw, &Rfc3339).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Order leads for the admin table: actionable statuses first (`new`, then
/// `contacted`, then `completed`), newest first within a status. Stable, so
/// equal keys keep their input order.
pub fn sort_leads(leads: &mut [ProductLead]) {
    leads.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| parse_timestamp(&b.timestamp).cmp(&parse_timestamp(&a.timestamp)))
    });
}

/// Same ordering for contact messages (`new` before `contacted`).
pub fn sort_contacts(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| parse_timestamp(&b.timestamp).cmp(&parse_timestamp(&a.timestamp)))
    });
}

#[cfg(test)]
mod tests {
    use super::{sort_contacts, sort_leads};
    use crate::model::{Contact, ProductLead};

    fn lead(id: &str, status: &str, timestamp: &str) -> ProductLead {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "status": "{status}", "timestamp": "{timestamp}"}}"#
        ))
        .expect("lead")
    }

    fn contact(id: &str, status: &str, timestamp: &str) -> Contact {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "status": "{status}", "timestamp": "{timestamp}"}}"#
        ))
        .expect("contact")
    }

    fn lead_ids(leads: &[ProductLead]) -> Vec<&str> {
        leads.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn status_outranks_recency() {
        let mut leads = vec![
            lead("older-new", "new", "2026-01-01T10:00:00Z"),
            lead("done", "completed", "2026-03-01T10:00:00Z"),
            lead("contacted", "contacted", "2026-02-01T10:00:00Z"),
        ];
        sort_leads(&mut leads);
        assert_eq!(lead_ids(&leads), ["older-new", "contacted", "done"]);
    }

    #[test]
    fn newer_timestamps_come_first_within_a_status() {
        let mut leads = vec![
            lead("jan", "new", "2026-01-05T10:00:00Z"),
            lead("mar", "new", "2026-03-05T10:00:00Z"),
            lead("feb", "new", "2026-02-05T10:00:00Z"),
        ];
        sort_leads(&mut leads);
        assert_eq!(lead_ids(&leads), ["mar", "feb", "jan"]);
    }

    #[test]
    fn new_lead_precedes_older_contacted_lead() {
        let mut leads = vec![
            lead("contacted-t1", "contacted", "2026-01-01T10:00:00Z"),
            lead("new-t2", "new", "2026-01-02T10:00:00Z"),
        ];
        sort_leads(&mut leads);
        assert_eq!(lead_ids(&leads), ["new-t2", "contacted-t1"]);
    }

    #[test]
    fn unparseable_timestamps_sink_within_their_status() {
        let mut leads = vec![
            lead("broken", "new", "last tuesday"),
            lead("dated", "new", "2026-01-01T10:00:00Z"),
        ];
        sort_leads(&mut leads);
        assert_eq!(lead_ids(&leads), ["dated", "broken"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut leads = vec![
            lead("first", "new", "2026-01-01T10:00:00Z"),
            lead("second", "new", "2026-01-01T10:00:00Z"),
        ];
        sort_leads(&mut leads);
        assert_eq!(lead_ids(&leads), ["first", "second"]);
    }

    #[test]
    fn contacts_sort_new_before_contacted() {
        let mut contacts = vec![
            contact("c1", "contacted", "2026-02-01T10:00:00Z"),
            contact("c2", "new", "2026-01-01T10:00:00Z"),
            contact("c3", "new", "2026-01-15T10:00:00Z"),
        ];
        sort_contacts(&mut contacts);
        let ids: Vec<&str> = contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c3", "c2", "c1"]);
    }
}
