//! Duplicate detection against the external call-center collection.
//!
//! A prospect matches a record when their normalized names are equal or any
//! normalized phone number is shared. Plain O(N*M) scan over the record
//! list; the collection is small enough that indexing would be overkill.

use anyhow::Result;
use sqlx::PgPool;
use tracing::warn;

use outpost_db::models::CallCenterRecord;
use outpost_db::queries::call_center;

/// Lowercase and collapse runs of whitespace to a single space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip everything but digits so formatting differences never matter.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Find the first call-center record matching a prospect's name or phones.
///
/// Empty names and empty phone strings never match anything.
pub fn find_crm_match<'a>(
    name: &str,
    phones: &[String],
    records: &'a [CallCenterRecord],
) -> Option<&'a CallCenterRecord> {
    let name = normalize_name(name);
    let phones: Vec<String> = phones
        .iter()
        .map(|p| normalize_phone(p))
        .filter(|p| !p.is_empty())
        .collect();

    records.iter().find(|record| {
        let name_hit = !name.is_empty() && normalize_name(&record.name) == name;
        let phone_hit = record.phones.iter().any(|rp| {
            let rp = normalize_phone(rp);
            !rp.is_empty() && phones.contains(&rp)
        });
        name_hit || phone_hit
    })
}

/// Load the call-center collection for matching.
///
/// A load failure degrades to "no matches" rather than failing the caller's
/// whole request, but it is logged loudly since silent degradation here can
/// hide real duplicates.
pub async fn records_for_matching(pool: &PgPool) -> Vec<CallCenterRecord> {
    match call_center::list_records(pool).await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "call-center collection unavailable, matching degraded to no-op");
            Vec::new()
        }
    }
}

/// Convenience wrapper: load records and match one prospect's fields.
pub async fn match_prospect(
    pool: &PgPool,
    name: &str,
    phones: &[String],
) -> Result<Option<CallCenterRecord>> {
    let records = records_for_matching(pool).await;
    Ok(find_crm_match(name, phones, &records).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(name: &str, phones: &[&str]) -> CallCenterRecord {
        CallCenterRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phones: phones.iter().map(|p| p.to_string()).collect(),
            source_prospect_id: None,
            call_history: serde_json::json!([]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_name("  Acme   Widgets "), "acme widgets");
        assert_eq!(normalize_name("ACME\tWidgets"), "acme widgets");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn normalizes_phones() {
        assert_eq!(normalize_phone("+1 (555) 010-2000"), "15550102000");
        assert_eq!(normalize_phone("ext."), "");
    }

    #[test]
    fn matches_on_normalized_name() {
        let records = vec![record("Acme Widgets", &[])];
        let hit = find_crm_match("  acme   WIDGETS ", &[], &records);
        assert!(hit.is_some());
    }

    #[test]
    fn matches_on_any_phone() {
        let records = vec![
            record("Other Co", &["555-0100"]),
            record("Target Co", &["+1 555 0199"]),
        ];
        let phones = vec!["junk".to_string(), "(1) 555-0199".to_string()];
        let hit = find_crm_match("No Such Name", &phones, &records);
        assert_eq!(hit.map(|r| r.name.as_str()), Some("Target Co"));
    }

    #[test]
    fn no_match_when_neither_holds() {
        let records = vec![record("Acme Widgets", &["555-0100"])];
        let phones = vec!["555-0199".to_string()];
        assert!(find_crm_match("Globex", &phones, &records).is_none());
    }

    #[test]
    fn empty_fields_never_match() {
        // A record with an empty name and an empty phone must not match a
        // prospect that is also missing those fields.
        let records = vec![record("", &[""])];
        let phones = vec!["".to_string()];
        assert!(find_crm_match("", &phones, &records).is_none());
    }

    #[test]
    fn match_is_iff() {
        // The matcher returns Some exactly when name or phone equality
        // holds after normalization.
        let records = vec![record("Acme", &["100"]), record("Globex", &["200"])];

        let cases = [
            ("acme", vec![], true),
            ("ACME ", vec!["999".to_string()], true),
            ("nobody", vec!["200".to_string()], true),
            ("nobody", vec!["999".to_string()], false),
            ("globex", vec!["100".to_string()], true),
        ];

        for (name, phones, expected) in cases {
            let got = find_crm_match(name, &phones, &records).is_some();
            assert_eq!(got, expected, "name={name:?} phones={phones:?}");
        }
    }
}
