//! Bulk imports from external files.
//!
//! Three formats feed the same insert loops: JSON arrays for prospects,
//! templates and groups, CSV for prospects and groups, and the loose text blocks
//! people paste out of LinkedIn search results. Parsing never writes;
//! records that fail to insert are skipped with a warning so one bad row
//! does not abort a whole file.

pub mod csv;
pub mod json;
pub mod linkedin;

use anyhow::Result;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::warn;

use outpost_db::models::ProspectSource;
use outpost_db::queries::groups::NewGroup;
use outpost_db::queries::prospects::NewProspect;
use outpost_db::queries::{groups, prospects, templates};

/// A prospect as it appears in an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProspectImport {
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// A text template as it appears in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateImport {
    pub title: String,
    pub body: String,
}

/// A group as it appears in an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroupImport {
    pub name: String,
    pub url: String,
    pub member_count: i32,
    pub language: Option<String>,
    pub tags: Vec<String>,
}

/// How many records an import run stored and how many it dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Store parsed prospects, tagging each with the given source.
pub async fn import_prospects(
    pool: &PgPool,
    records: &[ProspectImport],
    source: ProspectSource,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for record in records {
        if record.name.trim().is_empty() {
            warn!("skipping prospect import record with empty name");
            report.skipped += 1;
            continue;
        }

        let new = NewProspect {
            name: record.name.trim().to_string(),
            country: record.country.clone(),
            city: record.city.clone(),
            phones: record.phones.clone(),
            emails: record.emails.clone(),
            tags: record.tags.clone(),
            notes: record.notes.clone(),
        };

        match prospects::insert_prospect(pool, &new, source).await {
            Ok(_) => report.imported += 1,
            Err(e) => {
                warn!(name = %record.name, error = %e, "prospect import record failed, skipping");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Store parsed templates.
pub async fn import_templates(pool: &PgPool, records: &[TemplateImport]) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for record in records {
        if record.title.trim().is_empty() || record.body.trim().is_empty() {
            warn!("skipping template import record with empty title or body");
            report.skipped += 1;
            continue;
        }

        match templates::insert_template(pool, record.title.trim(), &record.body).await {
            Ok(_) => report.imported += 1,
            Err(e) => {
                warn!(title = %record.title, error = %e, "template import record failed, skipping");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Store parsed groups.
pub async fn import_groups(pool: &PgPool, records: &[GroupImport]) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for record in records {
        if record.name.trim().is_empty() || record.url.trim().is_empty() {
            warn!("skipping group import record with empty name or url");
            report.skipped += 1;
            continue;
        }

        let new = NewGroup {
            name: record.name.trim(),
            url: record.url.trim(),
            member_count: record.member_count,
            language: record.language.as_deref(),
            tags: &record.tags,
            owner_account_id: None,
        };

        match groups::insert_group(pool, &new).await {
            Ok(_) => report.imported += 1,
            Err(e) => {
                warn!(name = %record.name, error = %e, "group import record failed, skipping");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}
