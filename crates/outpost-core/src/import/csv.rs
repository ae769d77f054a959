//! CSV import parsing.
//!
//! Headed CSV with one record per row. Multi-valued columns (phones,
//! emails, tags) pack their values with `;` inside a single cell.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{GroupImport, ProspectImport};

#[derive(Debug, Deserialize)]
struct ProspectRow {
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    phones: String,
    #[serde(default)]
    emails: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    notes: Option<String>,
}

fn split_multi(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn parse_prospects(input: &str) -> Result<Vec<ProspectImport>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<ProspectRow>().enumerate() {
        let row = row.with_context(|| format!("bad CSV prospect row {}", i + 2))?;
        records.push(ProspectImport {
            name: row.name,
            country: none_if_blank(row.country),
            city: none_if_blank(row.city),
            phones: split_multi(&row.phones),
            emails: split_multi(&row.emails),
            tags: split_multi(&row.tags),
            notes: none_if_blank(row.notes),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct GroupRow {
    name: String,
    url: String,
    // Option so an empty cell reads as None instead of a parse error.
    #[serde(default)]
    member_count: Option<i32>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    tags: String,
}

pub fn parse_groups(input: &str) -> Result<Vec<GroupImport>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<GroupRow>().enumerate() {
        let row = row.with_context(|| format!("bad CSV group row {}", i + 2))?;
        records.push(GroupImport {
            name: row.name,
            url: row.url,
            member_count: row.member_count.unwrap_or(0),
            language: none_if_blank(row.language),
            tags: split_multi(&row.tags),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_splits_multi_values() {
        let input = "\
name,country,city,phones,emails,tags,notes
Acme Widgets,PT,Lisbon,555-0100; 555-0101,sales@acme.test,maker;local,Met at expo
Globex,,,,,,
";
        let records = parse_prospects(input).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name, "Acme Widgets");
        assert_eq!(records[0].phones, vec!["555-0100", "555-0101"]);
        assert_eq!(records[0].tags, vec!["maker", "local"]);
        assert_eq!(records[0].notes.as_deref(), Some("Met at expo"));

        assert_eq!(records[1].name, "Globex");
        assert!(records[1].phones.is_empty());
        assert!(records[1].country.is_none());
    }

    #[test]
    fn short_rows_are_tolerated() {
        let input = "name,country,city,phones,emails,tags,notes\nShorty\n";
        let records = parse_prospects(input).unwrap();
        assert_eq!(records[0].name, "Shorty");
    }

    #[test]
    fn reports_row_number_on_bad_input() {
        // A row that cannot be deserialized at all (no name column value
        // where one is required by shape) comes from a headerless file.
        let err = parse_prospects("just,some,cells\n1,2,3\n");
        // Headers do not include "name": every data row fails.
        assert!(err.is_err());
    }

    #[test]
    fn empty_file_yields_no_records() {
        let records = parse_prospects("name,phones\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn parses_group_rows() {
        let input = "\
name,url,member_count,language,tags
Lisbon Makers,https://facebook.com/groups/lisbonmakers,1200,pt,maker;local
Tiny Group,https://facebook.com/groups/tiny,,,
";
        let records = parse_groups(input).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name, "Lisbon Makers");
        assert_eq!(records[0].member_count, 1200);
        assert_eq!(records[0].tags, vec!["maker", "local"]);

        assert_eq!(records[1].member_count, 0);
        assert!(records[1].language.is_none());
        assert!(records[1].tags.is_empty());
    }
}
