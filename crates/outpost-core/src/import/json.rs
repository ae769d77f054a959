//! JSON import parsing.
//!
//! Each file is a top-level JSON array. Unknown keys are ignored and
//! missing optional fields default, so exports from other tools usually
//! load without massaging.

use anyhow::{Context, Result};

use super::{GroupImport, ProspectImport, TemplateImport};

pub fn parse_prospects(input: &str) -> Result<Vec<ProspectImport>> {
    serde_json::from_str(input).context("prospect JSON is not an array of prospect objects")
}

pub fn parse_templates(input: &str) -> Result<Vec<TemplateImport>> {
    serde_json::from_str(input).context("template JSON is not an array of template objects")
}

pub fn parse_groups(input: &str) -> Result<Vec<GroupImport>> {
    serde_json::from_str(input).context("group JSON is not an array of group objects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prospect_array_with_defaults() {
        let input = r#"[
            {"name": "Acme Widgets", "phones": ["555-0100"], "city": "Lisbon"},
            {"name": "Globex", "emails": ["hello@globex.test"], "extra_key": 42}
        ]"#;

        let records = parse_prospects(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Acme Widgets");
        assert_eq!(records[0].phones, vec!["555-0100"]);
        assert_eq!(records[0].city.as_deref(), Some("Lisbon"));
        assert!(records[1].phones.is_empty());
        assert_eq!(records[1].emails, vec!["hello@globex.test"]);
    }

    #[test]
    fn parses_template_array() {
        let input = r#"[{"title": "Intro", "body": "Hello there"}]"#;
        let records = parse_templates(input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Intro");
    }

    #[test]
    fn parses_group_array_with_default_member_count() {
        let input = r#"[{"name": "Crafts", "url": "https://facebook.com/groups/crafts"}]"#;
        let records = parse_groups(input).unwrap();
        assert_eq!(records[0].member_count, 0);
    }

    #[test]
    fn rejects_non_array_input() {
        assert!(parse_prospects(r#"{"name": "not an array"}"#).is_err());
        assert!(parse_templates("not json").is_err());
    }
}
