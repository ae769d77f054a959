//! LinkedIn paste parsing.
//!
//! Operators copy search results out of LinkedIn as loose text. Each
//! prospect is one block separated by blank lines: the first line is the
//! business name, `Phone:` and `Email:` lines carry contacts, a line of
//! the form `City, Country` fills location, and anything left over lands
//! in the notes.

use super::ProspectImport;

pub fn parse_prospects(input: &str) -> Vec<ProspectImport> {
    input
        .split("\n\n")
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<ProspectImport> {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());

    let name = lines.next()?.to_string();
    let mut record = ProspectImport {
        name,
        ..ProspectImport::default()
    };

    let mut notes = Vec::new();
    for line in lines {
        if let Some(phone) = line.strip_prefix("Phone:") {
            let phone = phone.trim();
            if !phone.is_empty() {
                record.phones.push(phone.to_string());
            }
        } else if let Some(email) = line.strip_prefix("Email:") {
            let email = email.trim();
            if !email.is_empty() {
                record.emails.push(email.to_string());
            }
        } else if record.city.is_none() {
            match split_location(line) {
                Some((city, country)) => {
                    record.city = Some(city);
                    record.country = Some(country);
                }
                None => notes.push(line),
            }
        } else {
            notes.push(line);
        }
    }

    if !notes.is_empty() {
        record.notes = Some(notes.join("\n"));
    }

    Some(record)
}

/// `City, Country` with exactly one comma and text on both sides.
fn split_location(line: &str) -> Option<(String, String)> {
    let (city, country) = line.split_once(',')?;
    let city = city.trim();
    let country = country.trim();
    if city.is_empty() || country.is_empty() || country.contains(',') {
        return None;
    }
    Some((city.to_string(), country.to_string()))
}
