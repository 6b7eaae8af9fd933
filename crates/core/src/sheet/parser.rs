//! Quote-aware CSV parsing for the passcode sheet.
//!
//! The format is deliberately forgiving: a `"` toggles quoted mode and is
//! never emitted, there is no escape for literal quotes, and rows that do not
//! look like records are dropped instead of reported.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::models::{Record, Sheet};

const MIN_FIELDS: usize = 5;

/// Split one CSV line into raw (untrimmed) fields.
pub fn split_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for ch in row.chars() {
        match ch {
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Parse the whole sheet text. The first non-blank line is the header.
pub fn parse_sheet(text: &str) -> Sheet {
    let records: Vec<Record> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .enumerate()
        .filter_map(|(index, line)| {
            let record = parse_record(line);
            if record.is_none() {
                debug!(row = index + 1, "Skipping malformed sheet row");
            }
            record
        })
        .collect();

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.passcode.as_str()) {
            warn!(passcode = %record.passcode, name = %record.name, "Duplicate passcode is shadowed by an earlier row");
        }
    }

    Sheet::from_records(records)
}

fn parse_record(line: &str) -> Option<Record> {
    let cells = split_row(line);
    if cells.len() < MIN_FIELDS || cells[0].trim().is_empty() {
        return None;
    }

    let field = |index: usize| cells[index].trim().to_string();
    let fallback2 = field(4);
    let fallback3 = cells
        .get(5)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
        .unwrap_or_else(|| fallback2.clone());

    Some(Record {
        name: field(0),
        passcode: field(1),
        video_link: field(2),
        fallback_links: [field(3), fallback2, fallback3],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name,Passcode,Video,Fallback 1,Fallback 2,Fallback 3";

    #[test]
    fn quoted_commas_stay_in_one_field() {
        let fields = split_row(r#""a,b",x,y,z,w"#);
        assert_eq!(fields, vec!["a,b", "x", "y", "z", "w"]);
    }

    #[test]
    fn every_quote_is_stripped() {
        let fields = split_row(r#"say ""hi"",ok"#);
        assert_eq!(fields, vec!["say hi", "ok"]);
    }

    #[test]
    fn trailing_comma_yields_empty_field() {
        assert_eq!(split_row("a,b,"), vec!["a", "b", ""]);
        assert_eq!(split_row(""), vec![""]);
    }

    #[test]
    fn accepts_rows_in_order_and_skips_malformed() {
        let text = format!(
            "{HEADER}\n\
             Alice,1-1-1-1-1,https://v/d/a,https://f/d/1,https://f/d/2,https://f/d/3\n\
             \n   \n\
             short,row,only\n\
             ,2-2-2-2-2,https://v/d/b,x,y\n\
             Bob , 1-2-3-4-5 ,https://v/d/bob,p,q,r\n"
        );
        let sheet = parse_sheet(&text);
        let names: Vec<&str> = sheet.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(sheet.records[1].passcode, "1-2-3-4-5");
        assert_eq!(sheet.records[1].video_link, "https://v/d/bob");
    }

    #[test]
    fn missing_sixth_field_inherits_fifth() {
        let sheet = parse_sheet(&format!("{HEADER}\nN,P,V,F1,F2\nM,Q,W,G1,G2,  \n"));
        assert_eq!(sheet.records[0].fallback_links, ["F1", "F2", "F2"].map(String::from));
        assert_eq!(sheet.records[1].fallback_links, ["G1", "G2", "G2"].map(String::from));
    }

    #[test]
    fn fallbacks_come_from_first_record_only() {
        let sheet = parse_sheet(&format!("{HEADER}\nA,1,V,,F2,F2\nB,2,V,X,Y,Z\n"));
        assert_eq!(sheet.fallbacks, vec!["F2", "F2"]);
    }

    #[test]
    fn header_only_sheet_is_empty() {
        let sheet = parse_sheet(&format!("{HEADER}\n"));
        assert!(sheet.is_empty());
        assert!(sheet.fallbacks.is_empty());
        assert!(parse_sheet("").is_empty());
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let sheet = parse_sheet(&format!("{HEADER}\r\nA,1-2-3-4-5,V,F1,F2,F3\r\n"));
        assert_eq!(sheet.records.len(), 1);
        assert_eq!(sheet.records[0].fallback_links[2], "F3");
    }

    #[test]
    fn duplicate_passcodes_are_kept_in_order() {
        let sheet = parse_sheet(&format!("{HEADER}\nFirst,1,V1,F,F\nSecond,1,V2,F,F\n"));
        assert_eq!(sheet.records.len(), 2);
        assert_eq!(sheet.records[0].name, "First");
    }
}
