use std::{io::Write, path::Path};

use serde::Serialize;

pub fn write_csv<T: Serialize>(records: &[T], path: &Path) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)?;
    write_csv_to(records, file)
}

pub fn write_csv_to<T: Serialize, W: Write>(records: &[T], writer: W) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(records.len())
}

pub fn render_recent<T: Serialize>(label: &str, records: &[T]) -> anyhow::Result<String> {
    let mut output = format!("--- Last {} {} ---\n", records.len(), label);

    if records.is_empty() {
        output.push_str("No records yet.\n");
    } else {
        output.push_str(&serde_json::to_string_pretty(records)?);
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::{InterestRecord, SuggestionRecord};

    fn interest(preferred_date: Option<NaiveDate>) -> InterestRecord {
        InterestRecord {
            id: Uuid::nil(),
            name: "Lwazi".to_string(),
            email: "lwazi@example.com".to_string(),
            phone: "0831112222".to_string(),
            preferred_date,
            created_at: Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn csv_has_camel_case_header_and_blank_optionals() {
        let mut buffer = Vec::new();
        let written = write_csv_to(
            &[interest(None), interest(NaiveDate::from_ymd_opt(2026, 2, 1))],
            &mut buffer,
        )
        .unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,name,email,phone,preferredDate,createdAt");
        assert!(lines[1].contains(",0831112222,,"));
        assert!(lines[2].contains(",2026-02-01,"));
    }

    #[test]
    fn recent_listing_reports_empty_tables() {
        let output = render_recent::<SuggestionRecord>("Suggestions", &[]).unwrap();
        assert_eq!(output, "--- Last 0 Suggestions ---\nNo records yet.\n");
    }

    #[test]
    fn recent_listing_is_pretty_json() {
        let output = render_recent("Interest Entries", &[interest(None)]).unwrap();
        assert!(output.starts_with("--- Last 1 Interest Entries ---\n["));
        assert!(output.contains("\"preferredDate\": null"));
    }
}
