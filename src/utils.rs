// Utility functions
use chrono::NaiveDate;

/// File name for a saved report, e.g. `Health-Report-Jane-Doe-2026-10-18.md`.
pub fn report_filename(client_name: &str, date: NaiveDate) -> String {
    let client = client_name.split_whitespace().collect::<Vec<_>>().join("-");
    let client = if client.is_empty() { "Client".to_string() } else { client };
    format!("Health-Report-{}-{}.md", client, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_become_single_dashes() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            report_filename("  Jane   Mary Doe ", date),
            "Health-Report-Jane-Mary-Doe-2026-10-18.md"
        );
        assert_eq!(report_filename("", date), "Health-Report-Client-2026-10-18.md");
    }
}
