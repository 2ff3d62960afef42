use leadmerge_engine::{page, total_pages, ContactSet, SessionReport};
use shared_types::export::present;
use shared_types::ExportRow;

/// Render one 1-based page of contacts for the terminal
pub fn render_page(set: &ContactSet, page_number: usize, page_size: usize) -> String {
    let pages = total_pages(set.len(), page_size);
    if pages == 0 {
        return "No contacts found.\n".to_string();
    }

    let page_number = page_number.clamp(1, pages);
    let mut out = format!("Page {}/{} ({} contacts)\n\n", page_number, pages, set.len());
    for row in page(set, page_number - 1, page_size) {
        out.push_str(&render_row(&row));
        out.push('\n');
    }
    out
}

fn render_row(row: &ExportRow) -> String {
    let mut out = format!("{} - {}\n", row.name, row.title);
    out.push_str(&format!("  Email:    {}\n", row.email));
    out.push_str(&format!("  Company:  {}\n", row.company));
    out.push_str(&format!("  Location: {}\n", row.location));
    if let Some(linkedin) = present(&row.linkedin) {
        out.push_str(&format!("  LinkedIn: {}\n", linkedin));
    }
    out
}

pub fn render_report(report: &SessionReport, set: &ContactSet) -> String {
    let stats = set.stats();
    let mut out = format!(
        "Searched {}/{} companies: {} contacts, {} duplicates dropped",
        report.succeeded(),
        report.queries.len(),
        set.len(),
        stats.duplicates
    );
    if stats.name_based_duplicates > 0 {
        out.push_str(&format!(
            " ({} matched on name + company only)",
            stats.name_based_duplicates
        ));
    }
    if stats.unidentifiable > 0 {
        out.push_str(&format!(", {} unidentifiable", stats.unidentifiable));
    }
    if report.filtered_out > 0 {
        out.push_str(&format!(", {} outside target roles", report.filtered_out));
    }
    out.push('\n');

    for error in report.failures() {
        out.push_str(&format!("  ! {}\n", error));
    }
    if report.rate_limited {
        out.push_str("Rate limit reached. Wait a few minutes before searching again.\n");
    }
    if report.cancelled {
        out.push_str("Search cancelled; showing partial results.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CanonicalContact;

    fn set_of(count: usize) -> ContactSet {
        let mut set = ContactSet::new();
        for i in 0..count {
            set.accept(CanonicalContact {
                full_name: Some(format!("Person {}", i)),
                company: Some("Acme".to_string()),
                ..CanonicalContact::new("Acme")
            });
        }
        set
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_page(&ContactSet::new(), 1, 10), "No contacts found.\n");
    }

    #[test]
    fn test_render_page_clamps() {
        let set = set_of(12);
        let out = render_page(&set, 9, 10);
        assert!(out.starts_with("Page 2/2 (12 contacts)"));
        assert!(out.contains("Person 11 - N/A"));
        assert!(!out.contains("Person 9 "));
        assert!(!out.contains("LinkedIn:"));
    }

    #[test]
    fn test_render_report() {
        let mut set = set_of(1);
        set.accept(CanonicalContact {
            full_name: Some("person 0".to_string()),
            company: Some("ACME".to_string()),
            ..CanonicalContact::new("Acme")
        });
        let report = SessionReport {
            rate_limited: true,
            ..SessionReport::default()
        };

        let out = render_report(&report, &set);
        assert!(out.contains("1 contacts, 1 duplicates dropped"));
        assert!(out.contains("1 matched on name + company only"));
        assert!(out.contains("Rate limit reached"));
    }
}
