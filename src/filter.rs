//! Client-side search and status filtering over already-fetched records.
//! No backend round-trip; cheap enough to recompute on every keystroke.

use crate::models::{ApplicationStatus, EmailRecord};

/// Status facet of the card list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

/// Current search term and status selection
#[derive(Debug, Clone, Default)]
pub struct EmailFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl EmailFilter {
    /// Case-insensitive substring match against company or subject, AND'ed
    /// with the status selection
    pub fn matches(&self, record: &EmailRecord) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = term.is_empty()
            || record.company.to_lowercase().contains(&term)
            || record.subject.to_lowercase().contains(&term);

        let matches_status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status == status,
        };

        matches_search && matches_status
    }

    /// The filtered view the card list and the CSV export both operate on
    pub fn apply<'a>(&self, records: &'a [EmailRecord]) -> Vec<&'a EmailRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(company: &str, subject: &str, status: ApplicationStatus) -> EmailRecord {
        EmailRecord {
            id: format!("{}-{}", company, subject),
            company: company.to_string(),
            subject: subject.to_string(),
            sender: format!("jobs@{}.example", company.to_lowercase()),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status,
            snippet: String::new(),
            read: false,
        }
    }

    fn sample() -> Vec<EmailRecord> {
        vec![
            record("Acme", "Interview", ApplicationStatus::Pending),
            record("Globex", "Rejected", ApplicationStatus::Rejection),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_on_company() {
        let records = sample();
        let filter = EmailFilter {
            search: "acme".to_string(),
            ..EmailFilter::default()
        };
        let matched = filter.apply(&records);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].company, "Acme");
    }

    #[test]
    fn test_search_matches_subject_too() {
        let records = sample();
        let filter = EmailFilter {
            search: "REJECT".to_string(),
            ..EmailFilter::default()
        };
        let matched = filter.apply(&records);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].company, "Globex");
    }

    #[test]
    fn test_status_filter_ands_with_search() {
        let records = sample();
        let filter = EmailFilter {
            search: "acme".to_string(),
            status: StatusFilter::Only(ApplicationStatus::Rejection),
        };
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_zero_result_sets_are_fine() {
        let records = vec![record("Acme", "Interview", ApplicationStatus::Pending)];
        let filter = EmailFilter {
            search: String::new(),
            status: StatusFilter::Only(ApplicationStatus::Rejection),
        };
        assert!(filter.apply(&records).is_empty());
        assert!(filter.apply(&[]).is_empty());
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let records = sample();
        let filter = EmailFilter::default();
        assert_eq!(filter.apply(&records).len(), 2);
    }
}
