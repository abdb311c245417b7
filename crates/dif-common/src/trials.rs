//! Clinical trial status partition.

/// Statuses under which a trial still runs or the drug is still being made available.
pub const ONGOING: [&str; 5] = [
    "Recruiting",
    "Enrolling by invitation",
    "Active, not recruiting",
    "Approved for marketing",
    "Available",
];

pub const FINISHED: [&str; 9] = [
    "Completed",
    "Unknown status",
    "Terminated",
    "Withdrawn",
    "Suspended",
    "No longer available",
    "Withheld",
    "Not yet recruiting",
    "Temporarily not available",
];

/// Whether a trial status counts as ongoing. Anything not listed as ongoing is finished.
pub fn is_ongoing(status: &str) -> bool {
    let status = normalise(status);
    ONGOING.iter().any(|s| normalise(s) == status)
}

fn normalise(status: &str) -> String {
    status
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ongoing_statuses() {
        assert!(is_ongoing("Recruiting"));
        assert!(is_ongoing("Active, not recruiting"));
        assert!(is_ongoing("active not recruiting"));
        assert!(!is_ongoing("Completed"));
        assert!(!is_ongoing("Not yet recruiting"));
        assert!(!is_ongoing(""));
    }

    #[test]
    fn test_partition_is_disjoint() {
        for s in FINISHED {
            assert!(!is_ongoing(s), "{s} should be finished");
        }
    }
}
