/// Subjects containing any of these read as recurring mailing-list
/// traffic. Matching is case-sensitive, hence both casings.
const NEWSLETTER_KEYWORDS: [&str; 12] = [
    "Weekly",
    "weekly",
    "Monthly",
    "monthly",
    "Update",
    "update",
    "Newsletter",
    "newsletter",
    "Digest",
    "digest",
    "Highlights",
    "highlights",
];

pub fn is_newsletter(subject: &str) -> bool {
    NEWSLETTER_KEYWORDS
        .iter()
        .any(|keyword| subject.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_classify_a_subject_containing_a_keyword() {
        assert!(is_newsletter("Weekly nature roundup"));
        assert!(is_newsletter("Your August update"));
        assert!(is_newsletter("Sanctuary Highlights #42"));
    }

    #[test_log::test]
    fn should_reject_a_subject_without_keywords() {
        assert!(!is_newsletter("Re: carpool on Saturday"));
    }

    #[test_log::test]
    fn should_match_case_sensitively() {
        assert!(!is_newsletter("WEEKLY ROUNDUP"));
        assert!(is_newsletter("weekly roundup"));
    }
}
