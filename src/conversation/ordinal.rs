//! Rewrites the "N/15" progress marker in questionnaire text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::ledger::SYMPTOM_COUNT;

static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\d+/{SYMPTOM_COUNT}\b")).unwrap());

/// Replace every "N/15" marker in `question` with the 1-based ordinal of the
/// zero-based `index`. Text without a marker is returned untouched.
pub fn number_question(question: &str, index: usize) -> Cow<'_, str> {
    let ordinal = format!("{}/{SYMPTOM_COUNT}", index + 1);
    ORDINAL.replace_all(question, ordinal.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_to_server_index_plus_one() {
        let out = number_question("Do you feel dizzy? (yes/no) 3/15", 5);
        assert!(out.contains("6/15"));
        assert!(!out.contains("3/15"));
    }

    #[test]
    fn first_question_is_one_of_fifteen() {
        assert_eq!(number_question("Headaches? 7/15", 0), "Headaches? 1/15");
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(number_question("2/15 ... 2/15", 9), "10/15 ... 10/15");
    }

    #[test]
    fn missing_marker_is_left_alone() {
        let out = number_question("Any trouble sleeping? (yes/no)", 4);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "Any trouble sleeping? (yes/no)");
    }

    #[test]
    fn other_denominators_are_not_touched() {
        assert_eq!(number_question("rate it 3/10", 1), "rate it 3/10");
        assert_eq!(number_question("code 3/150", 1), "code 3/150");
    }
}
