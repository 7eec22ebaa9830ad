//! Answer ledger — symptom id → yes/no, mirrored from the remote service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Symptom identifiers the remote questionnaire covers, in question order.
pub const SYMPTOM_CATALOG: [&str; 15] = [
    "Dizziness",
    "Low_Energy",
    "Drowsiness",
    "Vision_Problems",
    "Headache",
    "Palpitations",
    "Chest_Pain",
    "Urinary_Discomfort",
    "Urinary_Frequency",
    "Insomnia",
    "Depressed_Mood",
    "Crying_Spells",
    "Elevated_Mood",
    "Wandering",
    "Falls",
];

/// Number of questions in the questionnaire.
pub const SYMPTOM_COUNT: usize = SYMPTOM_CATALOG.len();

/// Whether `id` is part of the symptom catalog.
pub fn is_known_symptom(id: &str) -> bool {
    SYMPTOM_CATALOG.contains(&id)
}

/// Mapping from symptom id to the user's answer.
///
/// The client never writes entries itself; it only replaces the whole
/// ledger with the copy the service sends back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLedger(BTreeMap<String, bool>);

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symptom: &str) -> Option<bool> {
        self.0.get(symptom).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifiers answered `true`, in sorted order.
    pub fn positives(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|&(_, &answer)| answer)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Keys the service sent that are not in the catalog.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| !is_known_symptom(k))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, bool)> for AnswerLedger {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, bool>> for AnswerLedger {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(&str, bool)]) -> AnswerLedger {
        entries.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn positives_keep_only_true_answers() {
        let answers = ledger(&[("a", true), ("b", false), ("c", true)]);
        assert_eq!(answers.positives(), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn positives_of_empty_ledger_is_empty() {
        assert!(AnswerLedger::new().positives().is_empty());
    }

    #[test]
    fn catalog_has_fifteen_unique_entries() {
        let mut ids = SYMPTOM_CATALOG.to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 15);
        assert_eq!(SYMPTOM_COUNT, 15);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let answers = ledger(&[("Falls", true), ("Sneezing", false)]);
        assert_eq!(answers.unknown_keys(), vec!["Sneezing"]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let answers = ledger(&[("Headache", true), ("Falls", false)]);
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({"Falls": false, "Headache": true}));

        let parsed: AnswerLedger = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, answers);
    }
}
