use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::errors::{LedgerError, LedgerResult};

/// Accumulated hours per activity name.
///
/// Serializes as a plain JSON object (`{"Reading": 3.5}`), which is the format
/// of both the per-user ledger file and the anonymous cookie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(BTreeMap<String, f64>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` with 0 hours.
    pub fn create(&mut self, name: &str) -> LedgerResult<()> {
        let name = require_name(name, "Activity name")?;
        if self.0.contains_key(name) {
            return Err(LedgerError::AlreadyExists(name.to_string()));
        }
        self.0.insert(name.to_string(), 0.0);
        Ok(())
    }

    /// Adds `hours` to `name`, creating the entry when it doesn't exist yet.
    /// Returns the new total for that activity.
    pub fn add_time(&mut self, name: &str, hours: f64) -> LedgerResult<f64> {
        let name = require_name(name, "Activity")?;
        if !hours.is_finite() || hours < 0.0 {
            return Err(LedgerError::InvalidHours(hours));
        }
        let entry = self.0.entry(name.to_string()).or_insert(0.0);
        *entry += hours;
        Ok(*entry)
    }

    pub fn remove(&mut self, name: &str) -> LedgerResult<f64> {
        let name = require_name(name, "Activity name")?;
        self.0
            .remove(name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))
    }

    /// Resets one activity. Unknown names are ignored.
    pub fn zero(&mut self, name: &str) -> LedgerResult<()> {
        let name = require_name(name, "Activity")?;
        if let Some(hours) = self.0.get_mut(name) {
            *hours = 0.0;
        }
        Ok(())
    }

    pub fn zero_all(&mut self) {
        self.0.values_mut().for_each(|hours| *hours = 0.0);
    }

    pub fn read(&self) -> &BTreeMap<String, f64> {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries with more than zero hours, in name order.
    pub fn positive_entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .filter(|(_, hours)| **hours > 0.0)
            .map(|(name, hours)| (name.as_str(), *hours))
    }
}

impl FromIterator<(String, f64)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn require_name<'a>(name: &'a str, field: &'static str) -> LedgerResult<&'a str> {
    if name.trim().is_empty() {
        Err(LedgerError::MissingField(field))
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ledger {
        [("Reading".to_string(), 2.0), ("Work".to_string(), 5.5)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_create_inserts_zero() {
        let mut ledger = Ledger::new();
        ledger.create("Reading").unwrap();
        assert_eq!(ledger.get("Reading"), Some(0.0));
    }

    #[test]
    fn test_create_existing_leaves_ledger_unchanged() {
        let mut ledger = sample();
        let before = ledger.clone();
        let err = ledger.create("Reading").unwrap_err();
        assert_eq!(err, LedgerError::AlreadyExists("Reading".into()));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.create("  "), Err(LedgerError::MissingField("Activity name")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_time_accumulates() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_time("Reading", 2.0).unwrap(), 2.0);
        assert_eq!(ledger.add_time("Reading", 1.5).unwrap(), 3.5);
        assert_eq!(ledger.get("Reading"), Some(3.5));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_time_rejects_negative_and_non_finite() {
        let mut ledger = sample();
        let before = ledger.clone();
        assert_eq!(ledger.add_time("Reading", -1.0), Err(LedgerError::InvalidHours(-1.0)));
        assert!(matches!(
            ledger.add_time("Reading", f64::INFINITY),
            Err(LedgerError::InvalidHours(_))
        ));
        assert!(ledger.add_time("Reading", f64::NAN).is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_missing_reports_not_found() {
        let mut ledger = sample();
        let before = ledger.clone();
        assert_eq!(ledger.remove("Gym"), Err(LedgerError::NotFound("Gym".into())));
        assert_eq!(ledger, before);

        assert_eq!(ledger.remove("Work").unwrap(), 5.5);
        assert_eq!(ledger.get("Work"), None);
    }

    #[test]
    fn test_zero_touches_only_one_entry() {
        let mut ledger = sample();
        ledger.zero("Reading").unwrap();
        assert_eq!(ledger.get("Reading"), Some(0.0));
        assert_eq!(ledger.get("Work"), Some(5.5));

        // unknown names are a no-op
        ledger.zero("Gym").unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_zero_all() {
        let mut ledger = sample();
        ledger.zero_all();
        assert!(ledger.read().values().all(|hours| *hours == 0.0));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.positive_entries().count(), 0);
    }

    #[test]
    fn test_positive_entries_skip_zero() {
        let mut ledger = sample();
        ledger.create("Gym").unwrap();
        let names: Vec<_> = ledger.positive_entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Reading", "Work"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let ledger = sample();
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"Reading":2.0,"Work":5.5}"#);

        // integer hours written by older files still load
        let parsed: Ledger = serde_json::from_str(r#"{"Reading": 2, "Work": 5.5}"#).unwrap();
        assert_eq!(parsed, ledger);
    }
}
