use crate::models::Ledger;

pub const NO_ACTIVITIES_TEXT: [&str; 2] = [
    "No activities yet",
    "Create an activity to get started!",
];

pub const ALL_ZERO_TEXT: [&str; 2] = [
    "All activities have 0 hours",
    "Use the timer to add time!",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub name: String,
    pub hours: f64,
    /// Share of the positive total, 0..=100.
    pub percentage: f64,
}

impl Slice {
    pub fn label(&self) -> String {
        format!("{} ({:.1}%)", self.name, self.percentage)
    }
}

/// What the chart should show for a given ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPlan {
    NoActivities,
    AllZero,
    Pie(Vec<Slice>),
}

impl ChartPlan {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        if ledger.is_empty() {
            return ChartPlan::NoActivities;
        }

        let total: f64 = ledger.positive_entries().map(|(_, hours)| hours).sum();
        if total <= 0.0 {
            return ChartPlan::AllZero;
        }

        let slices = ledger
            .positive_entries()
            .map(|(name, hours)| Slice {
                name: name.to_string(),
                hours,
                percentage: hours / total * 100.0,
            })
            .collect();
        ChartPlan::Pie(slices)
    }

    /// The two lines shown instead of a pie, if any.
    pub fn placeholder_text(&self) -> Option<[&'static str; 2]> {
        match self {
            ChartPlan::NoActivities => Some(NO_ACTIVITIES_TEXT),
            ChartPlan::AllZero => Some(ALL_ZERO_TEXT),
            ChartPlan::Pie(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger_is_no_activities() {
        let plan = ChartPlan::from_ledger(&Ledger::new());
        assert_eq!(plan, ChartPlan::NoActivities);
        assert_eq!(plan.placeholder_text(), Some(NO_ACTIVITIES_TEXT));
    }

    #[test]
    fn test_all_zero_ledger() {
        let mut ledger = Ledger::new();
        ledger.create("Reading").unwrap();
        ledger.create("Work").unwrap();
        let plan = ChartPlan::from_ledger(&ledger);
        assert_eq!(plan, ChartPlan::AllZero);
        assert_eq!(plan.placeholder_text(), Some(ALL_ZERO_TEXT));
    }

    #[test]
    fn test_mixed_ledger_keeps_positive_entries() {
        let mut ledger = Ledger::new();
        ledger.add_time("Reading", 1.0).unwrap();
        ledger.add_time("Work", 3.0).unwrap();
        ledger.create("Gym").unwrap();

        let ChartPlan::Pie(slices) = ChartPlan::from_ledger(&ledger) else {
            panic!("expected a pie");
        };
        let names: Vec<_> = slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Reading", "Work"]);
        assert_eq!(slices[0].percentage, 25.0);
        assert_eq!(slices[1].percentage, 75.0);
        assert_eq!(slices[0].label(), "Reading (25.0%)");
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let mut ledger = Ledger::new();
        for (name, hours) in [("a", 1.0), ("b", 2.0), ("c", 3.3), ("d", 0.7), ("e", 0.0)] {
            ledger.add_time(name, hours).unwrap();
        }

        let ChartPlan::Pie(slices) = ChartPlan::from_ledger(&ledger) else {
            panic!("expected a pie");
        };
        assert_eq!(slices.len(), 4);
        let sum: f64 = slices.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_activity_is_whole_pie() {
        let mut ledger = Ledger::new();
        ledger.add_time("Reading", 0.25).unwrap();
        let ChartPlan::Pie(slices) = ChartPlan::from_ledger(&ledger) else {
            panic!("expected a pie");
        };
        assert_eq!(slices[0].label(), "Reading (100.0%)");
    }
}
