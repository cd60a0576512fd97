//! Summarizer - Batch aggregates
//!
//! Purely derived from a scored batch; safe to recompute. Empty input
//! gives zeros rather than dividing by zero.

use serde::{Deserialize, Serialize};

use super::model::RiskLabel;
use super::scoring::{round_to, ScoredRecord};

/// Per-class counts, for the class distribution chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub stable: usize,
    pub at_risk: usize,
}

impl ClassCounts {
    pub fn get(&self, label: RiskLabel) -> usize {
        match label {
            RiskLabel::Stable => self.stable,
            RiskLabel::AtRisk => self.at_risk,
        }
    }
}

/// Batch summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    /// Percentage at risk, one decimal, with trailing `%`
    pub pct_at_risk: String,
    pub mean_stress: f64,
    pub mean_ics: f64,
    pub mean_scg: f64,
    pub class_counts: ClassCounts,
}

impl Summary {
    /// Display pairs, in the order they are shown
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total", self.total.to_string()),
            ("% À risque", self.pct_at_risk.clone()),
            ("Stress moyen", format!("{:?}", self.mean_stress)),
            ("ICS moyen", format!("{:?}", self.mean_ics)),
            ("SCG moyen", format!("{:?}", self.mean_scg)),
        ]
    }
}

/// Reduce scored rows to aggregate statistics
pub fn summarize(rows: &[ScoredRecord]) -> Summary {
    let total = rows.len();

    let at_risk = rows.iter().filter(|r| r.classe.is_at_risk()).count();
    let class_counts = ClassCounts {
        stable: total - at_risk,
        at_risk,
    };

    let pct = if total > 0 {
        round_to(at_risk as f64 / total as f64 * 100.0, 1)
    } else {
        0.0
    };

    Summary {
        total,
        pct_at_risk: format!("{:.1}%", pct),
        mean_stress: mean(rows.iter().map(|r| r.record.stress), total),
        mean_ics: mean(rows.iter().map(|r| r.record.ics as f64), total),
        mean_scg: mean(rows.iter().map(|r| r.record.scg), total),
        class_counts,
    }
}

/// Arithmetic mean rounded to two decimals; 0.0 when empty
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to(values.sum::<f64>() / count as f64, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{Batch, Record};
    use crate::logic::scoring::Scorer;

    fn scored(records: Vec<Record>, threshold: f64) -> Vec<ScoredRecord> {
        Scorer::predict(&Batch::from_records(records), None, threshold)
            .unwrap()
            .into_rows()
    }

    fn record(stress: f64, ics: i64, scg: f64) -> Record {
        Record {
            stress,
            ics,
            scg,
            ..Record::default()
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pct_at_risk, "0.0%");
        assert_eq!(summary.mean_stress, 0.0);
        assert_eq!(summary.mean_ics, 0.0);
        assert_eq!(summary.mean_scg, 0.0);
        assert_eq!(summary.class_counts, ClassCounts::default());
    }

    #[test]
    fn test_summary_values() {
        // high, low, low risk under the fallback formula
        let rows = scored(
            vec![
                record(5.0, 4, 0.0),
                record(1.0, 0, 10.0),
                record(2.0, 1, 9.0),
            ],
            0.5,
        );
        let summary = summarize(&rows);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.pct_at_risk, "33.3%");
        assert_eq!(summary.mean_stress, 2.67);
        assert_eq!(summary.mean_ics, 1.67);
        assert_eq!(summary.mean_scg, 6.33);
        assert_eq!(summary.class_counts, ClassCounts { stable: 2, at_risk: 1 });
        assert_eq!(summary.class_counts.get(RiskLabel::AtRisk), 1);
    }

    #[test]
    fn test_all_at_risk() {
        let rows = scored(vec![record(5.0, 4, 0.0), record(4.5, 3, 1.0)], 0.5);
        assert_eq!(summarize(&rows).pct_at_risk, "100.0%");
    }

    #[test]
    fn test_pairs() {
        let pairs = summarize(&[]).to_pairs();
        assert_eq!(pairs[0], ("Total", "0".to_string()));
        assert_eq!(pairs[1], ("% À risque", "0.0%".to_string()));
        assert_eq!(pairs[2], ("Stress moyen", "0.0".to_string()));
        assert_eq!(pairs.len(), 5);
    }
}
