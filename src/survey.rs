//! Batch stabilization of many random grids

use crate::error::Result;
use crate::life::{run_to_stable, Budget, Grid, Stabilization};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Result of running one seeded grid to stability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub seed: u64,
    pub stabilized: bool,
    pub generations: usize,
    /// Living cells in the final grid
    pub living: usize,
}

/// Aggregate over a batch of seeded runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub rows: usize,
    pub cols: usize,
    pub runs: usize,
    pub stabilized: usize,
    pub not_stabilized: usize,
    /// Runs that stabilized with no living cells
    pub extinct: usize,
    /// Mean generations to stability over stabilized runs
    pub mean_generations: f64,
    pub max_generations: usize,
    pub entries: Vec<SurveyEntry>,
}

/// Run `runs` random `rows x cols` grids, seeded `base_seed..base_seed + runs`,
/// each to stability under `budget`.
///
/// Runs are independent and execute in parallel.
pub fn survey(
    rows: usize,
    cols: usize,
    runs: usize,
    base_seed: u64,
    budget: &Budget,
) -> Result<SurveyReport> {
    // Surface dimension errors once, before fanning out
    Grid::new(rows, cols)?;

    let mut entries: Vec<SurveyEntry> = (0..runs as u64)
        .into_par_iter()
        .map(|offset| -> Result<SurveyEntry> {
            let seed = base_seed.wrapping_add(offset);
            let grid = Grid::random(rows, cols, Some(seed))?;
            Ok(SurveyEntry::new(seed, &run_to_stable(grid, budget)))
        })
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.seed);

    let report = SurveyReport::from_entries(rows, cols, entries);
    info!(
        runs = report.runs,
        stabilized = report.stabilized,
        not_stabilized = report.not_stabilized,
        "survey finished"
    );
    Ok(report)
}

impl SurveyReport {
    fn from_entries(rows: usize, cols: usize, entries: Vec<SurveyEntry>) -> Self {
        let stable: Vec<&SurveyEntry> = entries.iter().filter(|e| e.stabilized).collect();
        let stabilized = stable.len();
        let extinct = stable.iter().filter(|e| e.living == 0).count();
        let total_generations: usize = stable.iter().map(|e| e.generations).sum();
        let mean_generations = if stabilized > 0 {
            total_generations as f64 / stabilized as f64
        } else {
            0.0
        };
        let max_generations = stable.iter().map(|e| e.generations).max().unwrap_or(0);

        Self {
            rows,
            cols,
            runs: entries.len(),
            stabilized,
            not_stabilized: entries.len() - stabilized,
            extinct,
            mean_generations,
            max_generations,
            entries,
        }
    }

    /// Fraction of runs that reached a fixed point
    pub fn stabilized_ratio(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.stabilized as f64 / self.runs as f64
        }
    }
}

impl SurveyEntry {
    pub fn new(seed: u64, outcome: &Stabilization) -> Self {
        Self {
            seed,
            stabilized: outcome.is_stable(),
            generations: outcome.generations(),
            living: outcome.grid().living_count(),
        }
    }
}

impl fmt::Display for SurveyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Survey of {} runs on {}x{} torus:", self.runs, self.rows, self.cols)?;
        writeln!(
            f,
            "  Stabilized: {} ({:.1}%)",
            self.stabilized,
            self.stabilized_ratio() * 100.0
        )?;
        writeln!(f, "  Not stabilized: {}", self.not_stabilized)?;
        writeln!(f, "  Extinct: {}", self.extinct)?;
        writeln!(f, "  Mean generations to stability: {:.1}", self.mean_generations)?;
        writeln!(f, "  Longest run to stability: {}", self.max_generations)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_is_reproducible() {
        let budget = Budget::generations(200);
        let a = survey(6, 6, 12, 40, &budget).unwrap();
        let b = survey(6, 6, 12, 40, &budget).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_survey_counts() {
        let report = survey(5, 5, 10, 0, &Budget::generations(100)).unwrap();
        assert_eq!(report.runs, 10);
        assert_eq!(report.stabilized + report.not_stabilized, 10);
        assert!(report.extinct <= report.stabilized);
        let seeds: Vec<u64> = report.entries.iter().map(|e| e.seed).collect();
        assert_eq!(seeds, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_survey_matches_single_runs() {
        let budget = Budget::generations(100);
        let report = survey(4, 7, 5, 9, &budget).unwrap();
        for entry in &report.entries {
            let grid = Grid::random(4, 7, Some(entry.seed)).unwrap();
            let outcome = run_to_stable(grid, &budget);
            assert_eq!(&SurveyEntry::new(entry.seed, &outcome), entry);
        }
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = survey(5, 5, 6, 3, &Budget::generations(100)).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"entries\""));

        let parsed: SurveyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_survey_rejects_empty_dimensions() {
        assert!(survey(0, 5, 3, 0, &Budget::default()).is_err());
    }

    #[test]
    fn test_zero_budget_never_stabilizes() {
        let report = survey(3, 3, 4, 0, &Budget::generations(0)).unwrap();
        assert_eq!(report.not_stabilized, 4);
        assert_eq!(report.mean_generations, 0.0);
        assert!(report.to_string().contains("Not stabilized: 4"));
    }
}
