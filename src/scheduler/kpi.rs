//! Roster quality metrics (KPIs).
//!
//! Computes summary indicators from a solved week.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Hours | Sum of assigned hours |
//! | Mean Hours | Total hours / number of people |
//! | Max / Min Hours | Busiest and least-busy person |
//! | Fairness Gap | Max hours - min hours |
//! | Avg Cap Utilization | Mean of hours / weekly cap |
//! | Idle People | People with no shifts |
//!
//! # Reference
//! Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

use crate::config::RosterConfig;

use super::RosterReport;

/// Roster performance indicators. Time values are in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterKpi {
    /// Sum of assigned hours.
    pub total_hours: f64,
    /// Mean hours per person.
    pub mean_hours: f64,
    /// Hours of the busiest person.
    pub max_hours: f64,
    /// Hours of the least-busy person.
    pub min_hours: f64,
    /// `max_hours - min_hours`.
    pub fairness_gap_hours: f64,
    /// Mean fraction of the weekly cap used (0.0..=1.0).
    pub avg_cap_utilization: f64,
    /// People assigned to no shift.
    pub idle_people: usize,
}

impl RosterKpi {
    /// Computes KPIs from a report.
    pub fn calculate(report: &RosterReport, config: &RosterConfig) -> Self {
        let n = report.loads.len();
        let total_hours = report.total_hours();
        let mean_hours = if n == 0 { 0.0 } else { total_hours / n as f64 };

        let cap = f64::from(config.weekly_hour_cap);
        let avg_cap_utilization = if n == 0 || cap <= 0.0 {
            0.0
        } else {
            report.loads.iter().map(|l| l.hours / cap).sum::<f64>() / n as f64
        };

        let max_hours = report.loads.iter().map(|l| l.hours).fold(0.0, f64::max);
        let min_hours = if n == 0 {
            0.0
        } else {
            report.loads.iter().map(|l| l.hours).fold(f64::INFINITY, f64::min)
        };

        Self {
            total_hours,
            mean_hours,
            max_hours,
            min_hours,
            fairness_gap_hours: report.fairness_gap_hours(),
            avg_cap_utilization,
            idle_people: report.loads.iter().filter(|l| l.shifts == 0).count(),
        }
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_gap_hours: f64, min_utilization: f64) -> bool {
        self.fairness_gap_hours <= max_gap_hours && self.avg_cap_utilization >= min_utilization
    }
}
