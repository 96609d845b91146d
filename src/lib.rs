//! Weekly shift rostering with a minimax-fairness objective.
//!
//! Assigns people to a fixed weekly grid of shifts so that every shift
//! gets exactly its required headcount, nobody works a shift outside
//! their declared free time, nobody exceeds a weekly hour cap, and the
//! gap between the busiest and least-busy person is as small as possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Shift`, `ShiftCatalog`, `Person`,
//!   `WeeklyCalendar`, `AvailabilityMatrix`, `Roster`
//! - **`ingest`**: Parsing of raw availability (records or tables with
//!   serialized interval lists) with per-cell degradation
//! - **`cp`**: Solver boundary (`CpModel`, `CpSolver`) and the bundled
//!   `LpSolver` (branch and bound over `microlp` relaxations)
//! - **`formulation`**: Catalog + availability + config → `CpModel`
//! - **`scheduler`**: `solve_week` entry point, `RosterReport`, KPIs
//! - **`validation`**: Catalog integrity checks and feasibility diagnostics
//! - **`config`**: `RosterConfig` with TOML loading
//!
//! # Example
//!
//! ```
//! use u_roster::config::RosterConfig;
//! use u_roster::ingest::{ingest_records, AvailabilityRecord};
//! use u_roster::models::{Shift, ShiftCatalog, TimeOfDay, Weekday};
//! use u_roster::scheduler::{solve_week, ScheduleOutcome};
//!
//! let hm = |h, m| TimeOfDay::new(h, m).unwrap();
//! let catalog = ShiftCatalog::new(vec![
//!     Shift::new("S1", Weekday::Mon, hm(7, 15), hm(9, 0), 1),
//!     Shift::new("S2", Weekday::Mon, hm(9, 0), hm(12, 0), 1),
//! ]);
//! let records = vec![
//!     AvailabilityRecord::new("alice").with_day(Weekday::Mon, ["07:00:00 - 12:00:00"]),
//!     AvailabilityRecord::new("bob").with_day(Weekday::Mon, ["09:00:00 - 12:00:00"]),
//! ];
//! let availability = ingest_records(&records).into_matrix(&catalog);
//!
//! match solve_week(&catalog, &availability, &RosterConfig::default()).unwrap() {
//!     ScheduleOutcome::Solved(report) => {
//!         assert_eq!(report.roster.people_on("S1"), vec!["Alice"]);
//!         assert_eq!(report.roster.people_on("S2"), vec!["Bob"]);
//!     }
//!     ScheduleOutcome::NoSchedule { status, .. } => panic!("no roster: {status}"),
//! }
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"
//! - Rossi, van Beek, Walsh (2006), "Handbook of Constraint Programming"

pub mod config;
pub mod cp;
pub mod error;
pub mod formulation;
pub mod ingest;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::ScheduleError;
