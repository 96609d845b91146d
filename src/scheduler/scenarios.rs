//! End-to-end scheduling scenarios: ingestion through report.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::ingest::{
    ingest_records, ingest_table, AvailabilityRecord, AvailabilityTable, IngestOptions,
};
use crate::models::{Shift, TimeOfDay, Weekday, TICKS_PER_HOUR};

fn t(h: u16, m: u16) -> TimeOfDay {
    TimeOfDay::new(h, m).unwrap()
}

fn all_available(names: &[&str], shift_count: usize) -> AvailabilityMatrix {
    let mut matrix = AvailabilityMatrix::new(shift_count);
    for name in names {
        matrix = matrix.with_person(name, vec![true; shift_count]).unwrap();
    }
    matrix
}

/// Checks every hard constraint and the gap bookkeeping on a report.
fn assert_invariants(
    report: &RosterReport,
    catalog: &ShiftCatalog,
    availability: &AvailabilityMatrix,
    config: &RosterConfig,
) {
    for (s, shift) in catalog.shifts().iter().enumerate() {
        let assigned = report.roster.people_on(&shift.id);
        assert_eq!(assigned.len(), shift.required as usize, "headcount of {}", shift.id);
        for name in assigned {
            let p = availability.index_of(name).unwrap();
            assert!(availability.is_available(p, s), "{name} unavailable for {}", shift.id);
        }
    }

    assert_eq!(report.loads.len(), availability.person_count());
    for load in &report.loads {
        assert!(load.ticks <= config.weekly_cap_ticks(), "{} over cap", load.person);
        assert_eq!(load.ticks, report.roster.ticks_for(&load.person));
        for day in Weekday::ALL {
            let on_day: Vec<&Shift> = catalog
                .shifts()
                .iter()
                .filter(|s| s.day == day && report.roster.is_assigned(&s.id, &load.person))
                .collect();
            if let Some(max) = config.daily_shift_cap() {
                assert!(on_day.len() as u32 <= max);
            }
            if let Some(max) = config.daily_hour_cap() {
                let ticks: i64 = on_day.iter().map(|s| s.duration_ticks()).sum();
                assert!(ticks <= i64::from(max) * TICKS_PER_HOUR);
            }
        }
    }

    let max = report.loads.iter().map(|l| l.ticks).max().unwrap_or(0);
    let min = report.loads.iter().map(|l| l.ticks).min().unwrap_or(0);
    assert_eq!(report.fairness_gap_ticks, max - min);
}

#[test]
fn test_scenario_one_shift_two_of_three() {
    let catalog = ShiftCatalog::new(vec![Shift::new("S1", Weekday::Wed, t(9, 0), t(12, 0), 2)]);
    let availability = all_available(&["ann", "ben", "cat"], 1);
    let config = RosterConfig::default();
    let outcome = solve_week(&catalog, &availability, &config).unwrap();

    let report = outcome.report().unwrap();
    assert!(report.is_optimal());
    assert_eq!(report.roster.people_on("S1").len(), 2);
    assert_eq!(report.loads.len(), 3);
    // Two people work 3 h, one works none.
    assert_eq!(report.fairness_gap_ticks, 12);
    assert!((report.fairness_gap_hours() - 3.0).abs() < 1e-12);
    assert_invariants(report, &catalog, &availability, &config);
}

#[test]
fn test_scenario_unavailable_person_reported_with_zero_hours() {
    let catalog = ShiftCatalog::new(vec![
        Shift::new("S1", Weekday::Mon, t(9, 0), t(12, 0), 1),
        Shift::new("S2", Weekday::Tue, t(9, 0), t(12, 0), 1),
    ]);
    let availability = AvailabilityMatrix::new(2)
        .with_person("ann", vec![true, true])
        .unwrap()
        .with_person("ben", vec![true, true])
        .unwrap()
        .with_person("dan", vec![false, false])
        .unwrap();
    let config = RosterConfig::default();
    let outcome = solve_week(&catalog, &availability, &config).unwrap();

    let report = outcome.report().unwrap();
    let dan = report.load_for("Dan").unwrap();
    assert_eq!(dan.ticks, 0);
    assert_eq!(dan.shifts, 0);
    assert!(report.roster.shifts_for("Dan").is_empty());
    assert_eq!(report.min_load_ticks, 0);
    assert_invariants(report, &catalog, &availability, &config);
}

#[test]
fn test_scenario_demand_over_capacity_is_infeasible() {
    let catalog = ShiftCatalog::new(vec![
        Shift::new("S1", Weekday::Mon, t(9, 0), t(12, 0), 2),
        Shift::new("S2", Weekday::Tue, t(9, 0), t(12, 0), 2),
    ]);
    let availability = all_available(&["ann", "ben"], 2);
    let config = RosterConfig::default().with_weekly_hour_cap(4);
    let outcome = solve_week(&catalog, &availability, &config).unwrap();

    match outcome {
        ScheduleOutcome::NoSchedule {
            status,
            diagnostics,
        } => {
            assert_eq!(status, SolveStatus::Infeasible);
            assert!(diagnostics
                .iter()
                .any(|d| d.kind == crate::validation::ValidationErrorKind::CapacityShortfall));
        }
        other => panic!("expected no schedule, got {other:?}"),
    }
}

#[test]
fn test_scenario_identical_people_even_demand_zero_gap() {
    let catalog = ShiftCatalog::new(vec![
        Shift::new("S1", Weekday::Mon, t(7, 15), t(9, 0), 1),
        Shift::new("S2", Weekday::Mon, t(9, 0), t(12, 0), 1),
        Shift::new("S3", Weekday::Thu, t(12, 0), t(15, 0), 1),
        Shift::new("S4", Weekday::Fri, t(15, 0), t(17, 0), 2),
        Shift::new("S5", Weekday::Sat, t(7, 15), t(9, 0), 1),
    ]);
    // 54 ticks in total; 27 each is reachable.
    let availability = all_available(&["ann", "ben"], 5);
    let config = RosterConfig::default();
    let outcome = solve_week(&catalog, &availability, &config).unwrap();

    let report = outcome.report().unwrap();
    assert!(report.is_optimal());
    assert_eq!(report.fairness_gap_ticks, 0);
    assert_invariants(report, &catalog, &availability, &config);
}

#[test]
fn test_containment_through_ingestion() {
    let catalog = ShiftCatalog::standard_week();
    let s1 = catalog.index_of("S1").unwrap(); // Mon 07:15-09:00
    let records = vec![
        AvailabilityRecord::new("wide").with_day(Weekday::Mon, ["07:00:00 - 12:00:00"]),
        AvailabilityRecord::new("late").with_day(Weekday::Mon, ["07:30:00 - 09:00:00"]),
        AvailabilityRecord::new("split")
            .with_day(Weekday::Mon, ["07:00:00 - 08:00:00", "08:00:00 - 09:00:00"]),
    ];
    let matrix = ingest_records(&records).into_matrix(&catalog);

    assert!(matrix.is_available(matrix.index_of("wide").unwrap(), s1));
    assert!(!matrix.is_available(matrix.index_of("late").unwrap(), s1));
    assert!(!matrix.is_available(matrix.index_of("split").unwrap(), s1));
}

#[test]
fn test_table_with_bad_cell_still_schedules() {
    let catalog = ShiftCatalog::new(vec![
        Shift::new("S1", Weekday::Mon, t(9, 0), t(12, 0), 1),
        Shift::new("S2", Weekday::Tue, t(9, 0), t(12, 0), 1),
    ]);
    let table = AvailabilityTable::new(["STUDENT NAME", "MONDAY", "TUESDAY"])
        .with_row(vec![
            Some("ann"),
            Some("['08:00:00 - 13:00:00']"),
            Some("['09:00:00 - twelve']"),
        ])
        .with_row(vec![
            Some("ben"),
            Some("['09:00:00 - 12:00:00']"),
            Some("['09:00:00 - 12:00:00']"),
        ]);
    let ingested = ingest_table(&table, &IngestOptions::default()).unwrap();
    assert_eq!(ingested.warnings.len(), 1);

    let availability = ingested.into_matrix(&catalog);
    let outcome = solve_week(&catalog, &availability, &RosterConfig::default()).unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.roster.people_on("S2"), vec!["Ben"]);
    assert_eq!(report.roster.people_on("S1"), vec!["Ann"]);
}

#[test]
fn test_standard_week_within_node_budget() {
    let catalog = ShiftCatalog::standard_week();
    let names: Vec<String> = (1..=15).map(|i| format!("worker {i}")).collect();
    let records: Vec<AvailabilityRecord> = names
        .iter()
        .map(|n| {
            Weekday::ALL.into_iter().fold(AvailabilityRecord::new(n.as_str()), |r, d| {
                r.with_day(d, ["07:00:00 - 19:00:00"])
            })
        })
        .collect();
    let availability = ingest_records(&records).into_matrix(&catalog);
    let config = RosterConfig::default();

    // 905 demand ticks over 15 people cannot split evenly and the relaxation
    // bound stays at 0, so a bounded search ends without an optimality proof.
    let scheduler = WeeklyScheduler::new(LpSolver::new().with_node_limit(2_000));
    let outcome = scheduler.solve_week(&catalog, &availability, &config).unwrap();
    assert_eq!(outcome.status(), SolveStatus::Feasible);

    let report = outcome.report().unwrap();
    assert!(report.may_not_be_optimal());
    assert!(report.to_string().ends_with("(may not be optimal)"));
    assert_eq!(report.loads.len(), 15);
    assert_invariants(report, &catalog, &availability, &config);

    assert!(report.fairness_gap_ticks >= 1);
    assert!(
        report.fairness_gap_hours() <= 2.0,
        "gap {} h",
        report.fairness_gap_hours()
    );
    let kpi = RosterKpi::calculate(report, &config);
    assert!((kpi.total_hours - 226.25).abs() < 1e-9);
}

#[test]
fn test_empty_week_is_solved() {
    let catalog = ShiftCatalog::new(vec![]);
    let availability = AvailabilityMatrix::new(0);
    let outcome = solve_week(&catalog, &availability, &RosterConfig::default()).unwrap();

    assert_eq!(outcome.status(), SolveStatus::Optimal);
    let report = outcome.report().unwrap();
    assert_eq!(report.roster.assignment_count(), 0);
    assert_eq!(report.fairness_gap_ticks, 0);
}

#[test]
fn test_daily_caps_respected() {
    let catalog = ShiftCatalog::new(vec![
        Shift::new("S1", Weekday::Mon, t(7, 15), t(9, 0), 1),
        Shift::new("S2", Weekday::Mon, t(9, 0), t(12, 0), 1),
        Shift::new("S3", Weekday::Mon, t(12, 0), t(15, 0), 1),
    ]);
    let availability = all_available(&["ann", "ben"], 3);
    let config = RosterConfig::default()
        .with_max_shifts_per_day(1)
        .with_max_daily_hours(8);
    let outcome = solve_week(&catalog, &availability, &config).unwrap();
    assert_eq!(outcome.status(), SolveStatus::Infeasible);

    let config = RosterConfig::default().with_max_shifts_per_day(2);
    let outcome = solve_week(&catalog, &availability, &config).unwrap();
    assert_invariants(outcome.report().unwrap(), &catalog, &availability, &config);
}

const SHAPES: [(u16, u16, u16); 4] = [(7, 15, 9), (9, 0, 12), (12, 0, 15), (15, 0, 17)];

fn random_instance(rng: &mut SmallRng) -> (ShiftCatalog, AvailabilityMatrix, RosterConfig) {
    let shift_count = rng.random_range(1..=3);
    let people = rng.random_range(1..=4);

    let shifts = (0..shift_count)
        .map(|i| {
            let (sh, sm, eh) = SHAPES[rng.random_range(0..SHAPES.len())];
            let day = Weekday::ALL[rng.random_range(0..2)];
            Shift::new(format!("R{i}"), day, t(sh, sm), t(eh, 0), rng.random_range(1..=2))
        })
        .collect();

    let mut availability = AvailabilityMatrix::new(shift_count);
    for p in 0..people {
        let flags = (0..shift_count).map(|_| rng.random_bool(0.75)).collect();
        availability = availability.with_person(&format!("p{p}"), flags).unwrap();
    }

    let mut config = RosterConfig::default().with_weekly_hour_cap(rng.random_range(2..=7));
    if rng.random_bool(0.3) {
        config = config.with_max_shifts_per_day(1);
    }
    (ShiftCatalog::new(shifts), availability, config)
}

/// Smallest gap over every feasible assignment, by enumeration.
fn brute_force_gap(
    catalog: &ShiftCatalog,
    availability: &AvailabilityMatrix,
    config: &RosterConfig,
) -> Option<i64> {
    let shifts = catalog.shifts();
    let people = availability.person_count();
    let bits = shifts.len() * people;
    let mut best: Option<i64> = None;

    'mask: for mask in 0u32..(1 << bits) {
        let x = |s: usize, p: usize| mask & (1 << (s * people + p)) != 0;
        for (s, shift) in shifts.iter().enumerate() {
            let count = (0..people).filter(|&p| x(s, p)).count();
            if count != shift.required as usize {
                continue 'mask;
            }
            if (0..people).any(|p| x(s, p) && !availability.is_available(p, s)) {
                continue 'mask;
            }
        }

        let mut loads = vec![0i64; people];
        for (p, load) in loads.iter_mut().enumerate() {
            *load = shifts
                .iter()
                .enumerate()
                .filter(|&(s, _)| x(s, p))
                .map(|(_, sh)| sh.duration_ticks())
                .sum();
            if *load > config.weekly_cap_ticks() {
                continue 'mask;
            }
            if let Some(max) = config.daily_shift_cap() {
                for day in Weekday::ALL {
                    let n = shifts
                        .iter()
                        .enumerate()
                        .filter(|&(s, sh)| sh.day == day && x(s, p))
                        .count();
                    if n as u32 > max {
                        continue 'mask;
                    }
                }
            }
        }

        let gap = loads.iter().max().unwrap_or(&0) - loads.iter().min().unwrap_or(&0);
        best = Some(best.map_or(gap, |b: i64| b.min(gap)));
    }
    best
}

#[test]
fn test_random_instances_match_enumeration() {
    let mut rng = SmallRng::seed_from_u64(42);
    for round in 0..60 {
        let (catalog, availability, config) = random_instance(&mut rng);
        let outcome = solve_week(&catalog, &availability, &config).unwrap();

        match (brute_force_gap(&catalog, &availability, &config), &outcome) {
            (None, ScheduleOutcome::NoSchedule { status, .. }) => {
                assert_eq!(*status, SolveStatus::Infeasible, "round {round}");
            }
            (Some(gap), ScheduleOutcome::Solved(report)) => {
                assert!(report.is_optimal(), "round {round}");
                assert_eq!(report.fairness_gap_ticks, gap, "round {round}");
                assert_invariants(report, &catalog, &availability, &config);
            }
            (expected, got) => panic!("round {round}: expected gap {expected:?}, got {got:?}"),
        }
    }
}

#[test]
fn test_repeated_solves_are_identical() {
    let catalog = ShiftCatalog::new(vec![
        Shift::new("S1", Weekday::Mon, t(9, 0), t(12, 0), 1),
        Shift::new("S2", Weekday::Mon, t(12, 0), t(15, 0), 2),
    ]);
    let availability = all_available(&["ann", "ben", "cat"], 2);
    let config = RosterConfig::default();

    let first = solve_week(&catalog, &availability, &config).unwrap();
    let second = solve_week(&catalog, &availability, &config).unwrap();
    assert_eq!(
        first.report().unwrap().roster,
        second.report().unwrap().roster
    );
}
