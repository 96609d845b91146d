//! Rostering domain models.
//!
//! Provides the data types for a weekly rostering problem and its
//! solution: who is available when, which shifts exist, and who was
//! assigned where.
//!
//! # Domain Mappings
//!
//! | u-roster | Campus | Retail | Healthcare |
//! |----------|--------|--------|------------|
//! | Person | Student worker | Clerk | Nurse |
//! | Shift | Desk slot | Till shift | Ward shift |
//! | ShiftCatalog | Weekly desk grid | Store hours | Ward rota |
//! | Roster | Desk schedule | Staff plan | Duty roster |

mod availability;
mod calendar;
mod catalog;
mod person;
mod roster;
mod shift;

pub use availability::{AvailabilityMatrix, PersonAvailability};
pub use calendar::{FreeInterval, WeeklyCalendar};
pub use catalog::ShiftCatalog;
pub use person::{normalize_name, Person};
pub use roster::{Roster, RosterEntry};
pub use shift::{Shift, TimeOfDay, Weekday, MINUTES_PER_TICK, TICKS_PER_HOUR};
