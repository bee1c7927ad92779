pub mod allocation;
pub mod calendar;
pub mod capacity;
pub mod config;
pub mod demand;
pub mod eligibility;
pub mod error;
pub mod forecast;
pub mod ideal;
pub mod import;
pub mod resource;
pub(crate) mod validation;

pub use allocation::{
    AllocationEngine, DemandSnapshot, WeekInput, WeekOutcome, WeekResult, WeeklyAssignment,
};
pub use calendar::{DayCalendar, DayCalendarConfig, WeekCalendar, WeekOfYear, WeekProfile};
pub use capacity::{FULL_PRODUCTION, TierCatalog, weekly_output};
pub use config::{EngineConfig, ScoreWeights, StaffingBand, StaffingBands};
pub use demand::{Demand, DemandKey, DemandStatus};
pub use eligibility::{EligibilityIndex, StateMatch, is_eligible, state_match};
pub use error::{EngineError, EngineResult};
pub use forecast::{WeeklyQuantity, distribute_month_for_locality, distribute_monthly};
pub use ideal::{check_fairness_sum, ideal_shares};
pub use import::{
    ImportError, WeekSnapshot, load_demands_from_csv, load_resources_from_csv,
    load_week_calendar_from_csv, load_week_snapshot, save_week_snapshot, validate_inputs,
};
pub use resource::{ANY_STATE, Resource, available_resources};
