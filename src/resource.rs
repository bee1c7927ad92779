use crate::calendar::WeekOfYear;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// State sentinel: a resource with this state serves any state-specific
/// demand, and a demand with this state is satisfiable by any resource.
pub const ANY_STATE: &str = "any";

/// A schedulable unit of work capacity - an actual person or a
/// forward-planned placeholder slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub platform: String,
    pub locality: String,
    /// Case types the resource can perform.
    pub skills: HashSet<String>,
    /// Explicit eligible states. The `"any"` sentinel is always honored
    /// implicitly on the demand side regardless of this set's contents.
    pub states: HashSet<String>,
    pub start_date: NaiveDate,
    /// Absent end date means indefinitely available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Named capacity tier; `None` selects the engine's default tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    /// Forward-planned slot rather than an actual person.
    #[serde(default)]
    pub placeholder: bool,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        platform: impl Into<String>,
        locality: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            platform: platform.into(),
            locality: locality.into(),
            skills: HashSet::new(),
            states: HashSet::new(),
            start_date,
            end_date: None,
            tier: None,
            placeholder: false,
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn has_any_state(&self) -> bool {
        self.states.contains(ANY_STATE)
    }

    /// Whether the availability window overlaps the given ISO week.
    pub fn available_in_week(&self, week: WeekOfYear) -> bool {
        let (Some(monday), Some(sunday)) = (week.monday(), week.sunday()) else {
            return false;
        };
        if self.start_date > sunday {
            return false;
        }
        match self.end_date {
            Some(end) => end >= monday,
            None => true,
        }
    }
}

/// Filter a resource snapshot down to the ones available in a week,
/// preserving input order (allocation tie-breaks depend on it).
pub fn available_resources(resources: &[Resource], week: WeekOfYear) -> Vec<&Resource> {
    resources
        .iter()
        .filter(|r| r.available_in_week(week))
        .collect()
}
