use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::transmission::ReproductionSchedule;

/// Interventions that lower the asymptotic reproduction number.
///
/// Variant order is the order in which decrements are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    BusinessClosures,
    SchoolClosures,
    StayAtHome,
    ExpandedTesting,
    TravelRestrictions,
}

impl Policy {
    pub const ALL: [Policy; 5] = [
        Policy::BusinessClosures,
        Policy::SchoolClosures,
        Policy::StayAtHome,
        Policy::ExpandedTesting,
        Policy::TravelRestrictions,
    ];

    /// Amount subtracted from `r_end` when the policy is enabled.
    pub fn decrement(self) -> f64 {
        match self {
            Policy::BusinessClosures => 0.5,
            Policy::SchoolClosures => 0.1,
            Policy::StayAtHome => 0.4,
            Policy::ExpandedTesting => 0.5,
            Policy::TravelRestrictions => 0.2,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Policy::BusinessClosures => "business_closures",
            Policy::SchoolClosures => "school_closures",
            Policy::StayAtHome => "stay_at_home",
            Policy::ExpandedTesting => "expanded_testing",
            Policy::TravelRestrictions => "travel_restrictions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Policy::BusinessClosures => "Close non-essential businesses",
            Policy::SchoolClosures => "Close schools and universities",
            Policy::StayAtHome => "Stay at home orders",
            Policy::ExpandedTesting => "Expanded testing",
            Policy::TravelRestrictions => "Travel restrictions",
        }
    }
}

/// The enabled interventions for one run. Iteration follows `Policy`'s
/// declaration order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicySet {
    enabled: BTreeSet<Policy>,
}

impl PolicySet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Policy::ALL.into_iter().collect()
    }

    pub fn with(mut self, policy: Policy) -> Self {
        self.enabled.insert(policy);
        self
    }

    pub fn insert(&mut self, policy: Policy) -> bool {
        self.enabled.insert(policy)
    }

    pub fn contains(&self, policy: Policy) -> bool {
        self.enabled.contains(&policy)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Policy> + '_ {
        self.enabled.iter().copied()
    }

    pub fn total_decrement(&self) -> f64 {
        self.iter().map(Policy::decrement).sum()
    }
}

impl FromIterator<Policy> for PolicySet {
    fn from_iter<I: IntoIterator<Item = Policy>>(iter: I) -> Self {
        Self { enabled: iter.into_iter().collect() }
    }
}

/// One boolean per intervention, the shape a form of checkboxes produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyToggles {
    pub business_closures: bool,
    pub school_closures: bool,
    pub stay_at_home: bool,
    pub expanded_testing: bool,
    pub travel_restrictions: bool,
}

impl PolicyToggles {
    pub fn is_enabled(&self, policy: Policy) -> bool {
        match policy {
            Policy::BusinessClosures => self.business_closures,
            Policy::SchoolClosures => self.school_closures,
            Policy::StayAtHome => self.stay_at_home,
            Policy::ExpandedTesting => self.expanded_testing,
            Policy::TravelRestrictions => self.travel_restrictions,
        }
    }
}

impl From<PolicyToggles> for PolicySet {
    fn from(toggles: PolicyToggles) -> Self {
        Policy::ALL.into_iter().filter(|p| toggles.is_enabled(*p)).collect()
    }
}

/// `max(0, value - decrement)`: a decrement never takes `value` below zero.
pub fn saturating_decrement(value: f64, decrement: f64) -> f64 {
    if value - decrement < 0.0 {
        0.0
    } else {
        value - decrement
    }
}

/// Applies every enabled decrement to `base.r_end`, clamping at zero after
/// each one.
pub fn apply_policies(base: ReproductionSchedule, policies: &PolicySet) -> ReproductionSchedule {
    let r_end = policies
        .iter()
        .fold(base.r_end(), |r, p| saturating_decrement(r, p.decrement()));
    base.with_r_end(r_end)
}

/// Resolves the schedule for a run. With no policy the epidemic follows the
/// unmitigated schedule (inflection at day 70, no decay); otherwise the
/// intervention baseline (inflection at day 30) is reduced by each policy.
pub fn resolve_schedule(policies: &PolicySet) -> ReproductionSchedule {
    if policies.is_empty() {
        ReproductionSchedule::unmitigated()
    } else {
        apply_policies(ReproductionSchedule::intervention_baseline(), policies)
    }
}
