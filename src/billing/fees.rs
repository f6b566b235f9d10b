use std::collections::BTreeMap;

use crate::records::Student;

/// Tuition charged when no group override applies (UZS)
pub const MONTHLY_FEE: f64 = 320_000.0;

/// Monthly fee lookup: one default plus optional per-group overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    default_fee: f64,
    group_fees: BTreeMap<String, f64>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::flat(MONTHLY_FEE)
    }
}

impl FeeSchedule {
    pub fn flat(default_fee: f64) -> Self {
        Self {
            default_fee,
            group_fees: BTreeMap::new(),
        }
    }

    pub fn with_group_fee(mut self, group: &str, fee: f64) -> Self {
        self.group_fees.insert(group.trim().to_lowercase(), fee);
        self
    }

    pub fn default_fee(&self) -> f64 {
        self.default_fee
    }

    pub fn group_fee(&self, group: &str) -> Option<f64> {
        self.group_fees.get(&group.trim().to_lowercase()).copied()
    }

    /// Fee of the student's first group that has an override, else the default.
    pub fn fee_for(&self, student: &Student) -> f64 {
        student
            .group_names()
            .into_iter()
            .find_map(|name| self.group_fee(name))
            .unwrap_or(self.default_fee)
    }
}
