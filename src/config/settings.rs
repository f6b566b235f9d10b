use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::billing::{FeeSchedule, MONTHLY_FEE};
use crate::error::{Result, TuitionError};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub center: CenterSettings,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CenterSettings {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BillingSettings {
    #[serde(default = "default_monthly_fee")]
    pub monthly_fee: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Count only payments an admin has confirmed
    #[serde(default)]
    pub confirmed_only: bool,
    /// Per-group overrides keyed by group name
    #[serde(default)]
    pub group_fees: BTreeMap<String, f64>,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            monthly_fee: default_monthly_fee(),
            currency: default_currency(),
            confirmed_only: false,
            group_fees: BTreeMap::new(),
        }
    }
}

impl BillingSettings {
    /// Reject fees that are NaN, infinite or negative
    pub fn validate(&self) -> Result<()> {
        let fees = std::iter::once(("billing.monthly_fee".to_string(), self.monthly_fee)).chain(
            self.group_fees
                .iter()
                .map(|(group, fee)| (format!("billing.group_fees.\"{group}\""), *fee)),
        );

        for (key, value) in fees {
            if !value.is_finite() || value < 0.0 {
                return Err(TuitionError::InvalidFee { key, value });
            }
        }
        Ok(())
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        self.group_fees
            .iter()
            .fold(FeeSchedule::flat(self.monthly_fee), |fees, (group, fee)| {
                fees.with_group_fee(group, *fee)
            })
    }
}

/// Snapshot file locations, relative to the config directory unless absolute
#[derive(Debug, Deserialize, Serialize)]
pub struct DataSettings {
    #[serde(default = "default_students_file")]
    pub students: String,
    #[serde(default = "default_payments_file")]
    pub payments: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            students: default_students_file(),
            payments: default_payments_file(),
        }
    }
}

fn default_monthly_fee() -> f64 {
    MONTHLY_FEE
}

fn default_currency() -> String {
    "UZS".to_string()
}

fn default_students_file() -> String {
    "students.json".to_string()
}

fn default_payments_file() -> String {
    "payments.json".to_string()
}
