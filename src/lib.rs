pub mod billing;
pub mod config;
pub mod error;
pub mod format;
pub mod records;

pub use billing::{
    month_statuses, BillingMonth, FeeSchedule, MonthSummary, PaymentAction, PaymentStats,
    PaymentStatus, StudentMonthStatus, MONTHLY_FEE,
};
pub use config::{BillingSettings, CenterSettings, Config, DataSettings};
pub use error::{Result, TuitionError};
pub use records::{GroupRef, Payment, Student};
