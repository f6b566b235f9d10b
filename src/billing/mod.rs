mod fees;
mod month;
mod stats;
mod status;

pub use fees::{FeeSchedule, MONTHLY_FEE};
pub use month::BillingMonth;
pub use stats::{MonthSummary, PaymentStats};
pub use status::{month_statuses, PaymentAction, PaymentStatus, StudentMonthStatus};
