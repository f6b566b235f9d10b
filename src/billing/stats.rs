use serde::Serialize;

use super::month::BillingMonth;
use super::status::{PaymentStatus, StudentMonthStatus};
use crate::records::Payment;

/// Totals over a set of payments, split by admin confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_payments: usize,
    pub total_amount: f64,
    pub confirmed_amount: f64,
    pub pending_amount: f64,
    pub confirmed_count: usize,
    pub pending_count: usize,
}

impl PaymentStats {
    /// Summarize `payments`, optionally only those dated within `month`.
    pub fn collect(payments: &[Payment], month: Option<BillingMonth>) -> Self {
        payments
            .iter()
            .filter(|p| match month {
                Some(m) => p.payment_date.as_ref().is_some_and(|d| m.contains(d)),
                None => true,
            })
            .fold(Self::default(), |mut stats, p| {
                stats.total_payments += 1;
                stats.total_amount += p.amount;
                if p.is_confirmed() {
                    stats.confirmed_count += 1;
                    stats.confirmed_amount += p.amount;
                } else {
                    stats.pending_count += 1;
                    stats.pending_amount += p.amount;
                }
                stats
            })
    }
}

/// Roll-up of a month's statuses for the table footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSummary {
    pub expected: f64,
    pub collected: f64,
    pub outstanding: f64,
    pub paid: usize,
    pub partial: usize,
    pub unpaid: usize,
}

impl MonthSummary {
    pub fn of<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a StudentMonthStatus>,
    {
        let mut summary = Self::default();
        for s in statuses {
            summary.expected += s.fee;
            summary.collected += s.paid_this_month;
            summary.outstanding += s.debt;
            match s.status {
                PaymentStatus::Paid => summary.paid += 1,
                PaymentStatus::Partial => summary.partial += 1,
                PaymentStatus::Unpaid => summary.unpaid += 1,
            }
        }
        summary
    }

    pub fn students(&self) -> usize {
        self.paid + self.partial + self.unpaid
    }
}
