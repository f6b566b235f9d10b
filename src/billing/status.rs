use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::fees::FeeSchedule;
use super::month::BillingMonth;
use crate::records::{Payment, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

impl PaymentStatus {
    pub fn classify(paid: f64, fee: f64) -> Self {
        if paid >= fee {
            PaymentStatus::Paid
        } else if paid > 0.0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(PaymentStatus::Paid),
            "partial" => Some(PaymentStatus::Partial),
            "unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "PAID"),
            PaymentStatus::Partial => write!(f, "PARTIAL"),
            PaymentStatus::Unpaid => write!(f, "UNPAID"),
        }
    }
}

/// What the operator should do next for a student in the selected month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    /// Record a new payment
    Record,
    /// Edit the payment already covering this month
    Edit(i64),
}

impl fmt::Display for PaymentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentAction::Record => write!(f, "record"),
            PaymentAction::Edit(id) => write!(f, "edit #{id}"),
        }
    }
}

/// One student's billing state for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMonthStatus {
    pub student_id: i64,
    pub fee: f64,
    pub paid_this_month: f64,
    pub debt: f64,
    pub status: PaymentStatus,
    pub month_payment: Option<Payment>,
    pub last_payment_date: Option<NaiveDateTime>,
}

impl StudentMonthStatus {
    pub fn action(&self) -> PaymentAction {
        match (&self.status, &self.month_payment) {
            (PaymentStatus::Paid, Some(payment)) => PaymentAction::Edit(payment.id),
            _ => PaymentAction::Record,
        }
    }
}

/// Compute each student's status for `month`, in roster order.
///
/// Payments for the month are summed per student and compared against the
/// student's fee. `debt` never goes negative. Payments without a parseable
/// date never match a month but still take part in `last_payment_date`
/// when they have one.
pub fn month_statuses(
    students: &[Student],
    payments: &[Payment],
    month: BillingMonth,
    fees: &FeeSchedule,
) -> Vec<StudentMonthStatus> {
    let mut by_student: HashMap<i64, Vec<&Payment>> = HashMap::new();
    for payment in payments {
        by_student.entry(payment.student_id).or_default().push(payment);
    }

    let statuses: Vec<StudentMonthStatus> = students
        .iter()
        .map(|student| {
            let own = by_student.get(&student.id).map(Vec::as_slice).unwrap_or(&[]);
            student_status(student, own, month, fees)
        })
        .collect();

    tracing::debug!(
        %month,
        students = students.len(),
        payments = payments.len(),
        "computed monthly statuses"
    );

    statuses
}

fn student_status(
    student: &Student,
    payments: &[&Payment],
    month: BillingMonth,
    fees: &FeeSchedule,
) -> StudentMonthStatus {
    let this_month: Vec<&Payment> = payments
        .iter()
        .copied()
        .filter(|p| p.payment_date.as_ref().is_some_and(|d| month.contains(d)))
        .collect();

    let fee = fees.fee_for(student);
    let paid_this_month: f64 = this_month.iter().map(|p| p.amount).sum();
    let debt = (fee - paid_this_month).max(0.0);

    StudentMonthStatus {
        student_id: student.id,
        fee,
        paid_this_month,
        debt,
        status: PaymentStatus::classify(paid_this_month, fee),
        month_payment: this_month.first().map(|p| (*p).clone()),
        last_payment_date: payments.iter().filter_map(|p| p.payment_date).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(PaymentStatus::classify(0.0, 100.0), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::classify(-50.0, 100.0), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::classify(0.01, 100.0), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::classify(100.0, 100.0), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::classify(150.0, 100.0), PaymentStatus::Paid);
    }

    #[test]
    fn status_filter_parsing() {
        assert_eq!(PaymentStatus::parse("PAID"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse(" partial "), Some(PaymentStatus::Partial));
        assert_eq!(PaymentStatus::parse("owing"), None);
    }
}
