use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A payment as returned by the backend's payment listings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
    /// Non-numeric or missing amounts read as 0
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    /// Local wall-clock time; `None` when absent or unparseable
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub payment_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub confirmed_by_admin: Option<bool>,
}

impl Payment {
    pub fn new(id: i64, student_id: i64, amount: f64, payment_date: Option<NaiveDateTime>) -> Self {
        Self {
            id,
            student_id,
            student_name: None,
            group_id: None,
            group_name: None,
            amount,
            payment_date,
            method: None,
            notes: None,
            confirmed_by_admin: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_by_admin.unwrap_or(false)
    }

    /// Human label for the payment method (CASH, CARD, TRANSFER)
    pub fn method_label(&self) -> &str {
        match self.method.as_deref() {
            Some("CASH") => "Cash",
            Some("CARD") => "Card",
            Some("TRANSFER") => "Transfer",
            Some(other) if !other.is_empty() => other,
            _ => "-",
        }
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0.0, coerce_amount))
}

fn coerce_amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &value {
        Some(Value::String(s)) => parse_timestamp(s),
        Some(Value::Array(parts)) => timestamp_from_parts(parts),
        _ => None,
    };

    if parsed.is_none() {
        if let Some(raw) = value.filter(|v| !v.is_null()) {
            tracing::debug!(%raw, "ignoring unparseable payment date");
        }
    }
    Ok(parsed)
}

/// Parse an ISO timestamp into local wall-clock time.
///
/// Timestamps with an offset (`Z`, `+05:00`) are converted to the local
/// timezone. Naive timestamps and plain dates are taken as already local.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Array form `[year, month, day, hour?, minute?, second?]`
fn timestamp_from_parts(parts: &[Value]) -> Option<NaiveDateTime> {
    let nums: Vec<u32> = parts
        .iter()
        .take(6)
        .map(|v| v.as_u64().and_then(|n| u32::try_from(n).ok()))
        .collect::<Option<_>>()?;

    let [year, month, day, rest @ ..] = nums.as_slice() else {
        return None;
    };
    let hour = rest.first().copied().unwrap_or(0);
    let minute = rest.get(1).copied().unwrap_or(0);
    let second = rest.get(2).copied().unwrap_or(0);

    NaiveDate::from_ymd_opt(i32::try_from(*year).ok()?, *month, *day)?.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillingMonth;
    use chrono::{Datelike, Timelike};

    fn parse(json: &str) -> Payment {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reads_backend_payment_dto() {
        let p = parse(
            r#"{
                "id": 1, "studentId": 7, "studentName": "Aziza", "groupId": 3,
                "groupName": "Math A", "amount": 320000.00,
                "paymentDate": "2024-06-15T10:30:00", "method": "CASH",
                "confirmedByAdmin": true, "notes": null
            }"#,
        );

        assert_eq!(p.amount, 320000.0);
        let date = p.payment_date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 6, 15));
        assert_eq!(date.hour(), 10);
        assert!(p.is_confirmed());
        assert_eq!(p.method_label(), "Cash");
    }

    #[test]
    fn non_numeric_amounts_become_zero() {
        for raw in [r#""abc""#, "null", r#""""#, "true", "[1]", r#""NaN""#] {
            let p = parse(&format!(r#"{{"id": 1, "studentId": 1, "amount": {raw}}}"#));
            assert_eq!(p.amount, 0.0, "amount {raw}");
        }

        let missing = parse(r#"{"id": 1, "studentId": 1}"#);
        assert_eq!(missing.amount, 0.0);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let p = parse(r#"{"id": 1, "studentId": 1, "amount": " 150000.50 "}"#);
        assert_eq!(p.amount, 150000.5);
    }

    #[test]
    fn date_forms() {
        let plain = parse_timestamp("2024-06-02").unwrap();
        assert_eq!((plain.month(), plain.day(), plain.hour()), (6, 2, 0));

        let picker = parse_timestamp("2024-06-02T09:15").unwrap();
        assert_eq!((picker.hour(), picker.minute()), (9, 15));

        let fractional = parse_timestamp("2024-06-02T09:15:00.123456").unwrap();
        assert_eq!(fractional.day(), 2);

        assert!(parse_timestamp("2024-06-02T09:15:00Z").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("2024-13-01").is_none());
    }

    #[test]
    fn offset_timestamps_convert_to_local_month() {
        let raw = "2024-06-30T22:00:00Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        let parsed = parse_timestamp(raw).unwrap();
        assert_eq!(parsed, expected);

        // The month is decided by the local date, which depends on the host zone
        let june = BillingMonth::parse("2024-06").unwrap();
        let july = BillingMonth::parse("2024-07").unwrap();
        assert_eq!(june.contains(&parsed), BillingMonth::of(expected) == june);
        assert_eq!(july.contains(&parsed), BillingMonth::of(expected) == july);
        assert!(june.contains(&parsed) != july.contains(&parsed));

        let offset = parse_timestamp("2024-06-01T03:00:00+05:00").unwrap();
        let offset_expected = DateTime::parse_from_rfc3339("2024-06-01T03:00:00+05:00")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(offset, offset_expected);
    }

    #[test]
    fn array_dates_are_accepted() {
        let p = parse(r#"{"id": 1, "studentId": 1, "paymentDate": [2024, 6, 15, 10, 30]}"#);
        let date = p.payment_date.unwrap();
        assert_eq!((date.month(), date.day(), date.minute()), (6, 15, 30));
    }

    #[test]
    fn bad_dates_become_none() {
        let p = parse(r#"{"id": 1, "studentId": 1, "paymentDate": "yesterday"}"#);
        assert!(p.payment_date.is_none());

        let p = parse(r#"{"id": 1, "studentId": 1, "paymentDate": 12345}"#);
        assert!(p.payment_date.is_none());
    }
}
