//! Loan model and late-fee computation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Loan model from database.
///
/// `return_date` and `late_fee` are written exactly once, when
/// `return_status` transitions false to true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub user_id: Uuid,
    /// Request that produced this loan, if it came through the approval flow
    pub request_id: Option<i32>,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_status: bool,
    pub return_date: Option<DateTime<Utc>>,
    /// Accrued fee in currency minor units
    pub late_fee: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    pub user_id: Uuid,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Update loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLoan {
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Return body: `PUT /loans/:id/return`
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnLoan {
    pub return_date: DateTime<Utc>,
}

/// Fee owed for a loan due at `due_date` and returned at `return_date`.
///
/// Whole days overdue (floored) times the per-day rate; on-time and early
/// returns owe nothing.
pub fn late_fee(due_date: DateTime<Utc>, return_date: DateTime<Utc>, fee_per_day: i64) -> i64 {
    let days_late = return_date.signed_duration_since(due_date).num_days();
    days_late.max(0) * fee_per_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn three_days_late_at_5000_per_day() {
        let due = date(2024, 1, 10);
        let returned = date(2024, 1, 13);
        assert_eq!(late_fee(due, returned, 5000), 15000);
    }

    #[test]
    fn on_time_return_owes_nothing() {
        let due = date(2024, 1, 10);
        assert_eq!(late_fee(due, due, 5000), 0);
    }

    #[test]
    fn early_return_owes_nothing() {
        let due = date(2024, 1, 10);
        let returned = date(2024, 1, 3);
        assert_eq!(late_fee(due, returned, 5000), 0);
    }

    #[test]
    fn partial_days_are_floored() {
        let due = date(2024, 1, 10);
        // 2 days and 6 hours late
        let returned = Utc.with_ymd_and_hms(2024, 1, 12, 18, 0, 0).unwrap();
        assert_eq!(late_fee(due, returned, 1000), 2000);
    }

    #[test]
    fn fee_is_monotonic_in_return_date() {
        let due = date(2024, 1, 10);
        let mut previous = 0;
        for day in 1..=30 {
            let fee = late_fee(due, date(2024, 1, day), 1000);
            assert!(fee >= previous);
            previous = fee;
        }
    }
}
