//! Account status
//!
//! Lifecycle status shared by receivables and payables, and the rules that
//! keep the settlement date (received date / paid date) consistent with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Patch;

/// Lifecycle status of a receivable or payable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "PENDING",
            AccountStatus::Paid => "PAID",
            AccountStatus::Overdue => "OVERDUE",
            AccountStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the settlement date after an update.
///
/// `status` is the requested status; `None` keeps `current_status`.
///
/// * an explicit date is applied verbatim
/// * moving to PAID without a date stamps `now`
/// * an account already PAID keeps its date when none is sent
/// * an explicit `null` clears the date, except under PAID where it stamps `now`
/// * an omitted date leaves the current value untouched
pub fn resolve_settled_date(
    current_status: AccountStatus,
    current_date: Option<DateTime<Utc>>,
    status: Option<AccountStatus>,
    requested: Patch<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let target = status.unwrap_or(current_status);

    match (target, requested) {
        (_, Patch::Value(date)) => Some(date),
        (AccountStatus::Paid, Patch::Unset) if current_status == AccountStatus::Paid => {
            current_date.or(Some(now))
        }
        (AccountStatus::Paid, Patch::Unset | Patch::Null) => Some(now),
        (_, Patch::Null) => None,
        (_, Patch::Unset) => current_date,
    }
}

/// Settlement date for a freshly created account
pub fn initial_settled_date(
    status: AccountStatus,
    requested: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let requested = match requested {
        Some(date) => Patch::Value(date),
        None => Patch::Unset,
    };
    resolve_settled_date(AccountStatus::Pending, None, Some(status), requested, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use super::AccountStatus::{Cancelled, Overdue, Paid, Pending};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_paid_without_date_stamps_now() {
        let now = at(20);
        let date = resolve_settled_date(Pending, None, Some(Paid), Patch::Unset, now);
        assert_eq!(date, Some(now));
    }

    #[test]
    fn test_moving_to_paid_replaces_stale_date() {
        // left over from an earlier payment that was reopened
        let date = resolve_settled_date(Pending, Some(at(3)), Some(Paid), Patch::Unset, at(20));
        assert_eq!(date, Some(at(20)));
    }

    #[test]
    fn test_already_paid_keeps_its_date() {
        let date = resolve_settled_date(Paid, Some(at(3)), Some(Paid), Patch::Unset, at(20));
        assert_eq!(date, Some(at(3)));

        let date = resolve_settled_date(Paid, Some(at(3)), None, Patch::Unset, at(20));
        assert_eq!(date, Some(at(3)));
    }

    #[test]
    fn test_paid_with_explicit_date_is_verbatim() {
        let date = resolve_settled_date(Pending, None, Some(Paid), Patch::Value(at(1)), at(20));
        assert_eq!(date, Some(at(1)));
    }

    #[test]
    fn test_paid_with_explicit_null_still_has_a_date() {
        let date = resolve_settled_date(Pending, None, Some(Paid), Patch::Null, at(20));
        assert_eq!(date, Some(at(20)));
    }

    #[test]
    fn test_null_date_on_stored_paid_account_keeps_a_date() {
        let date = resolve_settled_date(Paid, Some(at(3)), None, Patch::Null, at(20));
        assert_eq!(date, Some(at(20)));
    }

    #[test]
    fn test_pending_with_null_clears() {
        let date = resolve_settled_date(Paid, Some(at(3)), Some(Pending), Patch::Null, at(20));
        assert_eq!(date, None);
    }

    #[test]
    fn test_pending_without_date_leaves_existing() {
        let date = resolve_settled_date(Paid, Some(at(3)), Some(Pending), Patch::Unset, at(20));
        assert_eq!(date, Some(at(3)));
    }

    #[test]
    fn test_other_statuses_only_touch_status() {
        for status in [Overdue, Cancelled] {
            let date = resolve_settled_date(Paid, Some(at(3)), Some(status), Patch::Unset, at(20));
            assert_eq!(date, Some(at(3)));
        }
    }

    #[test]
    fn test_date_only_update() {
        assert_eq!(
            resolve_settled_date(Pending, None, None, Patch::Value(at(9)), at(20)),
            Some(at(9))
        );
        assert_eq!(resolve_settled_date(Overdue, Some(at(9)), None, Patch::Null, at(20)), None);
    }

    #[test]
    fn test_initial_settled_date() {
        let now = Utc::now();
        assert_eq!(initial_settled_date(Pending, None, now), None);
        assert_eq!(initial_settled_date(Paid, None, now), Some(now));
        let earlier = now - Duration::days(2);
        assert_eq!(initial_settled_date(Paid, Some(earlier), now), Some(earlier));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&Cancelled).unwrap(), "\"CANCELLED\"");
        let status: AccountStatus = serde_json::from_str("\"OVERDUE\"").unwrap();
        assert_eq!(status, Overdue);
        assert!(serde_json::from_str::<AccountStatus>("\"paid\"").is_err());
        assert_eq!(AccountStatus::default(), Pending);
    }
}
