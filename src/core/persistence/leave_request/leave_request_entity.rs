use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::persistence::request_status::RequestStatus;

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveRequestEntity {
    pub id: String,
    pub manager_id: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: RequestStatus,
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequestEntity {
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(start: &str, end: &str) -> LeaveRequestEntity {
        let now = Utc::now();
        LeaveRequestEntity {
            id: "l1".into(),
            manager_id: "m1".into(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            reason: "family".into(),
            status: RequestStatus::Pending,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn days_are_inclusive() {
        assert_eq!(leave("2030-01-01", "2030-01-01").days(), 1);
        assert_eq!(leave("2030-01-01", "2030-01-05").days(), 5);
    }

    #[test]
    fn overlap_touching_edges() {
        let l = leave("2030-01-10", "2030-01-12");
        assert!(l.overlaps("2030-01-12".parse().unwrap(), "2030-01-15".parse().unwrap()));
        assert!(!l.overlaps("2030-01-13".parse().unwrap(), "2030-01-15".parse().unwrap()));
        assert!(l.overlaps("2030-01-01".parse().unwrap(), "2030-01-31".parse().unwrap()));
    }
}
