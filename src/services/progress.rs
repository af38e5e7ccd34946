//! Progress derivation for enrollments.
//!
//! Everything here is pure: callers read the current counts inside their
//! transaction and persist whatever these functions return. Percentage and
//! status are always recomputed from the counts, never adjusted
//! incrementally.

use chrono::NaiveDateTime;

use crate::entities::{enrollment, sea_orm_active_enums::EnrollmentStatus};

/// The mutable lifecycle fields of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentProgress {
    pub status: EnrollmentStatus,
    pub percentage: i32,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl Default for EnrollmentProgress {
    fn default() -> Self {
        Self {
            status: EnrollmentStatus::NotStarted,
            percentage: 0,
            started_at: None,
            completed_at: None,
        }
    }
}

impl From<&enrollment::Model> for EnrollmentProgress {
    fn from(model: &enrollment::Model) -> Self {
        Self {
            status: model.status,
            percentage: model.percentage,
            started_at: model.started_at,
            completed_at: model.completed_at,
        }
    }
}

/// `floor(100 * completed / total)`, 0 for an empty training.
pub fn completion_percentage(completed: u64, total: u64) -> i32 {
    if total == 0 {
        if completed > 0 {
            tracing::warn!(
                completed,
                "Completed module count is positive for a training without modules"
            );
        }
        return 0;
    }

    if completed > total {
        tracing::warn!(
            completed,
            total,
            "Completed module count exceeds the number of modules"
        );
        return 100;
    }

    // total > 0 and completed <= total, so the quotient fits in 0..=100
    (completed * 100 / total) as i32
}

pub fn status_for_percentage(percentage: i32) -> EnrollmentStatus {
    match percentage {
        p if p >= 100 => EnrollmentStatus::Completed,
        p if p > 0 => EnrollmentStatus::InProgress,
        _ => EnrollmentStatus::NotStarted,
    }
}

impl EnrollmentProgress {
    /// Explicit start: in progress regardless of the current percentage.
    /// The first `started_at` is never overwritten.
    pub fn start(self, now: NaiveDateTime) -> Self {
        Self {
            status: EnrollmentStatus::InProgress,
            percentage: self.percentage,
            started_at: self.started_at.or(Some(now)),
            completed_at: None,
        }
    }

    /// Derives percentage and status from the current completion counts.
    pub fn recompute(self, completed: u64, total: u64, now: NaiveDateTime) -> Self {
        let percentage = completion_percentage(completed, total);
        let status = status_for_percentage(percentage);

        // every event that lands on 100% restamps the completion time
        let completed_at = match status {
            EnrollmentStatus::Completed => Some(now),
            EnrollmentStatus::InProgress | EnrollmentStatus::NotStarted => None,
        };

        let started_at = match status {
            EnrollmentStatus::InProgress => self.started_at.or(Some(now)),
            _ => self.started_at,
        };

        Self {
            status,
            percentage,
            started_at,
            completed_at,
        }
    }
}

/// Timestamp to store on a progress row after setting its flag to `completed`.
///
/// Repeating a completion moves the timestamp to the latest event.
pub fn module_completed_at(completed: bool, now: NaiveDateTime) -> Option<NaiveDateTime> {
    completed.then_some(now)
}
