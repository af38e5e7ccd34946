//! Enrollment lifecycle: explicit starts and module completion events.
//!
//! Each operation runs in one transaction. The enrollment row is
//! get-or-created and locked before any progress is read, so concurrent
//! events for the same (employee, training) pair apply one after another
//! and every recompute sees the counts committed by its predecessors.

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::progress::{self, EnrollmentProgress};
use crate::entities::{employee, enrollment, module_progress};
use crate::error::{TrainingError, TrainingResult};
use crate::repositories::{
    EnrollmentRepository, ModuleProgressRepository, ModuleRepository, TrainingRepository,
};

/// Result of a completion event.
#[derive(Debug, Clone)]
pub struct ModuleCompletion {
    pub enrollment: enrollment::Model,
    pub progress: module_progress::Model,
}

pub struct EnrollmentEngine<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EnrollmentEngine<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn start_training(
        &self,
        employee: &employee::Model,
        training_id: i32,
    ) -> TrainingResult<enrollment::Model> {
        let txn = self.db.begin().await?;

        TrainingRepository::new(&txn)
            .find_by_id(training_id)
            .await?
            .ok_or_else(|| TrainingError::not_found("Training", training_id))?;

        let enrollments = EnrollmentRepository::new(&txn);
        let (current, created) = enrollments
            .get_or_create_locked(employee.id, training_id)
            .await?;

        let now = Utc::now().naive_utc();
        let next = EnrollmentProgress::from(&current).start(now);
        let enrollment = enrollments.save_progress(current, next).await?;

        txn.commit().await?;

        tracing::info!(
            employee_id = employee.id,
            training_id,
            enrollment_id = enrollment.id,
            created,
            "Training started"
        );

        Ok(enrollment)
    }

    pub async fn complete_module(
        &self,
        employee: &employee::Model,
        module_id: i32,
        completed: bool,
    ) -> TrainingResult<ModuleCompletion> {
        let txn = self.db.begin().await?;

        let modules = ModuleRepository::new(&txn);
        let module = modules
            .find_by_id(module_id)
            .await?
            .ok_or_else(|| TrainingError::not_found("Module", module_id))?;
        let training_id = module.training_id;

        let enrollments = EnrollmentRepository::new(&txn);
        let (current, _) = enrollments
            .get_or_create_locked(employee.id, training_id)
            .await?;

        let progress_rows = ModuleProgressRepository::new(&txn);
        let (row, _) = progress_rows
            .get_or_create_locked(current.id, module.id)
            .await?;

        let now = Utc::now().naive_utc();
        let completed_at = progress::module_completed_at(completed, now);
        let row = progress_rows.set_completed(row, completed, completed_at).await?;

        let total = modules.count_by_training(training_id).await?;
        let done = progress_rows.count_completed(current.id, training_id).await?;

        let next = EnrollmentProgress::from(&current).recompute(done, total, now);
        let enrollment = enrollments.save_progress(current, next).await?;

        txn.commit().await?;

        tracing::info!(
            employee_id = employee.id,
            training_id,
            module_id,
            completed,
            done,
            total,
            percentage = enrollment.percentage,
            status = ?enrollment.status,
            "Module progress recorded"
        );

        Ok(ModuleCompletion {
            enrollment,
            progress: row,
        })
    }
}
