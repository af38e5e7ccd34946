use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::entities::{enrollment, sea_orm_active_enums::EnrollmentStatus, training};
use crate::services::progress::EnrollmentProgress;

/// Lookup of the (employee, training) row. On backends with row locks the
/// row is selected `FOR UPDATE`.
pub(crate) fn locked_pair_query(
    employee_id: i32,
    training_id: i32,
    backend: DbBackend,
) -> Select<enrollment::Entity> {
    let query = enrollment::Entity::find()
        .filter(enrollment::Column::EmployeeId.eq(employee_id))
        .filter(enrollment::Column::TrainingId.eq(training_id));

    // SQLite has no row locks; its transactions already serialize writers
    match backend {
        DbBackend::Sqlite => query,
        _ => query.lock_exclusive(),
    }
}

pub struct EnrollmentRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_employee(
        &self,
        employee_id: i32,
    ) -> Result<Vec<enrollment::Model>, DbErr> {
        enrollment::Entity::find()
            .filter(enrollment::Column::EmployeeId.eq(employee_id))
            .order_by_asc(enrollment::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn find_by_employee_with_training(
        &self,
        employee_id: i32,
    ) -> Result<Vec<(enrollment::Model, Option<training::Model>)>, DbErr> {
        enrollment::Entity::find()
            .filter(enrollment::Column::EmployeeId.eq(employee_id))
            .find_also_related(training::Entity)
            .all(self.conn)
            .await
    }

    /// Counts rows for the pair; the unique index keeps this at 0 or 1.
    pub async fn count_for_pair(&self, employee_id: i32, training_id: i32) -> Result<u64, DbErr> {
        enrollment::Entity::find()
            .filter(enrollment::Column::EmployeeId.eq(employee_id))
            .filter(enrollment::Column::TrainingId.eq(training_id))
            .count(self.conn)
            .await
    }

    /// Get-or-create on (employee, training), returning the row locked for
    /// the rest of the enclosing transaction.
    ///
    /// Concurrent callers on the same pair all end up holding the same row
    /// in turn; the loser of the insert race simply reads the winner's row.
    pub async fn get_or_create_locked(
        &self,
        employee_id: i32,
        training_id: i32,
    ) -> Result<(enrollment::Model, bool), DbErr> {
        let candidate = enrollment::ActiveModel {
            employee_id: Set(employee_id),
            training_id: Set(training_id),
            status: Set(EnrollmentStatus::NotStarted),
            percentage: Set(0),
            started_at: Set(None),
            completed_at: Set(None),
            ..Default::default()
        };

        let inserted = enrollment::Entity::insert(candidate)
            .on_conflict(
                OnConflict::columns([
                    enrollment::Column::EmployeeId,
                    enrollment::Column::TrainingId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        let backend = self.conn.get_database_backend();
        let enrollment = locked_pair_query(employee_id, training_id, backend)
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "Enrollment for employee {employee_id} and training {training_id} vanished after insert"
                ))
            })?;

        Ok((enrollment, inserted > 0))
    }

    pub async fn save_progress(
        &self,
        enrollment: enrollment::Model,
        progress: EnrollmentProgress,
    ) -> Result<enrollment::Model, DbErr> {
        if EnrollmentProgress::from(&enrollment) == progress {
            return Ok(enrollment);
        }

        let mut active_enrollment: enrollment::ActiveModel = enrollment.into();
        active_enrollment.status = Set(progress.status);
        active_enrollment.percentage = Set(progress.percentage);
        active_enrollment.started_at = Set(progress.started_at);
        active_enrollment.completed_at = Set(progress.completed_at);

        active_enrollment.update(self.conn).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::QueryTrait;

    use super::*;

    #[test]
    fn postgres_lookup_locks_the_row() {
        let sql = locked_pair_query(7, 3, DbBackend::Postgres)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("FOR UPDATE"), "{sql}");
        assert!(sql.contains(r#""employee_id" = 7"#), "{sql}");
        assert!(sql.contains(r#""training_id" = 3"#), "{sql}");
    }

    #[test]
    fn sqlite_lookup_has_no_lock_clause() {
        let sql = locked_pair_query(7, 3, DbBackend::Sqlite)
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(!sql.contains("FOR UPDATE"), "{sql}");
    }
}
