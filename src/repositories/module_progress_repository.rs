use chrono::NaiveDateTime;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::entities::{module, module_progress};

/// Lookup of the (enrollment, module) row, `FOR UPDATE` where supported.
pub(crate) fn locked_progress_query(
    enrollment_id: i32,
    module_id: i32,
    backend: DbBackend,
) -> Select<module_progress::Entity> {
    let query = module_progress::Entity::find()
        .filter(module_progress::Column::EnrollmentId.eq(enrollment_id))
        .filter(module_progress::Column::ModuleId.eq(module_id));

    match backend {
        DbBackend::Sqlite => query,
        _ => query.lock_exclusive(),
    }
}

pub struct ModuleProgressRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ModuleProgressRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_enrollments(
        &self,
        enrollment_ids: Vec<i32>,
    ) -> Result<Vec<module_progress::Model>, DbErr> {
        if enrollment_ids.is_empty() {
            return Ok(Vec::new());
        }

        module_progress::Entity::find()
            .filter(module_progress::Column::EnrollmentId.is_in(enrollment_ids))
            .order_by_asc(module_progress::Column::Id)
            .all(self.conn)
            .await
    }

    /// Get-or-create on (enrollment, module); the row stays locked until the
    /// enclosing transaction ends.
    pub async fn get_or_create_locked(
        &self,
        enrollment_id: i32,
        module_id: i32,
    ) -> Result<(module_progress::Model, bool), DbErr> {
        let candidate = module_progress::ActiveModel {
            enrollment_id: Set(enrollment_id),
            module_id: Set(module_id),
            completed: Set(false),
            completed_at: Set(None),
            ..Default::default()
        };

        let inserted = module_progress::Entity::insert(candidate)
            .on_conflict(
                OnConflict::columns([
                    module_progress::Column::EnrollmentId,
                    module_progress::Column::ModuleId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        let backend = self.conn.get_database_backend();
        let progress = locked_progress_query(enrollment_id, module_id, backend)
            .one(self.conn)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "Progress of module {module_id} in enrollment {enrollment_id} vanished after insert"
                ))
            })?;

        Ok((progress, inserted > 0))
    }

    pub async fn set_completed(
        &self,
        progress: module_progress::Model,
        completed: bool,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<module_progress::Model, DbErr> {
        if progress.completed == completed && progress.completed_at == completed_at {
            return Ok(progress);
        }

        let mut active_progress: module_progress::ActiveModel = progress.into();
        active_progress.completed = Set(completed);
        active_progress.completed_at = Set(completed_at);

        active_progress.update(self.conn).await
    }

    /// Completed rows of the enrollment whose module belongs to `training_id`.
    pub async fn count_completed(&self, enrollment_id: i32, training_id: i32) -> Result<u64, DbErr> {
        module_progress::Entity::find()
            .inner_join(module::Entity)
            .filter(module_progress::Column::EnrollmentId.eq(enrollment_id))
            .filter(module_progress::Column::Completed.eq(true))
            .filter(module::Column::TrainingId.eq(training_id))
            .count(self.conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::QueryTrait;

    use super::*;

    #[test]
    fn postgres_lookup_locks_the_row() {
        let sql = locked_progress_query(11, 5, DbBackend::Postgres)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("FOR UPDATE"), "{sql}");
        assert!(sql.contains(r#""enrollment_id" = 11"#), "{sql}");
        assert!(sql.contains(r#""module_id" = 5"#), "{sql}");
    }

    #[test]
    fn sqlite_lookup_has_no_lock_clause() {
        let sql = locked_progress_query(11, 5, DbBackend::Sqlite)
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(!sql.contains("FOR UPDATE"), "{sql}");
    }
}
