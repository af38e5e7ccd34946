use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

use crate::config::{TRAINING_CODE_MAX_ATTEMPTS, TRAINING_CODE_PREFIX};
use crate::entities::training;

/// `TRN-0001`, `TRN-0042`, ...
pub fn format_training_code(sequence: i32) -> String {
    format!("{TRAINING_CODE_PREFIX}-{sequence:04}")
}

fn non_blank(code: Option<String>) -> Option<String> {
    code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

pub struct TrainingRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> TrainingRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_all(
        &self,
        department_id: Option<i32>,
    ) -> Result<Vec<training::Model>, DbErr> {
        let mut query = training::Entity::find();

        if let Some(department_id) = department_id {
            query = query.filter(training::Column::DepartmentId.eq(department_id));
        }

        query
            .order_by_asc(training::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn find_by_id(&self, training_id: i32) -> Result<Option<training::Model>, DbErr> {
        training::Entity::find_by_id(training_id)
            .one(self.conn)
            .await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<training::Model>, DbErr> {
        training::Entity::find()
            .filter(training::Column::Code.eq(code))
            .one(self.conn)
            .await
    }

    /// Next sequential code: one past the highest id that carries a code.
    /// Deleted trainings leave gaps that are never refilled.
    pub async fn next_code(&self) -> Result<String, DbErr> {
        let last = training::Entity::find()
            .filter(training::Column::Code.ne(""))
            .order_by_desc(training::Column::Id)
            .one(self.conn)
            .await?;

        Ok(format_training_code(last.map_or(0, |t| t.id) + 1))
    }

    /// Inserts a training, assigning a sequential code when none was given.
    ///
    /// Two concurrent creations may compute the same code; the loser of the
    /// unique index retries with a fresh one.
    pub async fn create(
        &self,
        new_training: NewTraining,
        today: NaiveDate,
    ) -> Result<training::Model, DbErr> {
        let explicit_code = non_blank(new_training.code);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let code = match &explicit_code {
                Some(code) => code.clone(),
                None => self.next_code().await?,
            };

            let training_model = training::ActiveModel {
                code: Set(code.clone()),
                name: Set(new_training.name.clone()),
                responsible: Set(new_training.responsible.clone()),
                updated_on: Set(today),
                department_id: Set(new_training.department_id),
                ..Default::default()
            };

            match training_model.insert(self.conn).await {
                Ok(created) => return Ok(created),
                Err(err)
                    if explicit_code.is_none()
                        && attempt < TRAINING_CODE_MAX_ATTEMPTS
                        && matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
                {
                    tracing::debug!("Training code {} already taken, retrying", code);
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn update(
        &self,
        training_id: i32,
        updates: TrainingUpdate,
        today: NaiveDate,
    ) -> Result<Option<training::Model>, DbErr> {
        let Some(training) = self.find_by_id(training_id).await? else {
            return Ok(None);
        };

        let mut active_training: training::ActiveModel = training.into();

        if let Some(code) = non_blank(updates.code) {
            active_training.code = Set(code);
        }
        if let Some(name) = updates.name {
            active_training.name = Set(name);
        }
        if let Some(responsible) = updates.responsible {
            active_training.responsible = Set(responsible);
        }
        if let Some(department_id) = updates.department_id {
            active_training.department_id = Set(department_id);
        }

        active_training.updated_on = Set(today);

        let result = active_training.update(self.conn).await?;
        Ok(Some(result))
    }

    pub async fn delete(&self, training_id: i32) -> Result<bool, DbErr> {
        let result = training::Entity::delete_by_id(training_id)
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

pub struct NewTraining {
    pub code: Option<String>,
    pub name: String,
    pub responsible: String,
    pub department_id: i32,
}

#[derive(Default)]
pub struct TrainingUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub responsible: Option<String>,
    pub department_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(format_training_code(1), "TRN-0001");
        assert_eq!(format_training_code(42), "TRN-0042");
        assert_eq!(format_training_code(12345), "TRN-12345");
    }

    #[test]
    fn blank_codes_count_as_missing() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" FISC-001 ".to_string())), Some("FISC-001".to_string()));
    }
}
