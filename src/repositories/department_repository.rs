use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::department;

pub struct DepartmentRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> DepartmentRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_all(&self) -> Result<Vec<department::Model>, DbErr> {
        department::Entity::find()
            .order_by_asc(department::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn find_by_id(&self, department_id: i32) -> Result<Option<department::Model>, DbErr> {
        department::Entity::find_by_id(department_id)
            .one(self.conn)
            .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<department::Model>, DbErr> {
        department::Entity::find()
            .filter(department::Column::Name.eq(name))
            .one(self.conn)
            .await
    }

    pub async fn create(&self, name: String) -> Result<department::Model, DbErr> {
        let department_model = department::ActiveModel {
            name: Set(name),
            ..Default::default()
        };

        department_model.insert(self.conn).await
    }

    pub async fn update(
        &self,
        department_id: i32,
        updates: DepartmentUpdate,
    ) -> Result<Option<department::Model>, DbErr> {
        let Some(department) = self.find_by_id(department_id).await? else {
            return Ok(None);
        };

        let Some(name) = updates.name else {
            return Ok(Some(department));
        };

        let mut active_model: department::ActiveModel = department.into();
        active_model.name = Set(name);

        let result = active_model.update(self.conn).await?;
        Ok(Some(result))
    }

    /// Deletes the department and, by cascade, its trainings. Returns `false`
    /// when nothing matched.
    pub async fn delete(&self, department_id: i32) -> Result<bool, DbErr> {
        let result = department::Entity::delete_by_id(department_id)
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

pub struct DepartmentUpdate {
    pub name: Option<String>,
}
