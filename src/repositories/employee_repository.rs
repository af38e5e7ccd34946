use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::employee;

pub struct EmployeeRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EmployeeRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_all(&self) -> Result<Vec<employee::Model>, DbErr> {
        employee::Entity::find()
            .order_by_asc(employee::Column::Name)
            .all(self.conn)
            .await
    }

    pub async fn find_by_id(&self, employee_id: i32) -> Result<Option<employee::Model>, DbErr> {
        employee::Entity::find_by_id(employee_id)
            .one(self.conn)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<employee::Model>, DbErr> {
        employee::Entity::find()
            .filter(employee::Column::Email.eq(email))
            .one(self.conn)
            .await
    }

    /// Inserts the employee unless the email is taken, then reads the
    /// surviving row. Returns `true` when this call created it.
    pub async fn get_or_create(
        &self,
        email: &str,
        name: &str,
    ) -> Result<(employee::Model, bool), DbErr> {
        let candidate = employee::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            administrator: Set(false),
            ..Default::default()
        };

        let inserted = employee::Entity::insert(candidate)
            .on_conflict(
                OnConflict::column(employee::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        let employee = self.find_by_email(email).await?.ok_or_else(|| {
            DbErr::RecordNotFound(format!("Employee {email} vanished after insert"))
        })?;

        Ok((employee, inserted > 0))
    }

    pub async fn update(
        &self,
        employee_id: i32,
        updates: EmployeeUpdate,
    ) -> Result<Option<employee::Model>, DbErr> {
        let Some(employee) = self.find_by_id(employee_id).await? else {
            return Ok(None);
        };

        if updates.name.is_none() && updates.administrator.is_none() {
            return Ok(Some(employee));
        }

        let mut active_employee: employee::ActiveModel = employee.into();

        if let Some(name) = updates.name {
            active_employee.name = Set(name);
        }
        if let Some(administrator) = updates.administrator {
            active_employee.administrator = Set(administrator);
        }

        let result = active_employee.update(self.conn).await?;
        Ok(Some(result))
    }
}

#[derive(Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub administrator: Option<bool>,
}
