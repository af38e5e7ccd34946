//! `SeaORM` Entity for enrollments table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EnrollmentStatus;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "enrollments"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub employee_id: i32,
    pub training_id: i32,
    pub status: EnrollmentStatus,
    pub percentage: i32,
    pub started_at: Option<DateTime>,
    pub completed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    EmployeeId,
    TrainingId,
    Status,
    Percentage,
    StartedAt,
    CompletedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Id,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = i32;
    fn auto_increment() -> bool {
        true
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Employee,
    Training,
    ModuleProgress,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::EmployeeId => ColumnType::Integer.def(),
            Self::TrainingId => ColumnType::Integer.def(),
            Self::Status => EnrollmentStatus::db_type(),
            Self::Percentage => ColumnType::Integer.def(),
            Self::StartedAt => ColumnType::DateTime.def().null(),
            Self::CompletedAt => ColumnType::DateTime.def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Employee => Entity::belongs_to(super::employee::Entity)
                .from(Column::EmployeeId)
                .to(super::employee::Column::Id)
                .into(),
            Self::Training => Entity::belongs_to(super::training::Entity)
                .from(Column::TrainingId)
                .to(super::training::Column::Id)
                .into(),
            Self::ModuleProgress => Entity::has_many(super::module_progress::Entity).into(),
        }
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::training::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Training.def()
    }
}

impl Related<super::module_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleProgress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
