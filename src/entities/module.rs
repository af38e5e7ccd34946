//! `SeaORM` Entity for modules table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::VideoSource;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "modules"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub training_id: i32,
    pub title: String,
    pub description: String,
    pub video_embed: String,
    pub video_source: VideoSource,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    TrainingId,
    Title,
    Description,
    VideoEmbed,
    VideoSource,
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
    Training,
    ModuleProgress,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::TrainingId => ColumnType::Integer.def(),
            Self::Title => ColumnType::String(StringLen::N(255)).def(),
            Self::Description => ColumnType::Text.def(),
            Self::VideoEmbed => ColumnType::Text.def(),
            Self::VideoSource => VideoSource::db_type(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Training => Entity::belongs_to(super::training::Entity)
                .from(Column::TrainingId)
                .to(super::training::Column::Id)
                .into(),
            Self::ModuleProgress => Entity::has_many(super::module_progress::Entity).into(),
        }
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
