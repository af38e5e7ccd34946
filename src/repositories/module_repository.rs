use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{module, sea_orm_active_enums::VideoSource};

pub struct ModuleRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ModuleRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Modules in insertion order, optionally restricted to one training.
    pub async fn find_all(&self, training_id: Option<i32>) -> Result<Vec<module::Model>, DbErr> {
        let mut query = module::Entity::find();

        if let Some(training_id) = training_id {
            query = query.filter(module::Column::TrainingId.eq(training_id));
        }

        query.order_by_asc(module::Column::Id).all(self.conn).await
    }

    pub async fn find_by_id(&self, module_id: i32) -> Result<Option<module::Model>, DbErr> {
        module::Entity::find_by_id(module_id).one(self.conn).await
    }

    pub async fn find_by_title(
        &self,
        training_id: i32,
        title: &str,
    ) -> Result<Option<module::Model>, DbErr> {
        module::Entity::find()
            .filter(module::Column::TrainingId.eq(training_id))
            .filter(module::Column::Title.eq(title))
            .one(self.conn)
            .await
    }

    pub async fn count_by_training(&self, training_id: i32) -> Result<u64, DbErr> {
        module::Entity::find()
            .filter(module::Column::TrainingId.eq(training_id))
            .count(self.conn)
            .await
    }

    pub async fn create(&self, new_module: NewModule) -> Result<module::Model, DbErr> {
        let module_model = module::ActiveModel {
            training_id: Set(new_module.training_id),
            title: Set(new_module.title),
            description: Set(new_module.description),
            video_embed: Set(new_module.video_embed),
            video_source: Set(new_module.video_source),
            ..Default::default()
        };

        module_model.insert(self.conn).await
    }

    pub async fn update(
        &self,
        module_id: i32,
        updates: ModuleUpdate,
    ) -> Result<Option<module::Model>, DbErr> {
        let Some(module) = self.find_by_id(module_id).await? else {
            return Ok(None);
        };

        if updates.is_empty() {
            return Ok(Some(module));
        }

        let mut active_module: module::ActiveModel = module.into();

        if let Some(training_id) = updates.training_id {
            active_module.training_id = Set(training_id);
        }
        if let Some(title) = updates.title {
            active_module.title = Set(title);
        }
        if let Some(description) = updates.description {
            active_module.description = Set(description);
        }
        if let Some(video_embed) = updates.video_embed {
            active_module.video_embed = Set(video_embed);
        }
        if let Some(video_source) = updates.video_source {
            active_module.video_source = Set(video_source);
        }

        let result = active_module.update(self.conn).await?;
        Ok(Some(result))
    }

    pub async fn delete(&self, module_id: i32) -> Result<bool, DbErr> {
        let result = module::Entity::delete_by_id(module_id)
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

pub struct NewModule {
    pub training_id: i32,
    pub title: String,
    pub description: String,
    pub video_embed: String,
    pub video_source: VideoSource,
}

#[derive(Default)]
pub struct ModuleUpdate {
    pub training_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_embed: Option<String>,
    pub video_source: Option<VideoSource>,
}

impl ModuleUpdate {
    fn is_empty(&self) -> bool {
        self.training_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.video_embed.is_none()
            && self.video_source.is_none()
    }
}
