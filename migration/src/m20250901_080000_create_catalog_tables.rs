use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trainings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trainings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trainings::Code).string_len(50).not_null())
                    .col(ColumnDef::new(Trainings::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Trainings::Responsible)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trainings::UpdatedOn).date().not_null())
                    .col(ColumnDef::new(Trainings::DepartmentId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainings_department")
                            .from_tbl(Trainings::Table)
                            .from_col(Trainings::DepartmentId)
                            .to_tbl(Departments::Table)
                            .to_col(Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_trainings_code")
                    .table(Trainings::Table)
                    .col(Trainings::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trainings_department_id")
                    .table(Trainings::Table)
                    .col(Trainings::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Modules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Modules::TrainingId).integer().not_null())
                    .col(ColumnDef::new(Modules::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Modules::Description).text().not_null())
                    .col(
                        ColumnDef::new(Modules::VideoEmbed)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_modules_training")
                            .from_tbl(Modules::Table)
                            .from_col(Modules::TrainingId)
                            .to_tbl(Trainings::Table)
                            .to_col(Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_modules_training_id")
                    .table(Modules::Table)
                    .col(Modules::TrainingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Modules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Trainings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Departments {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Trainings {
    Table,
    Id,
    Code,
    Name,
    Responsible,
    UpdatedOn,
    DepartmentId,
}

#[derive(DeriveIden)]
pub(crate) enum Modules {
    Table,
    Id,
    TrainingId,
    Title,
    Description,
    VideoEmbed,
}
