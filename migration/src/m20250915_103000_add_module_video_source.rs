use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // youtube | canva | iframe
        manager
            .alter_table(
                Table::alter()
                    .table(Modules::Table)
                    .add_column(
                        ColumnDef::new(Modules::VideoSource)
                            .string_len(20)
                            .not_null()
                            .default("youtube"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Modules::Table)
                    .drop_column(Modules::VideoSource)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Modules {
    Table,
    VideoSource,
}
