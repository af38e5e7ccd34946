use sea_orm_migration::prelude::*;

use crate::m20250901_080000_create_catalog_tables::{Modules, Trainings};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Employees::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::Administrator)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Status values: not_started | in_progress | completed
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::TrainingId).integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string_len(20)
                            .not_null()
                            .default("not_started"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Percentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Enrollments::StartedAt).timestamp().null())
                    .col(ColumnDef::new(Enrollments::CompletedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_employee")
                            .from_tbl(Enrollments::Table)
                            .from_col(Enrollments::EmployeeId)
                            .to_tbl(Employees::Table)
                            .to_col(Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_training")
                            .from_tbl(Enrollments::Table)
                            .from_col(Enrollments::TrainingId)
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
                    .name("uq_enrollments_employee_training")
                    .table(Enrollments::Table)
                    .col(Enrollments::EmployeeId)
                    .col(Enrollments::TrainingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ModuleProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModuleProgress::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModuleProgress::EnrollmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ModuleProgress::ModuleId).integer().not_null())
                    .col(
                        ColumnDef::new(ModuleProgress::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ModuleProgress::CompletedAt)
                            .timestamp()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_progress_enrollment")
                            .from_tbl(ModuleProgress::Table)
                            .from_col(ModuleProgress::EnrollmentId)
                            .to_tbl(Enrollments::Table)
                            .to_col(Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_progress_module")
                            .from_tbl(ModuleProgress::Table)
                            .from_col(ModuleProgress::ModuleId)
                            .to_tbl(Modules::Table)
                            .to_col(Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_module_progress_enrollment_module")
                    .table(ModuleProgress::Table)
                    .col(ModuleProgress::EnrollmentId)
                    .col(ModuleProgress::ModuleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModuleProgress::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Email,
    Administrator,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    EmployeeId,
    TrainingId,
    Status,
    Percentage,
    StartedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum ModuleProgress {
    Table,
    Id,
    EnrollmentId,
    ModuleId,
    Completed,
    CompletedAt,
}
