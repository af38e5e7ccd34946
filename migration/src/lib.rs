pub use sea_orm_migration::prelude::*;

mod m20250901_080000_create_catalog_tables;
mod m20250901_081500_create_employee_tables;
mod m20250915_103000_add_module_video_source;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_080000_create_catalog_tables::Migration),
            Box::new(m20250901_081500_create_employee_tables::Migration),
            Box::new(m20250915_103000_add_module_video_source::Migration),
        ]
    }
}
