//! `SeaORM` entities

pub mod department;
pub mod employee;
pub mod enrollment;
pub mod module;
pub mod module_progress;
pub mod sea_orm_active_enums;
pub mod training;
