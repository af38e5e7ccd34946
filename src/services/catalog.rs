//! Read-only projections: the department tree and per-employee progress.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::sea_orm_active_enums::{EnrollmentStatus, VideoSource};
use crate::entities::{department, module, training};
use crate::error::TrainingResult;
use crate::repositories::{
    DepartmentRepository, EnrollmentRepository, ModuleProgressRepository, ModuleRepository,
    TrainingRepository,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleNode {
    pub id: i32,
    pub training_id: i32,
    pub title: String,
    pub description: String,
    pub video_embed: String,
    pub video_source: VideoSource,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrainingNode {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub responsible: String,
    pub updated_on: NaiveDate,
    pub department_id: i32,
    pub modules: Vec<ModuleNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentNode {
    pub id: i32,
    pub name: String,
    pub trainings: Vec<TrainingNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentSummary {
    pub training_id: i32,
    pub status: EnrollmentStatus,
    pub percentage: i32,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleProgressSummary {
    pub module_id: i32,
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressSnapshot {
    pub enrollments: Vec<EnrollmentSummary>,
    pub modules: Vec<ModuleProgressSummary>,
}

/// One line of an employee's training history.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeTraining {
    pub training_id: i32,
    pub name: String,
    pub status: EnrollmentStatus,
    pub percentage: i32,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl From<module::Model> for ModuleNode {
    fn from(m: module::Model) -> Self {
        Self {
            id: m.id,
            training_id: m.training_id,
            title: m.title,
            description: m.description,
            video_embed: m.video_embed,
            video_source: m.video_source,
        }
    }
}

impl TrainingNode {
    pub fn new(t: training::Model, modules: Vec<module::Model>) -> Self {
        Self {
            id: t.id,
            code: t.code,
            name: t.name,
            responsible: t.responsible,
            updated_on: t.updated_on,
            department_id: t.department_id,
            modules: modules.into_iter().map(ModuleNode::from).collect(),
        }
    }
}

/// Groups `trainings` and `modules` under `departments`, keeping each list
/// in the order it was given.
pub fn assemble_tree(
    departments: Vec<department::Model>,
    trainings: Vec<training::Model>,
    modules: Vec<module::Model>,
) -> Vec<DepartmentNode> {
    let mut modules_by_training: HashMap<i32, Vec<module::Model>> = HashMap::new();
    for m in modules {
        modules_by_training.entry(m.training_id).or_default().push(m);
    }

    let mut trainings_by_department: HashMap<i32, Vec<TrainingNode>> = HashMap::new();
    for t in trainings {
        let own_modules = modules_by_training.remove(&t.id).unwrap_or_default();
        trainings_by_department
            .entry(t.department_id)
            .or_default()
            .push(TrainingNode::new(t, own_modules));
    }

    departments
        .into_iter()
        .map(|d| DepartmentNode {
            trainings: trainings_by_department.remove(&d.id).unwrap_or_default(),
            id: d.id,
            name: d.name,
        })
        .collect()
}

pub struct CatalogProjection<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CatalogProjection<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn catalog(&self) -> TrainingResult<Vec<DepartmentNode>> {
        let departments = DepartmentRepository::new(self.db).find_all().await?;
        let trainings = TrainingRepository::new(self.db).find_all(None).await?;
        let modules = ModuleRepository::new(self.db).find_all(None).await?;

        Ok(assemble_tree(departments, trainings, modules))
    }

    pub async fn my_progress(&self, employee_id: i32) -> TrainingResult<ProgressSnapshot> {
        let enrollments = EnrollmentRepository::new(self.db)
            .find_by_employee(employee_id)
            .await?;
        let enrollment_ids = enrollments.iter().map(|e| e.id).collect();
        let rows = ModuleProgressRepository::new(self.db)
            .find_by_enrollments(enrollment_ids)
            .await?;

        Ok(ProgressSnapshot {
            enrollments: enrollments
                .into_iter()
                .map(|e| EnrollmentSummary {
                    training_id: e.training_id,
                    status: e.status,
                    percentage: e.percentage,
                    started_at: e.started_at,
                    completed_at: e.completed_at,
                })
                .collect(),
            modules: rows
                .into_iter()
                .map(|p| ModuleProgressSummary {
                    module_id: p.module_id,
                    completed: p.completed,
                })
                .collect(),
        })
    }

    /// Most recently started first; never-started enrollments go last.
    pub async fn employee_trainings(
        &self,
        employee_id: i32,
    ) -> TrainingResult<Vec<EmployeeTraining>> {
        let rows = EnrollmentRepository::new(self.db)
            .find_by_employee_with_training(employee_id)
            .await?;

        let mut history: Vec<EmployeeTraining> = rows
            .into_iter()
            .filter_map(|(e, t)| {
                t.map(|t| EmployeeTraining {
                    training_id: t.id,
                    name: t.name,
                    status: e.status,
                    percentage: e.percentage,
                    started_at: e.started_at,
                    completed_at: e.completed_at,
                })
            })
            .collect();

        history.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_row(id: i32, department_id: i32) -> training::Model {
        training::Model {
            id,
            code: format!("TRN-{id:04}"),
            name: format!("Training {id}"),
            responsible: "Carla Andrade".to_string(),
            updated_on: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            department_id,
        }
    }

    fn module_row(id: i32, training_id: i32) -> module::Model {
        module::Model {
            id,
            training_id,
            title: format!("Module {id}"),
            description: String::new(),
            video_embed: String::new(),
            video_source: VideoSource::Youtube,
        }
    }

    #[test]
    fn tree_groups_and_keeps_order() {
        let departments = vec![
            department::Model {
                id: 1,
                name: "Tax".to_string(),
            },
            department::Model {
                id: 2,
                name: "Accounting".to_string(),
            },
            department::Model {
                id: 3,
                name: "Empty".to_string(),
            },
        ];
        let trainings = vec![training_row(10, 1), training_row(11, 2), training_row(12, 1)];
        let modules = vec![module_row(100, 10), module_row(101, 12), module_row(102, 10)];

        let tree = assemble_tree(departments, trainings, modules);

        assert_eq!(tree.len(), 3);
        let tax: Vec<i32> = tree[0].trainings.iter().map(|t| t.id).collect();
        assert_eq!(tax, vec![10, 12]);
        let first: Vec<i32> = tree[0].trainings[0].modules.iter().map(|m| m.id).collect();
        assert_eq!(first, vec![100, 102]);
        assert_eq!(tree[1].trainings[0].id, 11);
        assert!(tree[1].trainings[0].modules.is_empty());
        assert!(tree[2].trainings.is_empty());
    }
}
