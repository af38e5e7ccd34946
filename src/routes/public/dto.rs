use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::sea_orm_active_enums::EnrollmentStatus;
use crate::entities::{enrollment, module_progress};
use crate::services::ModuleCompletion;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginEmailRequest {
    #[schema(example = "maria.silva@example.com")]
    pub email: String,

    /// Used only when the employee does not exist yet
    #[schema(example = "Maria Silva")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StartTrainingRequest {
    pub training_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteModuleRequest {
    pub module_id: i32,
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: i32,
    pub employee_id: i32,
    pub training_id: i32,
    pub status: EnrollmentStatus,
    #[schema(example = 50)]
    pub percentage: i32,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl From<enrollment::Model> for EnrollmentResponse {
    fn from(e: enrollment::Model) -> Self {
        Self {
            id: e.id,
            employee_id: e.employee_id,
            training_id: e.training_id,
            status: e.status,
            percentage: e.percentage,
            started_at: e.started_at,
            completed_at: e.completed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleProgressResponse {
    pub id: i32,
    pub enrollment_id: i32,
    pub module_id: i32,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
}

impl From<module_progress::Model> for ModuleProgressResponse {
    fn from(p: module_progress::Model) -> Self {
        Self {
            id: p.id,
            enrollment_id: p.enrollment_id,
            module_id: p.module_id,
            completed: p.completed,
            completed_at: p.completed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteModuleResponse {
    pub enrollment: EnrollmentResponse,
    pub progress: ModuleProgressResponse,
}

impl From<ModuleCompletion> for CompleteModuleResponse {
    fn from(c: ModuleCompletion) -> Self {
        Self {
            enrollment: c.enrollment.into(),
            progress: c.progress.into(),
        }
    }
}
