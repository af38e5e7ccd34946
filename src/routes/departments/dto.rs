use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::department;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDepartmentRequest {
    #[schema(example = "Tax Department")]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDepartmentRequest {
    #[schema(example = "Accounting Department")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: i32,
    pub name: String,
}

impl From<department::Model> for DepartmentResponse {
    fn from(d: department::Model) -> Self {
        Self {
            id: d.id,
            name: d.name,
        }
    }
}
