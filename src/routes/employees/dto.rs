use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::employee;

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i32,
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "maria.silva@example.com")]
    pub email: String,
    pub administrator: bool,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(e: employee::Model) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            administrator: e.administrator,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    #[schema(example = "Maria Silva")]
    pub name: Option<String>,
    pub administrator: Option<bool>,
}
