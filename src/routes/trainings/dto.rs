use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTrainingRequest {
    /// Left empty to get the next `TRN-0000` code
    #[schema(example = "FISC-001")]
    pub code: Option<String>,

    #[schema(example = "Tax Assessment Routines")]
    pub name: String,

    #[schema(example = "Carla Andrade")]
    pub responsible: String,

    pub department_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTrainingRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub responsible: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrainingFilter {
    /// Only trainings of this department
    pub department_id: Option<i32>,
}
