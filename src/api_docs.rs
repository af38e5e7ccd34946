use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes::{departments, employees, health, modules, public, trainings};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::route::health,
        public::route::login_email,
        public::route::start_training,
        public::route::complete_module,
        public::route::get_catalog,
        public::route::get_my_progress,
        departments::route::create_department,
        departments::route::get_all_departments,
        departments::route::get_department,
        departments::route::update_department,
        departments::route::delete_department,
        trainings::route::create_training,
        trainings::route::get_all_trainings,
        trainings::route::get_training,
        trainings::route::update_training,
        trainings::route::delete_training,
        modules::route::create_module,
        modules::route::get_all_modules,
        modules::route::get_module,
        modules::route::update_module,
        modules::route::delete_module,
        employees::route::get_all_employees,
        employees::route::get_employee,
        employees::route::update_employee,
        employees::route::get_employee_trainings,
    ),
    components(schemas(
        crate::entities::sea_orm_active_enums::EnrollmentStatus,
        crate::entities::sea_orm_active_enums::VideoSource,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Public", description = "Employee-facing training flow"),
        (name = "Departments", description = "Department administration"),
        (name = "Trainings", description = "Training administration"),
        (name = "Modules", description = "Module administration"),
        (name = "Employees", description = "Employee administration")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/v1/public/complete-module"));
        assert!(doc.paths.paths.contains_key("/api/v1/employees/{employee_id}/trainings"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
