//! Maps an authenticated caller's email to an employee record, creating the
//! record on first contact.

use sea_orm::DatabaseConnection;

use crate::entities::employee;
use crate::error::{TrainingError, TrainingResult};
use crate::repositories::EmployeeRepository;

/// Trims and lower-cases `raw`, rejecting anything that is not
/// `local@domain` without whitespace.
pub fn normalize_email(raw: &str) -> TrainingResult<String> {
    let email = raw.trim().to_lowercase();

    if email.is_empty() {
        return Err(TrainingError::validation("email", "Email is required"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(TrainingError::validation(
            "email",
            "Email must not contain whitespace",
        ));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(TrainingError::validation(
            "email",
            format!("'{}' is not a valid email address", raw.trim()),
        )),
    }
}

/// Default display name: everything before the first `@`.
pub fn local_part(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

pub struct IdentityResolver<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn resolve(&self, caller_email: &str) -> TrainingResult<employee::Model> {
        self.resolve_with_name(caller_email, None).await
    }

    /// Like [`resolve`](Self::resolve), but a non-blank `display_name` is
    /// used instead of the local part when the employee has to be created.
    /// Existing employees keep their name.
    pub async fn resolve_with_name(
        &self,
        caller_email: &str,
        display_name: Option<&str>,
    ) -> TrainingResult<employee::Model> {
        let email = normalize_email(caller_email)?;
        let employees = EmployeeRepository::new(self.db);

        if let Some(existing) = employees.find_by_email(&email).await? {
            return Ok(existing);
        }

        let name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| local_part(&email));

        let (employee, created) = employees.get_or_create(&email, name).await?;
        if created {
            tracing::info!(employee_id = employee.id, email = %employee.email, "Provisioned employee");
        }

        Ok(employee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_and_trimmed() {
        assert_eq!(
            normalize_email("  Maria.Silva@Example.COM ").unwrap(),
            "maria.silva@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "   ", "no-at-sign", "@example.com", "maria@", "ma ria@example.com"] {
            match normalize_email(raw) {
                Err(TrainingError::Validation { field, .. }) => assert_eq!(field, "email"),
                other => panic!("expected validation error for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn local_part_stops_at_first_at() {
        assert_eq!(local_part("carla.andrade@example.com"), "carla.andrade");
        assert_eq!(local_part("odd@name@example.com"), "odd");
    }
}
