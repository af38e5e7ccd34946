pub mod department_repository;
pub mod employee_repository;
pub mod enrollment_repository;
pub mod module_progress_repository;
pub mod module_repository;
pub mod training_repository;

pub use department_repository::{DepartmentRepository, DepartmentUpdate};
pub use employee_repository::{EmployeeRepository, EmployeeUpdate};
pub use enrollment_repository::EnrollmentRepository;
pub use module_progress_repository::ModuleProgressRepository;
pub use module_repository::{ModuleRepository, ModuleUpdate, NewModule};
pub use training_repository::{NewTraining, TrainingRepository, TrainingUpdate};
