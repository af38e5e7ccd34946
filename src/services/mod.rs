pub mod catalog;
pub mod enrollment;
pub mod identity;
pub mod progress;

pub use catalog::CatalogProjection;
pub use enrollment::{EnrollmentEngine, ModuleCompletion};
pub use identity::IdentityResolver;
