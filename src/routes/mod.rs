pub mod departments;
pub mod employees;
pub mod health;
pub mod modules;
pub mod public;
pub mod trainings;
