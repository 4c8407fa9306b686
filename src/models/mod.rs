pub mod article;
pub mod dashboard;
pub mod discovery;
pub mod identity;
pub mod lead;
pub mod marketplace;
pub mod student_project;
