pub mod appointments;
pub mod articles;
pub mod discovery;
pub mod identity;
pub mod leads_management;
pub mod marketplace;
pub mod upload;
