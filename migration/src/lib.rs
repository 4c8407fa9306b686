pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_users;
mod m20260105_000002_create_articles;
mod m20260106_000001_create_marketplace;
mod m20260112_000001_create_leads;
mod m20260112_000002_create_student_projects;
mod m20260120_000001_create_project_milestones;
mod m20260127_000001_add_repository_link;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_users::Migration),
            Box::new(m20260105_000002_create_articles::Migration),
            Box::new(m20260106_000001_create_marketplace::Migration),
            Box::new(m20260112_000001_create_leads::Migration),
            Box::new(m20260112_000002_create_student_projects::Migration),
            Box::new(m20260120_000001_create_project_milestones::Migration),
            Box::new(m20260127_000001_add_repository_link::Migration),
        ]
    }
}
