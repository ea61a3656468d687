use sea_orm_migration::prelude::*;

mod m20250101_000001_users_and_companies;
mod m20250101_000002_visitors_and_visits;
mod m20250101_000003_email_verification_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_users_and_companies::Migration),
            Box::new(m20250101_000002_visitors_and_visits::Migration),
            Box::new(m20250101_000003_email_verification_tokens::Migration),
        ]
    }
}
