//! Sea-ORM migrations for chirp-store database schema

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_messages_table;
mod m20250301_000003_create_mutes_table;
mod m20250310_000001_add_user_counters;
mod m20250310_000002_add_username_index;
mod m20250310_000003_create_follows_table;
mod m20250310_000004_create_notifications_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_messages_table::Migration),
            Box::new(m20250301_000003_create_mutes_table::Migration),
            Box::new(m20250310_000001_add_user_counters::Migration),
            Box::new(m20250310_000002_add_username_index::Migration),
            Box::new(m20250310_000003_create_follows_table::Migration),
            Box::new(m20250310_000004_create_notifications_table::Migration),
        ]
    }
}
