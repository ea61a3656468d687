// connexion BD + migrations

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// Ouvre le pool de connexions et applique les migrations en attente.
/// Le handle est créé une fois dans main puis injecté via web::Data.
pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Base SQLite en mémoire, migrée, pour les tests
#[cfg(test)]
pub async fn connect_test_db() -> DatabaseConnection {
    // Une seule connexion: chaque connexion SQLite en mémoire a sa propre base
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}
