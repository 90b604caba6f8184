#[cfg(test)]
pub mod test_utils {
    use domain::accounts::{NewAccount, create_account};
    use migration::{Migrator, MigratorTrait};
    use model::entities::account;
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment
    /// variable, defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create a migrated database with test tracing enabled
    pub async fn setup_test_env() -> DatabaseConnection {
        let _ = init_test_tracing();
        setup_test_db().await
    }

    /// Register an account through the real registration path
    pub async fn register(db: &DatabaseConnection, name: &str, email: &str) -> account::Model {
        create_account(
            db,
            NewAccount {
                name: name.to_string(),
                email: email.to_string(),
                password: "foobar".to_string(),
                password_confirmation: "foobar".to_string(),
            },
        )
        .await
        .expect("test account should be valid")
    }
}
