/// Resolve the database URL from the environment, falling back to a
/// local SQLite file. `.env` is honored when present.
pub fn database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://chirp.db?mode=rwc".to_string())
}
