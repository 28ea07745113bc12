use diesel_migrations::{embed_migrations, EmbeddedMigrations};

// Embed all files under migrations/ (path is relative to crate root)
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn run_migrations(conn: &mut diesel::sqlite::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::MigrationHarness;
    match conn.run_pending_migrations(MIGRATIONS) {
        Ok(_) => Ok(()),
        Err(e) => Err(anyhow::anyhow!(e.to_string())),
    }
}
