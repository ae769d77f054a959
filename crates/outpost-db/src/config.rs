use std::env;

/// Database configuration.
///
/// Reads from the `OUTPOST_DATABASE_URL` environment variable, falling back
/// to `postgresql://localhost:5432/outpost` when unset. Connection URLs may
/// carry a query string (`?sslmode=require` and friends); the helpers below
/// keep it intact.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The default connection URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/outpost";

    /// Build a config from the environment.
    ///
    /// Priority: `OUTPOST_DATABASE_URL` env var, then the compile-time default.
    pub fn from_env() -> Self {
        let database_url =
            env::var("OUTPOST_DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    /// Build a config from an explicit URL (useful for tests and CLI flags).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Extract the database name from the URL, ignoring any query string.
    ///
    /// Returns `None` when the URL has no path segment after the authority
    /// (e.g. `postgresql://localhost:5432`).
    pub fn database_name(&self) -> Option<&str> {
        let base = strip_query(&self.database_url);
        let path = &base[authority_start(base)..];
        let slash = path.find('/')?;
        let name = &path[slash + 1..];
        (!name.is_empty()).then_some(name)
    }

    /// Return a URL pointing at the `postgres` maintenance database on the
    /// same server, preserving any query-string parameters. Used to issue
    /// `CREATE DATABASE` when the target DB does not yet exist.
    pub fn maintenance_url(&self) -> String {
        let base = strip_query(&self.database_url);
        let start = authority_start(base);
        let root = match base[start..].find('/') {
            Some(slash) => &base[..start + slash],
            None => base,
        };
        match self.database_url.split_once('?') {
            Some((_, query)) => format!("{root}/postgres?{query}"),
            None => format!("{root}/postgres"),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn strip_query(url: &str) -> &str {
    match url.split_once('?') {
        Some((base, _)) => base,
        None => url,
    }
}

/// Byte offset of the authority (host) section, past any `scheme://`.
fn authority_start(url: &str) -> usize {
    match url.find("://") {
        Some(i) => i + 3,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url() {
        let cfg = DbConfig::new(DbConfig::DEFAULT_URL);
        assert_eq!(cfg.database_url, "postgresql://localhost:5432/outpost");
        assert_eq!(cfg.database_name(), Some("outpost"));
    }

    #[test]
    fn database_name_ignores_query_string() {
        let cfg = DbConfig::new("postgresql://db.internal:5432/outpost?sslmode=require");
        assert_eq!(cfg.database_name(), Some("outpost"));
    }

    #[test]
    fn database_name_is_none_without_a_path() {
        let cfg = DbConfig::new("postgresql://localhost:5432");
        assert_eq!(cfg.database_name(), None);

        let cfg = DbConfig::new("postgresql://localhost:5432/");
        assert_eq!(cfg.database_name(), None);
    }

    #[test]
    fn maintenance_url_swaps_the_database() {
        let cfg = DbConfig::new("postgresql://localhost:5432/outpost");
        assert_eq!(
            cfg.maintenance_url(),
            "postgresql://localhost:5432/postgres"
        );
    }

    #[test]
    fn maintenance_url_keeps_query_parameters() {
        let cfg = DbConfig::new("postgresql://db.internal:5432/outpost?sslmode=require");
        assert_eq!(
            cfg.maintenance_url(),
            "postgresql://db.internal:5432/postgres?sslmode=require"
        );
    }

    #[test]
    fn maintenance_url_without_a_path_appends_one() {
        let cfg = DbConfig::new("postgresql://localhost:5432");
        assert_eq!(
            cfg.maintenance_url(),
            "postgresql://localhost:5432/postgres"
        );
    }
}
