use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::error::CommonError;
use libsql::params::IntoParams;
use libsql::{BatchRows, Database, Rows};
use tracing::info;
use url::Url;

/// Map of migration file name to its SQL contents. `BTreeMap` keeps the
/// files in lexicographic (and therefore application) order.
pub type Migrations<'a> = BTreeMap<&'a str, &'a str>;

#[derive(Debug, Clone)]
pub struct Connection(pub libsql::Connection);

impl Connection {
    pub fn new(connection: libsql::Connection) -> Self {
        Self(connection)
    }
}

impl Deref for Connection {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[macro_export]
macro_rules! execute_with_retry {
    ($operation:expr) => {
        execute_with_retry!($operation, 10)
    };
    ($operation:expr, $max_retries:expr) => {{
        async {
            let mut _retries = 0u32;
            let _max_retries: u32 = $max_retries;

            loop {
                match $operation.await {
                    Ok(result) => break Ok(result),
                    Err(err) => {
                        let err_str = err.to_string();
                        if err_str.contains("database is locked") || err_str.contains("SQLITE_BUSY")
                        {
                            tracing::warn!("Database is locked, retrying... {:?}", err);
                            if _retries >= _max_retries {
                                break Err(err);
                            }

                            _retries += 1;

                            let delay_us = 10_000 * (1 << _retries.min(6));
                            tokio::time::sleep(std::time::Duration::from_micros(delay_us)).await;
                        } else {
                            tracing::error!("Error executing with retry: {:?}", err);
                            break Err(err);
                        }
                    }
                }
            }
        }
        .await
    }};
}

impl Connection {
    /// Execute a statement, retrying on SQLITE_BUSY, returning the number
    /// of rows changed.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> libsql::Result<u64> {
        tracing::trace!("executing `{}`", sql);
        let params = params.into_params()?;
        execute_with_retry!(self.0.execute(sql, params.clone()), 10)
    }

    /// Execute a batch of statements.
    pub async fn execute_batch(&self, sql: &str) -> libsql::Result<BatchRows> {
        tracing::trace!("executing batch `{}`", sql);
        execute_with_retry!(self.0.execute_batch(sql), 10)
    }

    /// Run a query, retrying on SQLITE_BUSY, returning the [`Rows`].
    pub async fn query(&self, sql: &str, params: impl IntoParams) -> libsql::Result<Rows> {
        let mut stmt = self.prepare(sql).await?;
        let params = params.into_params()?;
        execute_with_retry!(stmt.query(params.clone()), 10)
    }
}

pub struct LocalConnectionParams {
    pub path_to_db_file: PathBuf,
}

pub struct RemoteConnectionParams {
    pub remote_url: String,
    pub auth_token: String,
}

pub enum ConnectionType {
    Local(LocalConnectionParams),
    Remote(RemoteConnectionParams),
}

fn get_libsql_path(url: &Url) -> String {
    // `libsql://./x.db` keeps its relative form
    if url.as_str().starts_with("libsql://./") {
        format!(".{}", url.path())
    } else {
        url.path().to_string()
    }
}

impl TryFrom<Url> for ConnectionType {
    type Error = CommonError;
    fn try_from(url: Url) -> Result<Self, Self::Error> {
        if url.scheme() != "libsql" {
            let scheme = url.scheme();
            return Err(CommonError::Unknown(anyhow::anyhow!(
                "invalid scheme: {scheme}"
            )));
        }

        let mode = match url
            .query_pairs()
            .find(|(key, _)| key == "mode")
            .map(|(_, value)| value.to_string())
        {
            Some(mode) => mode,
            None => {
                return Err(CommonError::Unknown(anyhow::anyhow!(
                    "missing mode query parameter"
                )));
            }
        };

        match mode.as_str() {
            "local" => Ok(ConnectionType::Local(LocalConnectionParams {
                path_to_db_file: PathBuf::from(get_libsql_path(&url)),
            })),
            "remote" => {
                let mut remote_url = url.clone();
                remote_url.set_query(None);

                let auth_token = match url.query_pairs().find(|(key, _)| key == "auth") {
                    Some((_, value)) => value.to_string(),
                    None => {
                        return Err(CommonError::Unknown(anyhow::anyhow!(
                            "missing auth query parameter for remote store"
                        )));
                    }
                };

                Ok(ConnectionType::Remote(RemoteConnectionParams {
                    remote_url: remote_url.to_string(),
                    auth_token,
                }))
            }
            _ => Err(CommonError::Unknown(anyhow::anyhow!(
                "invalid mode: {mode}"
            ))),
        }
    }
}

pub fn inject_auth_token_to_db_url(
    url: &Url,
    auth_token: &Option<String>,
) -> Result<Url, CommonError> {
    let mut conn_url = url.clone();
    if let Some(auth_token) = auth_token {
        conn_url.query_pairs_mut().append_pair("auth", auth_token);
    }
    Ok(conn_url)
}

/// Apply `.up.` migrations in file-name order on a fresh connection.
pub async fn apply_migrations<'a>(
    conn: &Connection,
    migrations: &Migrations<'a>,
) -> Result<(), CommonError> {
    for (filename, contents) in migrations.iter().filter(|(k, _)| k.contains(".up.")) {
        tracing::debug!("applying migration {filename}");
        conn.execute_batch(contents).await?;
    }
    Ok(())
}

pub async fn establish_db_connection<'a>(
    connection_string: &Url,
    migrations: Option<Migrations<'a>>,
) -> Result<(Database, Connection), CommonError> {
    let connection_type = ConnectionType::try_from(connection_string.clone())?;

    fn create_db_file_parent_dir(parent_path: Option<&Path>) -> Result<(), CommonError> {
        if let Some(path) = parent_path {
            if !path.exists() {
                std::fs::create_dir_all(path)?;
            }
        }
        Ok(())
    }

    let (db, conn) = match connection_type {
        ConnectionType::Local(params) => {
            info!("establishing local connection");
            create_db_file_parent_dir(params.path_to_db_file.parent())?;

            let db = libsql::Builder::new_local(params.path_to_db_file.clone())
                .build()
                .await?;

            let conn = Connection(db.connect()?);
            conn.execute("PRAGMA foreign_keys = ON", ()).await?;
            (db, conn)
        }
        ConnectionType::Remote(params) => {
            info!("establishing remote connection");
            let db =
                libsql::Builder::new_remote(params.remote_url.clone(), params.auth_token.clone())
                    .build()
                    .await?;
            let conn = Connection(db.connect()?);
            (db, conn)
        }
    };

    if let Some(migrations) = migrations {
        apply_migrations(&conn, &migrations).await?;
    }

    Ok((db, conn))
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn test_connection_type_local() {
        let url = Url::parse("libsql://./data/clipnote.db?mode=local").unwrap();
        match ConnectionType::try_from(url).unwrap() {
            ConnectionType::Local(params) => {
                assert_eq!(params.path_to_db_file, PathBuf::from("./data/clipnote.db"));
            }
            _ => panic!("expected local connection"),
        }
    }

    #[test]
    fn test_connection_type_remote() {
        let url =
            Url::parse("libsql://clipnote.example.turso.io?mode=remote&auth=secret-token").unwrap();
        match ConnectionType::try_from(url).unwrap() {
            ConnectionType::Remote(params) => {
                assert_eq!(params.remote_url, "libsql://clipnote.example.turso.io");
                assert_eq!(params.auth_token, "secret-token");
            }
            _ => panic!("expected remote connection"),
        }
    }

    #[test]
    fn test_connection_type_rejects_missing_mode() {
        let url = Url::parse("libsql://clipnote.example.turso.io").unwrap();
        assert!(ConnectionType::try_from(url).is_err());
    }

    #[test]
    fn test_connection_type_rejects_remote_without_auth() {
        let url = Url::parse("libsql://clipnote.example.turso.io?mode=remote").unwrap();
        assert!(ConnectionType::try_from(url).is_err());
    }

    #[test]
    fn test_connection_type_rejects_other_schemes() {
        let url = Url::parse("https://clipnote.example.turso.io?mode=remote&auth=t").unwrap();
        assert!(ConnectionType::try_from(url).is_err());
    }

    #[test]
    fn test_inject_auth_token() {
        let url = Url::parse("libsql://clipnote.example.turso.io?mode=remote").unwrap();
        let with_token = inject_auth_token_to_db_url(&url, &Some("tok".to_string())).unwrap();
        assert!(with_token.query_pairs().any(|(k, v)| k == "auth" && v == "tok"));

        let without_token = inject_auth_token_to_db_url(&url, &None).unwrap();
        assert_eq!(without_token, url);
    }
}
