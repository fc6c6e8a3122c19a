use crate::error::{
    BadEnvVarSnafu, NoConnectionsAllowedSnafu, ParseNumberSnafu, RollcallResult,
};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    server_ip: String,
    max_connections: u32,
}

impl RuntimeConfiguration {
    pub fn new() -> RollcallResult<Self> {
        let server_ip = var("ROLLCALL_SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string());
        let max_connections = parse_max_connections(var("ROLLCALL_MAX_CONNECTIONS").ok())?;

        Ok(Self {
            db_config: Arc::new(DbConfig::new()?),
            server_ip,
            max_connections,
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

/// One shared connection unless told otherwise. A pool of zero could never hand
/// out a connection.
fn parse_max_connections(raw: Option<String>) -> RollcallResult<u32> {
    let Some(raw) = raw else {
        return Ok(1);
    };

    let max_connections: u32 = raw.trim().parse().context(ParseNumberSnafu {
        name: "ROLLCALL_MAX_CONNECTIONS",
    })?;
    snafu::ensure!(max_connections > 0, NoConnectionsAllowedSnafu);

    Ok(max_connections)
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    pub fn new() -> RollcallResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?
                .trim()
                .parse()
                .context(ParseNumberSnafu { name: "DB_PORT" })?,
            database: get_env_var("DB_NAME")?,
        })
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
