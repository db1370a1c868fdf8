//! Connection settings, read once from the environment at startup.

use std::fmt;

use crate::error::Error;

pub const DB_HOST: &str = "DBHOSTMASTER";
pub const DB_PORT: &str = "DBPORT";
pub const DB_USER: &str = "DBUSERNAME";
pub const DB_PASSWORD: &str = "DBPASSWORD";
pub const DB_NAME: &str = "DB_SCORING";
pub const S3_ACCESS_KEY_ID: &str = "S3ACCESSKEYID";
pub const S3_SECRET_ACCESS_KEY: &str = "S3SECRETACCESSKEY";
pub const S3_REGION: &str = "S3REGION";
pub const S3_BUCKET: &str = "S3BUCKETNAME";
pub const S3_OBJECT_KEY: &str = "S3OBJECTKEY";

#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

#[derive(Clone, PartialEq)]
pub struct ObjectConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub database: DatabaseConfig,
    pub object: ObjectConfig,
}

impl ConnectionConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup. Every variable is required;
    /// blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(Error::MissingVariable(name))
        };

        let database = DatabaseConfig {
            host: get(DB_HOST)?,
            port: parse_port(&get(DB_PORT)?)?,
            user: get(DB_USER)?,
            password: get(DB_PASSWORD)?,
            name: get(DB_NAME)?,
        };
        let object = ObjectConfig {
            access_key_id: get(S3_ACCESS_KEY_ID)?,
            secret_access_key: get(S3_SECRET_ACCESS_KEY)?,
            region: get(S3_REGION)?,
            bucket: get(S3_BUCKET)?,
            key: get(S3_OBJECT_KEY)?,
        };
        Ok(ConnectionConfig { database, object })
    }
}

fn parse_port(value: &str) -> Result<u16, Error> {
    let invalid = |reason: String| Error::InvalidPort {
        value: value.to_string(),
        reason,
    };
    match value.parse::<u16>() {
        Ok(0) => Err(invalid("port must be positive".to_string())),
        Ok(port) => Ok(port),
        Err(e) => Err(invalid(e.to_string())),
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Debug for ObjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .finish()
    }
}
