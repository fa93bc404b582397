use crate::error::CliError;
use async_trait::async_trait;
use mysql_async::prelude::*;
use tracing::{error, info};

/// Reachability check for a destination before a run is attempted
#[async_trait]
pub trait ConnectionPinger {
    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

/// MySQL/MariaDB pinger
pub struct MySqlConnectionPinger {
    pub conn_str: String,
}

#[async_trait]
impl ConnectionPinger for MySqlConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        info!("Pinging MySQL at '{}'", &self.conn_str);

        let opts = mysql_async::Opts::from_url(&self.conn_str).map_err(|e| {
            error!("MySQL connection string parse failed: {e}");
            CliError::MySql(mysql_async::Error::Url(e))
        })?;
        let pool = mysql_async::Pool::new(opts);

        let mut conn = pool.get_conn().await.map_err(|e| {
            error!("MySQL connection to '{}' failed: {e}", &self.conn_str);
            CliError::MySql(e)
        })?;
        conn.ping().await.map_err(|e| {
            error!("MySQL ping on '{}' failed: {e}", &self.conn_str);
            CliError::MySql(e)
        })?;

        info!("MySQL ping to '{}' succeeded", &self.conn_str);
        drop(conn);
        pool.disconnect().await.ok();
        Ok(())
    }
}
