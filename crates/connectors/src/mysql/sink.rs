use crate::{
    mysql::{
        params::batch_params,
        query::{build_insert, build_load_data},
    },
    sink::{BulkLoadRequest, RecordSink, SinkConnector, SinkError},
};
use async_trait::async_trait;
use mysql_async::{Opts, OptsBuilder, Params, Pool, WhiteListFsHandler, prelude::*};
use model::{mapping::DestinationSpec, records::row::RowData};
use std::path::PathBuf;
use tracing::{debug, info};

/// MySQL server error codes that signal a constraint violation rather
/// than a transient failure.
const CONSTRAINT_CODES: [u16; 7] = [1048, 1062, 1216, 1217, 1366, 1451, 1452];

fn map_mysql_error(err: mysql_async::Error) -> SinkError {
    if let mysql_async::Error::Server(ref server) = err
        && CONSTRAINT_CODES.contains(&server.code)
    {
        return SinkError::Constraint {
            code: server.code,
            message: server.message.clone(),
        };
    }
    SinkError::MySql(err)
}

/// Opens one owned MySQL connection pool per worker.
#[derive(Clone)]
pub struct MySqlConnector {
    opts: Opts,
}

impl MySqlConnector {
    pub fn new(url: &str) -> Result<Self, SinkError> {
        let opts = Opts::from_url(url).map_err(mysql_async::Error::from)?;
        Ok(MySqlConnector { opts })
    }

    /// Allows `LOAD DATA LOCAL INFILE` for exactly this file. The
    /// server must also be configured with `local-infile` enabled.
    pub fn with_local_infile(mut self, path: PathBuf) -> Self {
        self.opts = OptsBuilder::from_opts(self.opts)
            .local_infile_handler(Some(WhiteListFsHandler::new(vec![path])))
            .into();
        self
    }
}

#[async_trait]
impl SinkConnector for MySqlConnector {
    async fn connect(&self) -> Result<Box<dyn RecordSink>, SinkError> {
        let pool = Pool::new(self.opts.clone());

        // Fail fast if the destination is unreachable.
        let mut conn = pool.get_conn().await?;
        conn.ping().await?;
        drop(conn);

        debug!(
            host = %self.opts.ip_or_hostname(),
            "MySQL sink connected"
        );
        Ok(Box::new(MySqlSink { pool }))
    }
}

pub struct MySqlSink {
    pool: Pool,
}

#[async_trait]
impl RecordSink for MySqlSink {
    async fn write_batch(
        &mut self,
        spec: &DestinationSpec,
        rows: &[RowData],
    ) -> Result<u64, SinkError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = build_insert(&spec.table, &spec.columns, rows.len());
        let params = Params::Positional(batch_params(rows));

        let mut conn = self.pool.get_conn().await?;
        conn.exec_drop(sql.as_str(), params)
            .await
            .map_err(map_mysql_error)?;
        Ok(conn.affected_rows())
    }

    async fn bulk_load(&mut self, request: &BulkLoadRequest) -> Result<u64, SinkError> {
        let sql = build_load_data(request);
        info!(table = %request.table, "Delegating whole file to LOAD DATA LOCAL INFILE");

        let mut conn = self.pool.get_conn().await?;
        conn.query_drop(sql.as_str())
            .await
            .map_err(map_mysql_error)?;
        Ok(conn.affected_rows())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.pool.clone().disconnect().await?;
        Ok(())
    }
}
