use crate::domain::entity::Entity;
use crate::domain::error::{AppError, Result};
use crate::domain::page::PageWindow;
use crate::domain::value::CellValue;
use crate::infrastructure::csv::MappedRow;
use sqlx::{
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
        SqliteSynchronous,
    },
    QueryBuilder, Row, Sqlite, TypeInfo, ValueRef,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Host parameter limit of the bundled SQLite build
const SQLITE_MAX_VARIABLES: usize = 32_766;

/// Client for the browser's SQLite file.
///
/// Constructed once per process and handed to whoever needs it; call
/// [`SqliteStore::close`] on shutdown.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) a database for seeding
    pub async fn create(db_path: &Path) -> Result<Self> {
        let options = connect_options(db_path)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        Ok(Self { pool })
    }

    /// Open an existing, already seeded database for reading
    pub async fn open(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            return Err(AppError::NotFound(format!(
                "Database file {} does not exist; run the seed command first",
                db_path.display()
            )));
        }

        let options = connect_options(db_path)?
            .read_only(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse connection string: {}", e)))?;
        // one connection, otherwise every pooled connection sees its own empty database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;
        Ok(Self { pool })
    }

    /// Close every pooled connection; clones of this store share the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Drop and recreate every entity table
    pub async fn create_schema(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        for entity in Entity::ALL {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", entity.table()))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to drop {}: {}", entity.table(), e))
                })?;

            sqlx::query(&entity.create_table_sql())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to create {}: {}", entity.table(), e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))
    }

    /// Insert one batch inside a single transaction.
    ///
    /// A unique-key collision rolls the whole batch back and surfaces as
    /// [`AppError::ConstraintViolation`] naming the offending CSV row.
    pub async fn insert_batch(&self, entity: Entity, rows: &[MappedRow]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let rows_per_statement = (SQLITE_MAX_VARIABLES / entity.fields().len()).max(1);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let mut affected: u64 = 0;
        for chunk in rows.chunks(rows_per_statement) {
            let mut builder = insert_statement(entity, chunk);
            let outcome = builder.build().execute(&mut *tx).await;
            match outcome {
                Ok(res) => affected += res.rows_affected(),
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await.map_err(|e| {
                        AppError::DatabaseError(format!("Failed to roll back transaction: {}", e))
                    })?;
                    return Err(self.locate_violation(entity, rows, e).await);
                }
                Err(e) => return Err(insert_error(entity, e)),
            }
        }

        tx.commit().await.map_err(|e| insert_error(entity, e))?;

        Ok(affected)
    }

    /// Replay a rejected batch row by row in a throwaway transaction to find
    /// the first row that collides.
    async fn locate_violation(
        &self,
        entity: Entity,
        rows: &[MappedRow],
        batch_err: sqlx::Error,
    ) -> AppError {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                return AppError::DatabaseError(format!("Failed to begin transaction: {}", e))
            }
        };

        let mut found = None;
        for row in rows {
            let mut builder = insert_statement(entity, std::slice::from_ref(row));
            let outcome = builder.build().execute(&mut *tx).await;
            if let Err(e) = outcome {
                let violation = match &e {
                    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                        Some(AppError::ConstraintViolation {
                            table: entity.table().to_string(),
                            row: row.number,
                            message: db_err.message().to_string(),
                        })
                    }
                    _ => None,
                };
                found = Some(violation.unwrap_or_else(|| insert_error(entity, e)));
                break;
            }
        }

        if let Err(e) = tx.rollback().await {
            tracing::warn!(table = entity.table(), error = %e, "Failed to roll back replay");
        }

        found.unwrap_or_else(|| insert_error(entity, batch_err))
    }

    pub async fn count(&self, entity: Entity) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", entity.table()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to count {}: {}", entity.table(), e))
            })
    }

    /// Rows of one page window, in insertion order
    pub async fn fetch_window(
        &self,
        entity: Entity,
        window: PageWindow,
    ) -> Result<Vec<Vec<CellValue>>> {
        let fields = entity.fields();
        let columns = fields.iter().map(|f| f.name).collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT ? OFFSET ?",
            columns,
            entity.table()
        );

        let rows = sqlx::query(&sql)
            .bind(window.limit())
            .bind(window.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to fetch {}: {}", entity.table(), e))
            })?;

        rows.iter()
            .map(|row| {
                (0..fields.len())
                    .map(|idx| read_cell(row, idx))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}

fn db_path_to_url(db_path: &Path) -> Result<String> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| AppError::DatabaseError("Database path is not valid UTF-8".to_string()))?;
    Ok(format!("sqlite://{}", db_path_str.replace('\\', "/")))
}

fn connect_options(db_path: &Path) -> Result<SqliteConnectOptions> {
    let url = db_path_to_url(db_path)?;
    SqliteConnectOptions::from_str(&url).map_err(|e| {
        AppError::DatabaseError(format!("Failed to parse connection string: {}", e))
    })
}

fn insert_statement(entity: Entity, rows: &[MappedRow]) -> QueryBuilder<'_, Sqlite> {
    let columns = entity
        .fields()
        .iter()
        .map(|f| f.name)
        .collect::<Vec<_>>()
        .join(", ");
    let mut builder: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("INSERT INTO {} ({}) ", entity.table(), columns));

    builder.push_values(rows, |mut b, row| {
        for value in &row.values {
            match value {
                CellValue::Null => {
                    b.push_bind(None::<String>);
                }
                CellValue::Integer(v) => {
                    b.push_bind(*v);
                }
                CellValue::Real(v) => {
                    b.push_bind(*v);
                }
                CellValue::Text(v) => {
                    b.push_bind(v.as_str());
                }
            }
        }
    });
    builder
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn insert_error(entity: Entity, err: sqlx::Error) -> AppError {
    AppError::DatabaseError(format!(
        "Failed to insert into {}: {}",
        entity.table(),
        err
    ))
}

/// Decode by the stored value's own type; SQLite affinity allows text in numeric columns.
fn read_cell(row: &SqliteRow, idx: usize) -> Result<CellValue> {
    let decode_err =
        |e: sqlx::Error| AppError::DatabaseError(format!("Failed to decode column {}: {}", idx, e));

    let type_name = {
        let raw = row.try_get_raw(idx).map_err(decode_err)?;
        if raw.is_null() {
            return Ok(CellValue::Null);
        }
        raw.type_info().name().to_string()
    };

    let decoded = match type_name.as_str() {
        "INTEGER" => row.try_get::<i64, _>(idx).map(CellValue::Integer),
        "REAL" => row.try_get::<f64, _>(idx).map(CellValue::Real),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(idx)
            .map(|bytes| CellValue::Text(String::from_utf8_lossy(&bytes).into_owned())),
        _ => row.try_get::<String, _>(idx).map(CellValue::Text),
    };
    decoded.map_err(decode_err)
}
