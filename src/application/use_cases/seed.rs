use crate::domain::entity::Entity;
use crate::domain::error::Result;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::db::SqliteStore;
use crate::infrastructure::storage::csv_path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Rows read from one CSV and rows present in its table afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub entity: Entity,
    pub rows_read: u64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub tables: Vec<TableLoad>,
}

impl SeedReport {
    pub fn count(&self, entity: Entity) -> Option<i64> {
        self.tables
            .iter()
            .find(|t| t.entity == entity)
            .map(|t| t.count)
    }
}

/// Full-replace load of every Contoso CSV into the store
pub struct SeedUseCase {
    store: Arc<SqliteStore>,
    parser: CsvParser,
    data_dir: PathBuf,
    batch_size: usize,
}

impl SeedUseCase {
    pub fn new(store: Arc<SqliteStore>, data_dir: PathBuf, batch_size: usize) -> Self {
        Self {
            store,
            parser: CsvParser::new(),
            data_dir,
            batch_size: batch_size.max(1),
        }
    }

    /// Read CSVs separated by `delimiter` instead of commas
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.parser = CsvParser::new().with_delimiter(delimiter);
        self
    }

    /// Recreate the schema, then load each entity in turn.
    /// The first failing row aborts the whole run.
    pub async fn execute(&self) -> Result<SeedReport> {
        self.store.create_schema().await?;

        let mut report = SeedReport::default();
        for entity in Entity::ALL {
            report.tables.push(self.load_entity(entity).await?);
        }
        Ok(report)
    }

    async fn load_entity(&self, entity: Entity) -> Result<TableLoad> {
        let path = csv_path(&self.data_dir, entity.csv_file());
        tracing::info!(file = %path.display(), table = entity.table(), "Loading CSV");
        let started = Instant::now();

        let mut reader = self.parser.open(&path, entity)?;
        let unmapped = reader.unmapped_headers();
        if !unmapped.is_empty() {
            tracing::debug!(table = entity.table(), columns = ?unmapped, "Ignoring unmapped CSV columns");
        }
        let missing = reader.missing_fields();
        if !missing.is_empty() {
            tracing::warn!(table = entity.table(), fields = ?missing, "CSV has no source column for fields; they will be NULL");
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while let Some(row) = reader.next_row()? {
            batch.push(row);
            if batch.len() >= self.batch_size {
                self.store.insert_batch(entity, &batch).await?;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            self.store.insert_batch(entity, &batch).await?;
        }

        let count = self.store.count(entity).await?;
        tracing::info!(
            table = entity.table(),
            count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded {} records into {}",
            count,
            entity.table()
        );

        Ok(TableLoad {
            entity,
            rows_read: reader.rows_read(),
            count,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::Path;

    /// A small Contoso export with every CSV the loader reads
    pub fn write_fixtures(dir: &Path) {
        fs::write(
            dir.join("customer.csv"),
            "CustomerKey,GeoAreaKey,GivenName,Surname,Age,Latitude,Longitude,Extra\n\
             15,604,Julian,Burke,57,-33.8,151.2,x\n\
             180,665,Karen,Cox,42,48.1,11.5,y\n",
        )
        .unwrap();
        fs::write(
            dir.join("store.csv"),
            "StoreKey,StoreCode,CountryCode,Description,SquareMeters,Status\n\
             1,1,AU,Contoso Store Australian Capital Territory,595,\n\
             2,2,AU,Contoso Store Northern Territory,665,Closed\n",
        )
        .unwrap();
        fs::write(
            dir.join("product.csv"),
            "ProductKey,ProductCode,ProductName,Brand,Cost,Price,CategoryKey\n\
             1,0101001,Contoso 512MB MP3 Player E51 Silver,Contoso,6.62,12.99,1\n",
        )
        .unwrap();
        fs::write(
            dir.join("orders.csv"),
            "OrderKey,CustomerKey,StoreKey,OrderDate,DeliveryDate,CurrencyCode\n\
             1000,947009,400,2015-01-01,2015-01-01,GBP\n\
             1001,1772036,430,2015-01-01,2015-01-01,USD\n\
             1002,1518349,660,2015-01-01,2015-01-01,USD\n",
        )
        .unwrap();
        fs::write(
            dir.join("orderrows.csv"),
            "OrderKey,LineNumber,ProductKey,Quantity,UnitPrice,NetPrice,UnitCost\n\
             1000,0,48,1,98.967,98.967,37.813\n\
             1000,1,460,1,2.222,2.222,1.02\n\
             1001,0,1730,2,28.22,25.1158,14.385\n\
             1002,0,955,1,1124.9,1124.9,372.59\n\
             1002,1,62,5,120.98,105.25,55.62\n",
        )
        .unwrap();
        fs::write(
            dir.join("date.csv"),
            "Date,DateKey,Year,Month,DayofWeek,WorkingDay\n\
             2015-01-01,20150101,2015,January,Thursday,1\n\
             2015-01-02,20150102,2015,January,Friday,1\n",
        )
        .unwrap();
        fs::write(
            dir.join("currencyexchange.csv"),
            "Date,FromCurrency,ToCurrency,Exchange\n\
             2015-01-01,CAD,CAD,1\n\
             2015-01-01,CAD,EUR,0.7094\n",
        )
        .unwrap();
    }
}
