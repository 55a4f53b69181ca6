use crate::domain::entity::Entity;
use crate::domain::error::Result;
use crate::domain::page::{Page, PageWindow};
use crate::infrastructure::db::SqliteStore;
use std::sync::Arc;

/// Read side: dashboard counts and paginated table windows
pub struct BrowseUseCase {
    store: Arc<SqliteStore>,
    page_size: u32,
}

impl BrowseUseCase {
    pub fn new(store: Arc<SqliteStore>, page_size: u32) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Row count of every table, in display order
    pub async fn counts(&self) -> Result<Vec<(Entity, i64)>> {
        let mut counts = Vec::with_capacity(Entity::ALL.len());
        for entity in Entity::ALL {
            counts.push((entity, self.store.count(entity).await?));
        }
        Ok(counts)
    }

    /// One page of `entity`. Pages below 1 are treated as 1; pages past the
    /// end come back empty with the requested page number.
    pub async fn paginate(&self, entity: Entity, page: i64) -> Result<Page> {
        let window = PageWindow::new(page, self.page_size);
        let total = self.store.count(entity).await?;
        let total_pages = window.total_pages(total);
        let rows = self.store.fetch_window(entity, window).await?;

        Ok(Page {
            columns: entity.fields().iter().map(|f| f.name).collect(),
            rows,
            total,
            page: window.page,
            total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::CellValue;
    use crate::infrastructure::csv::MappedRow;

    async fn store_with_dates(n: u64) -> Arc<SqliteStore> {
        let store = SqliteStore::in_memory().await.unwrap();
        store.create_schema().await.unwrap();

        let width = Entity::Dates.fields().len();
        let rows = (1..=n)
            .map(|i| {
                let mut values = vec![CellValue::Null; width];
                values[0] = CellValue::Text(format!("day-{:04}", i));
                values[1] = CellValue::Integer(i as i64);
                MappedRow { number: i, values }
            })
            .collect::<Vec<_>>();
        store.insert_batch(Entity::Dates, &rows).await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_pages_are_bounded() {
        let browse = BrowseUseCase::new(store_with_dates(120).await, 50);
        for page in 1..=3 {
            let result = browse.paginate(Entity::Dates, page).await.unwrap();
            assert!(result.rows.len() <= 50);
            assert_eq!(result.total, 120);
            assert_eq!(result.total_pages, 3);
        }
        let last = browse.paginate(Entity::Dates, 3).await.unwrap();
        assert_eq!(last.rows.len(), 20);
        assert_eq!(last.rows[0][1], CellValue::Integer(101));
    }

    #[tokio::test]
    async fn test_low_pages_behave_like_first() {
        let browse = BrowseUseCase::new(store_with_dates(60).await, 50);
        let first = browse.paginate(Entity::Dates, 1).await.unwrap();
        for page in [0, -5] {
            let clamped = browse.paginate(Entity::Dates, page).await.unwrap();
            assert_eq!(clamped.page, 1);
            assert_eq!(clamped.rows, first.rows);
            assert_eq!(clamped.total, first.total);
            assert_eq!(clamped.total_pages, first.total_pages);
        }
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let browse = BrowseUseCase::new(store_with_dates(60).await, 50);
        let beyond = browse.paginate(Entity::Dates, 3).await.unwrap();
        assert!(beyond.rows.is_empty());
        assert_eq!(beyond.page, 3);
        assert_eq!(beyond.total, 60);
        assert_eq!(beyond.total_pages, 2);
    }

    #[tokio::test]
    async fn test_empty_table_has_one_page() {
        let browse = BrowseUseCase::new(store_with_dates(0).await, 50);
        let result = browse.paginate(Entity::Orders, 1).await.unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(result.total_pages, 1);
        assert!(result.rows.is_empty());
        assert_eq!(result.columns.len(), Entity::Orders.fields().len());
    }

    #[tokio::test]
    async fn test_counts_match_tables() {
        let browse = BrowseUseCase::new(store_with_dates(7).await, 50);
        let counts = browse.counts().await.unwrap();
        assert_eq!(counts.len(), 7);
        for (entity, count) in counts {
            let expected = if entity == Entity::Dates { 7 } else { 0 };
            assert_eq!(count, expected, "{}", entity);
        }
    }
}
