//! Order repository: restocking orders placed by employees, with inclusive
//! date-range and status finders.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use backroom_core::{Order, OrderStatus};

use crate::error::DbResult;
use crate::record::{Record, Repo, SqliteQuery};

const SELECT: &str =
    "SELECT id, employee_id, product_id, quantity, order_date, status FROM orders";

impl Record for Order {
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] =
        &["employee_id", "product_id", "quantity", "order_date", "status"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.employee_id)
            .bind(self.product_id)
            .bind(self.quantity())
            .bind(self.order_date)
            .bind(self.status)
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    repo: Repo<Order>,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached order; both referenced parents must exist.
    pub async fn insert(&self, order: &mut Order) -> DbResult<()> {
        self.repo.insert(order).await
    }

    /// Gets an order by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Order>> {
        self.repo.fetch(id).await
    }

    /// Lists all orders.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored order with the given one, matched by id.
    pub async fn update(&self, order: &Order) -> DbResult<()> {
        self.repo.update(order).await
    }

    /// Physically deletes an order.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }

    /// Orders placed by one employee, oldest first.
    pub async fn for_employee(&self, employee_id: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "{SELECT} WHERE employee_id = ?1 ORDER BY order_date, id"
        ))
        .bind(employee_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(orders)
    }

    /// Orders dated inside `[from, to]`, inclusive on both ends.
    pub async fn between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "{SELECT} WHERE order_date >= ?1 AND order_date <= ?2 ORDER BY order_date, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(orders)
    }

    /// Orders currently in a given status.
    pub async fn with_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "{SELECT} WHERE status = ?1 ORDER BY order_date, id"
        ))
        .bind(status)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{date, memory_db, persisted_employee, persisted_product};

    #[tokio::test]
    async fn test_between_is_inclusive_at_both_boundaries() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let product = persisted_product(&db, "Cola 330ml").await;

        // one order exactly on each boundary, one inside, two outside
        let days = [
            date(2025, 6, 30),
            date(2025, 7, 1),
            date(2025, 7, 15),
            date(2025, 7, 31),
            date(2025, 8, 1),
        ];
        for day in days {
            let mut order = Order::new(employee.id, product.id, 10, day).unwrap();
            db.orders().insert(&mut order).await.unwrap();
        }

        let hits = db
            .orders()
            .between(date(2025, 7, 1), date(2025, 7, 31))
            .await
            .unwrap();

        let dates: Vec<_> = hits.iter().map(|o| o.order_date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 7, 1), date(2025, 7, 15), date(2025, 7, 31)]
        );
    }

    #[tokio::test]
    async fn test_status_finder_tracks_updates() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let product = persisted_product(&db, "Cola 330ml").await;

        let mut order = Order::new(employee.id, product.id, 10, date(2025, 7, 1)).unwrap();
        db.orders().insert(&mut order).await.unwrap();

        assert_eq!(
            db.orders().with_status(OrderStatus::Placed).await.unwrap().len(),
            1
        );

        order.status = OrderStatus::Completed;
        db.orders().update(&order).await.unwrap();

        assert!(db
            .orders()
            .with_status(OrderStatus::Placed)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            db.orders()
                .with_status(OrderStatus::Completed)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_for_employee_filters_by_owner() {
        let db = memory_db().await;
        let jan = persisted_employee(&db, "jan@example.com").await;
        let ala = persisted_employee(&db, "ala@example.com").await;
        let product = persisted_product(&db, "Cola 330ml").await;

        let mut order = Order::new(jan.id, product.id, 5, date(2025, 7, 1)).unwrap();
        db.orders().insert(&mut order).await.unwrap();

        assert_eq!(db.orders().for_employee(jan.id).await.unwrap().len(), 1);
        assert!(db.orders().for_employee(ala.id).await.unwrap().is_empty());
    }
}
