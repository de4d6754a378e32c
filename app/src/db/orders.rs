// stockflow_app/src/db/orders.rs

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use stockflow::{NewOrder, Order, OrderFilter, OrderStatus, OrderStore, StatusSwap, StoreError};
use tracing::instrument;
use uuid::Uuid;

use super::{store_error, PgStore, ORDER_COLUMNS};

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "db::insert_order", skip(self, order), fields(user_id = %order.user_id), err(Display))]
  async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
    let sub_total = order.resolved_sub_total();
    // `invoice` comes from the identity column, `status` and timestamps from column defaults.
    sqlx::query_as::<_, Order>(&format!(
      "INSERT INTO orders \
       (id, cart, payment_method, sub_total, shipping_cost, discount, total_amount, user_id, customer_name) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
       RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(Json(&order.cart))
    .bind(order.payment_method)
    .bind(sub_total)
    .bind(order.shipping_cost)
    .bind(order.discount)
    .bind(order.total_amount)
    .bind(order.user_id)
    .bind(&order.customer_name)
    .fetch_one(self.pool())
    .await
    .map_err(store_error)
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
    sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(self.pool())
      .await
      .map_err(store_error)
  }

  #[instrument(name = "db::list_orders", skip(self), err(Display))]
  async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
    let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM orders WHERE TRUE", ORDER_COLUMNS));
    if let Some(status) = filter.status {
      query.push(" AND status = ").push_bind(status);
    }
    if let Some(method) = filter.payment_method {
      query.push(" AND payment_method = ").push_bind(method);
    }
    if let Some(user_id) = filter.user_id {
      query.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(from) = filter.created_from {
      query.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
      query.push(" AND created_at < ").push_bind(to);
    }
    query.push(" ORDER BY created_at DESC, invoice DESC");

    query
      .build_query_as::<Order>()
      .fetch_all(self.pool())
      .await
      .map_err(store_error)
  }

  #[instrument(name = "db::compare_and_set_status", skip(self), err(Display))]
  async fn compare_and_set_status(
    &self,
    id: Uuid,
    allowed_from: &[OrderStatus],
    to: OrderStatus,
  ) -> Result<Option<StatusSwap>, StoreError> {
    if allowed_from.is_empty() {
      return Ok(None);
    }
    let allowed: Vec<&'static str> = allowed_from.iter().map(OrderStatus::as_str).collect();
    // The row lock taken by FOR UPDATE makes a concurrent swap wait, then re-check the guard
    // against the committed status, so only one caller can leave a given status.
    let returning = ORDER_COLUMNS
      .split(", ")
      .map(|column| format!("o.{}", column.trim()))
      .collect::<Vec<_>>()
      .join(", ");
    sqlx::query_as::<_, StatusSwap>(&format!(
      "WITH prior AS ( \
         SELECT id, status FROM orders WHERE id = $1 AND status::text = ANY($2) FOR UPDATE \
       ) \
       UPDATE orders o SET status = $3, updated_at = now() \
       FROM prior WHERE o.id = prior.id \
       RETURNING {}, prior.status AS previous_status",
      returning
    ))
    .bind(id)
    .bind(allowed)
    .bind(to)
    .fetch_optional(self.pool())
    .await
    .map_err(store_error)
  }
}
