//! Lab order repository

use crate::connection::DatabasePool;
use crate::error::DatabaseResult;
use crate::models::{LabOrder, LabOrderInput, PendingLabOrder, LAB_STATUS_NEEDS_SUBMISSION};
use tracing::info;

const LAB_ORDER_COLUMNS: &str = "id, patient_id, order_type, ordered_by, status";

#[derive(Clone)]
pub struct LabOrderRepository {
    pool: DatabasePool,
}

impl LabOrderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, patient_id: i64, input: &LabOrderInput) -> DatabaseResult<LabOrder> {
        let order = sqlx::query_as::<_, LabOrder>(&format!(
            "INSERT INTO lab_orders (patient_id, order_type, ordered_by, status) \
             VALUES (?, ?, ?, ?) RETURNING {LAB_ORDER_COLUMNS}"
        ))
        .bind(patient_id)
        .bind(&input.order_type)
        .bind(&input.ordered_by)
        .bind(&input.status)
        .fetch_one(self.pool.pool())
        .await?;

        info!(patient_id, lab_order_id = order.id, status = %order.status, "Lab order created");
        Ok(order)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<LabOrder>> {
        let order = sqlx::query_as::<_, LabOrder>(&format!(
            "SELECT {LAB_ORDER_COLUMNS} FROM lab_orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(order)
    }

    pub async fn list_for_patient(&self, patient_id: i64) -> DatabaseResult<Vec<LabOrder>> {
        let orders = sqlx::query_as::<_, LabOrder>(&format!(
            "SELECT {LAB_ORDER_COLUMNS} FROM lab_orders WHERE patient_id = ? ORDER BY id"
        ))
        .bind(patient_id)
        .fetch_all(self.pool.pool())
        .await?;
        Ok(orders)
    }

    /// Every order still waiting to be submitted, across all patients
    pub async fn list_pending(&self) -> DatabaseResult<Vec<PendingLabOrder>> {
        let orders = sqlx::query_as::<_, PendingLabOrder>(
            "SELECT l.id, l.patient_id, p.name AS patient_name, l.order_type, l.ordered_by, l.status \
             FROM lab_orders l JOIN patients p ON p.id = l.patient_id \
             WHERE l.status = ? ORDER BY l.id",
        )
        .bind(LAB_STATUS_NEEDS_SUBMISSION)
        .fetch_all(self.pool.pool())
        .await?;
        Ok(orders)
    }

    pub async fn update(&self, id: i64, input: &LabOrderInput) -> DatabaseResult<Option<LabOrder>> {
        let order = sqlx::query_as::<_, LabOrder>(&format!(
            "UPDATE lab_orders SET order_type = ?, ordered_by = ?, status = ? \
             WHERE id = ? RETURNING {LAB_ORDER_COLUMNS}"
        ))
        .bind(&input.order_type)
        .bind(&input.ordered_by)
        .bind(&input.status)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(order)
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM lab_orders WHERE id = ?")
            .bind(id)
            .execute(self.pool.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
