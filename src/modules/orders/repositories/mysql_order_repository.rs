// MySQL Order Store
//
// Runtime queries over `purchase_orders`. UPDATE statements are assembled with
// `QueryBuilder` from an `OrderPatch`, so only the column groups present in the patch
// are written. Status transitions always carry a `status IN (...)` guard and report
// the affected row count back to the engine.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, OrderId, ProjectId, Result};
use crate::modules::orders::models::{
    MaterialLine, OrderPatch, OrderStatus, OrderWithProject, ProofUpdate, PurchaseOrder, Seller,
};
use crate::modules::orders::repositories::order_repository::{
    OrderFilter, OrderRepository, OrderTransaction, StatusTotal,
};

const ORDER_COLUMNS: &str = r#"
    o.id, o.project_id, o.item_number, o.type AS order_type, o.description, o.unit,
    CAST(o.materials AS CHAR) AS materials,
    o.amount, o.currency, o.exchange_rate, o.amount_pen,
    o.igv_enabled, o.igv_rate, o.igv_amount, o.total_with_igv,
    o.status, o.source_type, o.inventory_item_id, o.reference_price, o.parent_order_id,
    o.batch_id, o.created_by, o.approved_by, o.approved_at, o.notes,
    o.seller_name, o.seller_document, o.payment_type, o.issue_date, o.payment_date, o.due_date,
    o.payment_confirmed, o.payment_confirmed_at, o.payment_confirmed_by,
    o.cdp_type, o.cdp_serie, o.cdp_number, o.payment_proof, o.payment_proof_link,
    o.delivery_confirmed, o.delivery_confirmed_at, o.delivery_confirmed_by, o.delivery_notes,
    o.created_at, o.updated_at
"#;

const PROJECT_NAME_COLUMN: &str =
    "COALESCE(NULLIF(TRIM(p.name), ''), CONCAT('Project #', o.project_id)) AS project_name";

/// Pool-level access to purchase orders
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<PurchaseOrder>> {
        let sql = format!("SELECT {} FROM purchase_orders o WHERE o.id = ?", ORDER_COLUMNS);

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch order: {}", e)))?;

        row.map(PurchaseOrder::try_from).transpose()
    }

    async fn find_with_project(&self, id: OrderId) -> Result<Option<OrderWithProject>> {
        let sql = format!(
            "SELECT {}, {} FROM purchase_orders o LEFT JOIN projects p ON p.id = o.project_id WHERE o.id = ?",
            ORDER_COLUMNS, PROJECT_NAME_COLUMN
        );

        let row = sqlx::query_as::<_, OrderWithProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to fetch order: {}", e)))?;

        row.map(OrderWithProject::try_from).transpose()
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderWithProject>> {
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {}, {} FROM purchase_orders o LEFT JOIN projects p ON p.id = o.project_id WHERE 1 = 1",
            ORDER_COLUMNS, PROJECT_NAME_COLUMN
        ));

        if let Some(statuses) = &filter.statuses {
            builder.push(" AND ");
            push_status_list(&mut builder, "o.status", statuses);
        }
        if let Some(order_type) = filter.order_type {
            builder.push(" AND o.type = ").push_bind(order_type.as_str());
        }
        if let Some(project_id) = filter.project_id {
            builder.push(" AND o.project_id = ").push_bind(project_id);
        }
        if let Some(confirmed) = filter.payment_confirmed {
            builder.push(" AND o.payment_confirmed = ").push_bind(confirmed);
        }
        if let Some(delivered) = filter.delivery_confirmed {
            builder.push(" AND o.delivery_confirmed = ").push_bind(delivered);
        }
        builder.push(" ORDER BY o.project_id ASC, o.item_number ASC, o.id ASC");

        let rows = builder
            .build_query_as::<OrderWithProjectRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to list orders: {}", e)))?;

        rows.into_iter().map(OrderWithProject::try_from).collect()
    }

    async fn status_totals(&self) -> Result<Vec<StatusTotal>> {
        let rows: Vec<(String, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*), COALESCE(SUM(amount), 0)
            FROM purchase_orders
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count orders: {}", e)))?;

        rows.into_iter()
            .map(|(status, orders, amount)| {
                Ok(StatusTotal {
                    status: status.parse().map_err(AppError::Internal)?,
                    orders: orders.max(0) as u64,
                    amount,
                })
            })
            .collect()
    }

    async fn distinct_sellers(&self, status: OrderStatus) -> Result<Vec<Seller>> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT DISTINCT seller_name, seller_document
            FROM purchase_orders
            WHERE status = ? AND seller_name IS NOT NULL AND TRIM(seller_name) <> ''
            ORDER BY seller_name ASC, seller_document ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list sellers: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(seller_name, seller_document)| Seller {
                seller_name,
                seller_document,
            })
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn OrderTransaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        Ok(Box::new(MySqlOrderTransaction { tx }))
    }
}

/// One engine operation's unit of work. Rolled back by sqlx when dropped uncommitted.
pub struct MySqlOrderTransaction {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl OrderTransaction for MySqlOrderTransaction {
    async fn find_by_id(&mut self, id: OrderId) -> Result<Option<PurchaseOrder>> {
        let sql = format!(
            "SELECT {} FROM purchase_orders o WHERE o.id = ? FOR UPDATE",
            ORDER_COLUMNS
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.tx.as_mut())
            .await?;

        row.map(PurchaseOrder::try_from).transpose()
    }

    async fn all_have_status(&mut self, ids: &[OrderId], statuses: &[OrderStatus]) -> Result<bool> {
        let unique: BTreeSet<OrderId> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(true);
        }

        let mut builder = QueryBuilder::<MySql>::new("SELECT o.id, o.status FROM purchase_orders o WHERE ");
        push_id_list(&mut builder, "o.id", unique.iter().copied());
        builder.push(" FOR UPDATE");

        let rows: Vec<(u64, String)> = builder.build_query_as().fetch_all(self.tx.as_mut()).await?;

        if rows.len() != unique.len() {
            return Ok(false);
        }

        Ok(rows
            .iter()
            .all(|(_, status)| statuses.iter().any(|s| s.as_str() == status)))
    }

    async fn update_by_id(&mut self, id: OrderId, patch: &OrderPatch) -> Result<u64> {
        let mut builder = QueryBuilder::<MySql>::new("UPDATE purchase_orders SET ");
        push_assignments(&mut builder, patch)?;
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(self.tx.as_mut()).await?;
        Ok(result.rows_affected())
    }

    async fn update_where_status(
        &mut self,
        ids: &[OrderId],
        expected: &[OrderStatus],
        patch: &OrderPatch,
    ) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<MySql>::new("UPDATE purchase_orders SET ");
        push_assignments(&mut builder, patch)?;
        builder.push(" WHERE ");
        push_id_list(&mut builder, "id", ids.iter().copied());
        builder.push(" AND ");
        push_status_list(&mut builder, "status", expected);

        let result = builder.build().execute(self.tx.as_mut()).await?;
        Ok(result.rows_affected())
    }

    async fn insert(&mut self, order: &PurchaseOrder) -> Result<OrderId> {
        let materials = MaterialLine::encode_list(&order.materials)?;

        let result = sqlx::query(
            r#"
            INSERT INTO purchase_orders (
                project_id, item_number, type, description, unit, materials,
                amount, currency, exchange_rate, amount_pen,
                igv_enabled, igv_rate, igv_amount, total_with_igv,
                status, source_type, inventory_item_id, reference_price, parent_order_id,
                batch_id, created_by, approved_by, approved_at, notes,
                seller_name, seller_document, payment_type, issue_date, payment_date, due_date,
                payment_confirmed, payment_confirmed_at, payment_confirmed_by,
                cdp_type, cdp_serie, cdp_number, payment_proof, payment_proof_link,
                delivery_confirmed, delivery_confirmed_at, delivery_confirmed_by, delivery_notes,
                created_at, updated_at
            ) VALUES (
                ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?,
                ?, ?, ?,
                ?, ?, ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?
            )
            "#,
        )
        .bind(order.project_id)
        .bind(order.item_number)
        .bind(order.order_type.as_str())
        .bind(&order.description)
        .bind(&order.unit)
        .bind(materials)
        .bind(order.amount)
        .bind(order.currency.as_str())
        .bind(order.exchange_rate)
        .bind(order.amount_pen)
        .bind(order.igv_enabled)
        .bind(order.igv_rate)
        .bind(order.igv_amount)
        .bind(order.total_with_igv)
        .bind(order.status.as_str())
        .bind(order.source_type.as_str())
        .bind(order.inventory_item_id)
        .bind(order.reference_price)
        .bind(order.parent_order_id)
        .bind(&order.batch_id)
        .bind(order.created_by)
        .bind(order.approved_by)
        .bind(order.approved_at)
        .bind(&order.notes)
        .bind(&order.seller_name)
        .bind(&order.seller_document)
        .bind(order.payment_type.map(|t| t.as_str()))
        .bind(order.issue_date)
        .bind(order.payment_date)
        .bind(order.due_date)
        .bind(order.payment_confirmed)
        .bind(order.payment_confirmed_at)
        .bind(order.payment_confirmed_by)
        .bind(&order.cdp_type)
        .bind(&order.cdp_serie)
        .bind(&order.cdp_number)
        .bind(&order.payment_proof)
        .bind(&order.payment_proof_link)
        .bind(order.delivery_confirmed)
        .bind(order.delivery_confirmed_at)
        .bind(order.delivery_confirmed_by)
        .bind(&order.delivery_notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(self.tx.as_mut())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::validation(format!(
                        "Item number {} already exists in project {}",
                        order.item_number, order.project_id
                    ));
                }
            }
            AppError::Internal(format!("Failed to create order: {}", e))
        })?;

        Ok(result.last_insert_id())
    }

    async fn update_where_batch(
        &mut self,
        batch_id: &str,
        current_status: OrderStatus,
        patch: &OrderPatch,
    ) -> Result<u64> {
        let mut builder = QueryBuilder::<MySql>::new("UPDATE purchase_orders SET ");
        push_assignments(&mut builder, patch)?;
        builder
            .push(" WHERE batch_id = ")
            .push_bind(batch_id.to_string())
            .push(" AND status = ")
            .push_bind(current_status.as_str());

        let result = builder.build().execute(self.tx.as_mut()).await?;
        Ok(result.rows_affected())
    }

    async fn update_confirmed_batch(&mut self, batch_id: &str, patch: &OrderPatch) -> Result<u64> {
        let mut builder = QueryBuilder::<MySql>::new("UPDATE purchase_orders SET ");
        push_assignments(&mut builder, patch)?;
        builder
            .push(" WHERE batch_id = ")
            .push_bind(batch_id.to_string())
            .push(" AND payment_confirmed = TRUE");

        let result = builder.build().execute(self.tx.as_mut()).await?;
        Ok(result.rows_affected())
    }

    async fn find_with_project(&mut self, ids: &[OrderId]) -> Result<Vec<OrderWithProject>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {}, {} FROM purchase_orders o LEFT JOIN projects p ON p.id = o.project_id WHERE ",
            ORDER_COLUMNS, PROJECT_NAME_COLUMN
        ));
        push_id_list(&mut builder, "o.id", ids.iter().copied());
        builder.push(" ORDER BY o.item_number ASC, o.id ASC");

        let rows = builder
            .build_query_as::<OrderWithProjectRow>()
            .fetch_all(self.tx.as_mut())
            .await?;

        rows.into_iter().map(OrderWithProject::try_from).collect()
    }

    async fn find_batch_with_project(&mut self, batch_id: &str) -> Result<Vec<OrderWithProject>> {
        let sql = format!(
            "SELECT {}, {} FROM purchase_orders o LEFT JOIN projects p ON p.id = o.project_id \
             WHERE o.batch_id = ? ORDER BY o.item_number ASC, o.id ASC",
            ORDER_COLUMNS, PROJECT_NAME_COLUMN
        );

        let rows = sqlx::query_as::<_, OrderWithProjectRow>(&sql)
            .bind(batch_id)
            .fetch_all(self.tx.as_mut())
            .await?;

        rows.into_iter().map(OrderWithProject::try_from).collect()
    }

    async fn next_item_number(&mut self, project_id: ProjectId) -> Result<u32> {
        // Locks the project's index range so concurrent quick pays serialize
        let next: u64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(MAX(item_number), 0) + 1 AS UNSIGNED)
            FROM purchase_orders
            WHERE project_id = ?
            FOR UPDATE
            "#,
        )
        .bind(project_id)
        .fetch_one(self.tx.as_mut())
        .await?;

        u32::try_from(next)
            .map_err(|_| AppError::Internal(format!("Item number overflow in project {}", project_id)))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))
    }
}

fn push_id_list(
    builder: &mut QueryBuilder<'_, MySql>,
    column: &str,
    ids: impl Iterator<Item = OrderId>,
) {
    builder.push(format!("{} IN (", column));
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(id);
    }
    list.push_unseparated(")");
}

fn push_status_list(builder: &mut QueryBuilder<'_, MySql>, column: &str, statuses: &[OrderStatus]) {
    if statuses.is_empty() {
        builder.push("FALSE");
        return;
    }

    builder.push(format!("{} IN (", column));
    let mut list = builder.separated(", ");
    for status in statuses {
        list.push_bind(status.as_str());
    }
    list.push_unseparated(")");
}

/// Write the `SET` list for a patch. `updated_at` is always written.
fn push_assignments(builder: &mut QueryBuilder<'_, MySql>, patch: &OrderPatch) -> Result<()> {
    let mut set = builder.separated(", ");

    set.push("updated_at = ").push_bind_unseparated(patch.updated_at);

    if let Some(status) = patch.status {
        set.push("status = ").push_bind_unseparated(status.as_str());
    }
    if let Some(source_type) = patch.source_type {
        set.push("source_type = ").push_bind_unseparated(source_type.as_str());
    }
    if let Some(money) = &patch.money {
        set.push("amount = ").push_bind_unseparated(money.amount);
        set.push("amount_pen = ").push_bind_unseparated(money.amounts.amount_pen);
        set.push("igv_amount = ").push_bind_unseparated(money.amounts.igv_amount);
        set.push("total_with_igv = ").push_bind_unseparated(money.amounts.total_with_igv);
    }
    if let Some(invoice) = &patch.invoice {
        set.push("batch_id = ").push_bind_unseparated(invoice.batch_id.clone());
        set.push("currency = ").push_bind_unseparated(invoice.currency.as_str());
        set.push("exchange_rate = ").push_bind_unseparated(invoice.exchange_rate);
        set.push("seller_name = ").push_bind_unseparated(invoice.seller_name.clone());
        set.push("seller_document = ").push_bind_unseparated(invoice.seller_document.clone());
        set.push("payment_type = ").push_bind_unseparated(invoice.payment_type.as_str());
        set.push("issue_date = ").push_bind_unseparated(invoice.issue_date);
        set.push("payment_date = ").push_bind_unseparated(invoice.payment_date);
        set.push("due_date = ").push_bind_unseparated(invoice.due_date);
        set.push("igv_enabled = ").push_bind_unseparated(invoice.igv_enabled);
        set.push("igv_rate = ").push_bind_unseparated(invoice.igv_rate);
    }
    if let Some(approval) = &patch.approval {
        set.push("approved_by = ").push_bind_unseparated(approval.by);
        set.push("approved_at = ").push_bind_unseparated(approval.at);
        if let Some(notes) = &approval.notes {
            set.push("notes = ").push_bind_unseparated(notes.clone());
        }
    }
    if let Some(source) = &patch.inventory_source {
        set.push("inventory_item_id = ").push_bind_unseparated(source.inventory_item_id);
        set.push("reference_price = ").push_bind_unseparated(source.reference_price);
    }
    if let Some(materials) = &patch.materials {
        set.push("materials = ").push_bind_unseparated(MaterialLine::encode_list(materials)?);
    }
    if let Some(payment) = &patch.payment {
        set.push("payment_confirmed = TRUE");
        set.push("payment_confirmed_at = ").push_bind_unseparated(payment.at);
        set.push("payment_confirmed_by = ").push_bind_unseparated(payment.by);
    }
    if let Some(receipt) = &patch.receipt {
        set.push("cdp_type = ").push_bind_unseparated(receipt.cdp_type.clone());
        set.push("cdp_serie = ").push_bind_unseparated(receipt.cdp_serie.clone());
        set.push("cdp_number = ").push_bind_unseparated(receipt.cdp_number.clone());
    }
    match &patch.proof {
        Some(ProofUpdate::Replace { file, link }) => {
            set.push("payment_proof = ").push_bind_unseparated(file.clone());
            set.push("payment_proof_link = ").push_bind_unseparated(link.clone());
        }
        Some(ProofUpdate::Merge { file, link }) => {
            set.push("payment_proof = COALESCE(")
                .push_bind_unseparated(file.clone())
                .push_unseparated(", payment_proof)");
            set.push("payment_proof_link = COALESCE(")
                .push_bind_unseparated(link.clone())
                .push_unseparated(", payment_proof_link)");
        }
        None => {}
    }
    if let Some(delivery) = &patch.delivery {
        set.push("delivery_confirmed = TRUE");
        set.push("delivery_confirmed_at = ").push_bind_unseparated(delivery.at);
        set.push("delivery_confirmed_by = ").push_bind_unseparated(delivery.by);
        if let Some(notes) = &delivery.notes {
            set.push("delivery_notes = ").push_bind_unseparated(notes.clone());
        }
    }

    Ok(())
}

/// Database row representation for the purchase_orders table
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: u64,
    project_id: u64,
    item_number: u32,
    order_type: String,
    description: String,
    unit: Option<String>,
    materials: Option<String>,
    amount: Option<Decimal>,
    currency: String,
    exchange_rate: Option<Decimal>,
    amount_pen: Option<Decimal>,
    igv_enabled: bool,
    igv_rate: Decimal,
    igv_amount: Option<Decimal>,
    total_with_igv: Option<Decimal>,
    status: String,
    source_type: String,
    inventory_item_id: Option<u64>,
    reference_price: Option<Decimal>,
    parent_order_id: Option<u64>,
    batch_id: Option<String>,
    created_by: Option<u64>,
    approved_by: Option<u64>,
    approved_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    seller_name: Option<String>,
    seller_document: Option<String>,
    payment_type: Option<String>,
    issue_date: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    payment_confirmed: bool,
    payment_confirmed_at: Option<DateTime<Utc>>,
    payment_confirmed_by: Option<u64>,
    cdp_type: Option<String>,
    cdp_serie: Option<String>,
    cdp_number: Option<String>,
    payment_proof: Option<String>,
    payment_proof_link: Option<String>,
    delivery_confirmed: bool,
    delivery_confirmed_at: Option<DateTime<Utc>>,
    delivery_confirmed_by: Option<u64>,
    delivery_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderWithProjectRow {
    #[sqlx(flatten)]
    order: OrderRow,
    project_name: String,
}

impl TryFrom<OrderRow> for PurchaseOrder {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let materials = MaterialLine::decode_list(row.materials.as_deref()).map_err(|e| {
            AppError::Internal(format!("Invalid materials on order {}: {}", row.id, e))
        })?;

        Ok(PurchaseOrder {
            id: row.id,
            project_id: row.project_id,
            item_number: row.item_number,
            order_type: row.order_type.parse().map_err(AppError::Internal)?,
            description: row.description,
            unit: row.unit,
            materials,
            amount: row.amount,
            currency: row.currency.parse().map_err(AppError::Internal)?,
            exchange_rate: row.exchange_rate,
            amount_pen: row.amount_pen,
            igv_enabled: row.igv_enabled,
            igv_rate: row.igv_rate,
            igv_amount: row.igv_amount,
            total_with_igv: row.total_with_igv,
            status: row.status.parse().map_err(AppError::Internal)?,
            source_type: row.source_type.parse().map_err(AppError::Internal)?,
            inventory_item_id: row.inventory_item_id,
            reference_price: row.reference_price,
            parent_order_id: row.parent_order_id,
            batch_id: row.batch_id,
            created_by: row.created_by,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            notes: row.notes,
            seller_name: row.seller_name,
            seller_document: row.seller_document,
            payment_type: row
                .payment_type
                .map(|t| t.parse())
                .transpose()
                .map_err(AppError::Internal)?,
            issue_date: row.issue_date,
            payment_date: row.payment_date,
            due_date: row.due_date,
            payment_confirmed: row.payment_confirmed,
            payment_confirmed_at: row.payment_confirmed_at,
            payment_confirmed_by: row.payment_confirmed_by,
            cdp_type: row.cdp_type,
            cdp_serie: row.cdp_serie,
            cdp_number: row.cdp_number,
            payment_proof: row.payment_proof,
            payment_proof_link: row.payment_proof_link,
            delivery_confirmed: row.delivery_confirmed,
            delivery_confirmed_at: row.delivery_confirmed_at,
            delivery_confirmed_by: row.delivery_confirmed_by,
            delivery_notes: row.delivery_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<OrderWithProjectRow> for OrderWithProject {
    type Error = AppError;

    fn try_from(row: OrderWithProjectRow) -> Result<Self> {
        Ok(OrderWithProject {
            order: row.order.try_into()?,
            project_name: row.project_name,
        })
    }
}
