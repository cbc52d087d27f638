// Inventory gateway over the inventory module's `inventario_productos` table.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use super::inventory_gateway::InventoryGateway;
use super::sku::generate_sku;
use crate::core::{AppError, OrderId, ProjectId, Result};
use crate::modules::inventory::models::{InventoryItem, InventoryMatch, ReservationLine};

const PURCHASED_CATEGORY: &str = "Materiales Comprados";
const UNNAMED_MATERIAL: &str = "Material without description";

pub struct MySqlInventoryGateway {
    pool: MySqlPool,
}

impl MySqlInventoryGateway {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn sku_exists(&self, sku: &str) -> Result<bool> {
        let found: Option<u64> =
            sqlx::query_scalar("SELECT id FROM inventario_productos WHERE sku = ? LIMIT 1")
                .bind(sku)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }
}

/// Escape LIKE wildcards so user input only matches literally
pub fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl InventoryGateway for MySqlInventoryGateway {
    async fn search(&self, query: &str, project_id: Option<ProjectId>) -> Result<Vec<InventoryMatch>> {
        let pattern = format!("%{}%", escape_like(query.trim()));

        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT
                id, nombre, descripcion, sku, cantidad, precio, moneda, unidad,
                diameter, series, material_type, project_id, nombre_proyecto, apartado
            FROM inventario_productos
            WHERE (
                nombre LIKE ? OR descripcion LIKE ? OR sku LIKE ?
                OR diameter LIKE ? OR series LIKE ? OR material_type LIKE ?
            )
            AND cantidad > 0
            ORDER BY CASE WHEN apartado THEN 1 ELSE 0 END, nombre ASC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to search inventory: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(InventoryItem::from)
            .map(|item| item.to_match(project_id))
            .collect())
    }

    async fn deduct_stock(&self, item_id: Option<u64>, qty: Decimal, order_id: OrderId) -> Result<()> {
        let Some(item_id) = item_id else {
            return Ok(());
        };
        if qty <= Decimal::ZERO {
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE inventario_productos
            SET cantidad = GREATEST(cantidad - ?, 0), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(qty)
        .bind(Utc::now())
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to deduct stock: {}", e)))?;

        if result.rows_affected() == 0 {
            tracing::warn!(inventory_item_id = item_id, order_id, "Inventory item not found for deduction");
            return Ok(());
        }

        tracing::info!(
            inventory_item_id = item_id,
            qty_deducted = %qty,
            purchase_order_id = order_id,
            "Stock deducted from inventory"
        );

        Ok(())
    }

    async fn register_purchased_items(
        &self,
        project_id: ProjectId,
        items: &[ReservationLine],
        batch_id: &str,
        project_name: &str,
    ) -> Result<()> {
        for item in items {
            let now = Utc::now();
            let sku = generate_sku(batch_id, &item.description, now);

            if self.sku_exists(&sku).await? {
                tracing::debug!(sku = %sku, batch_id, "SKU already registered, skipping line");
                continue;
            }

            let name = if item.description.trim().is_empty() {
                UNNAMED_MATERIAL.to_string()
            } else {
                item.description.clone()
            };

            sqlx::query(
                r#"
                INSERT INTO inventario_productos (
                    nombre, sku, descripcion, cantidad, unidad, precio, moneda, categoria,
                    ubicacion, estado, apartado, nombre_proyecto, estado_ubicacion,
                    project_id, batch_id, diameter, series, material_type,
                    amount, amount_pen, created_at, updated_at
                ) VALUES (
                    ?, ?, ?, ?, ?, ?, ?, ?,
                    NULL, 'activo', TRUE, ?, 'pendiente',
                    ?, ?, ?, ?, ?,
                    ?, ?, ?, ?
                )
                "#,
            )
            .bind(name)
            .bind(&sku)
            .bind(&item.description)
            .bind(item.qty)
            .bind(&item.unit)
            .bind(item.subtotal)
            .bind(item.currency.as_str())
            .bind(PURCHASED_CATEGORY)
            .bind(project_name)
            .bind(project_id)
            .bind(batch_id)
            .bind(&item.diameter)
            .bind(&item.series)
            .bind(&item.material_type)
            .bind(item.subtotal)
            .bind(item.amount_pen)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to register purchased item: {}", e)))?;

            tracing::info!(sku = %sku, batch_id, project_id, "Purchased item added to inventory");
        }

        Ok(())
    }
}

/// Database row representation for the inventario_productos table
#[derive(sqlx::FromRow)]
struct InventoryRow {
    id: u64,
    nombre: String,
    descripcion: Option<String>,
    sku: Option<String>,
    cantidad: Decimal,
    precio: Decimal,
    moneda: Option<String>,
    unidad: Option<String>,
    diameter: Option<String>,
    series: Option<String>,
    material_type: Option<String>,
    project_id: Option<u64>,
    nombre_proyecto: Option<String>,
    apartado: bool,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            id: row.id,
            name: row.nombre,
            description: row.descripcion,
            sku: row.sku,
            quantity: row.cantidad,
            total_price: row.precio,
            currency: row.moneda,
            unit: row.unidad,
            diameter: row.diameter,
            series: row.series,
            material_type: row.material_type,
            project_id: row.project_id,
            project_name: row.nombre_proyecto,
            set_aside: row.apartado,
        }
    }
}
