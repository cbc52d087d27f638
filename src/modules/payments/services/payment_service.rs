// Payment engine: confirms payment of approved or queued orders, records the fiscal
// receipt and proof of payment, and creates already-paid orders for purchases made
// on the spot. Same transaction discipline as the approval engine, including the rate
// lookup ahead of the transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::{ActorId, AppError, OrderId, ProjectId, Result};
use crate::modules::approvals::services::{single_order_batch_id, BatchKind};
use crate::modules::exchange_rates::{rate_for, ExchangeRateGateway};
use crate::modules::inventory::{InventoryEffects, InventoryGateway};
use crate::modules::orders::models::{
    ApprovalStamp, DeliveryStamp, InvoiceFields, MaterialLine, MoneyFields, OrderPatch,
    OrderStatus, OrderType, OrderWithProject, PurchaseOrder, SourceType, Stamp,
};
use crate::modules::orders::repositories::{transition, OrderRepository, OrderTransaction};
use crate::modules::payments::models::{
    ConfirmPaymentRequest, PayBatchRequest, PayBulkRequest, PaymentOutcome, QuickPayItem,
    QuickPayRequest, UpdateReceiptRequest,
};
use crate::modules::projects::ProjectDirectory;
use crate::modules::taxes::{AmountCalculator, IgvSettings};

const DEFAULT_UNIT: &str = "UND";

pub struct PaymentService {
    orders: Arc<dyn OrderRepository>,
    rates: Arc<dyn ExchangeRateGateway>,
    inventory: Arc<dyn InventoryGateway>,
    projects: Arc<dyn ProjectDirectory>,
}

impl PaymentService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        rates: Arc<dyn ExchangeRateGateway>,
        inventory: Arc<dyn InventoryGateway>,
        projects: Arc<dyn ProjectDirectory>,
    ) -> Self {
        Self {
            orders,
            rates,
            inventory,
            projects,
        }
    }

    /// Mark every queued order of a batch approved and paid, then register its
    /// purchased materials as set-aside stock.
    pub async fn pay_batch(&self, request: PayBatchRequest, actor: ActorId) -> Result<PaymentOutcome> {
        request.validate().map_err(|e| e.logged("pay_batch"))?;

        let (outcome, effects) = self
            .run_pay_batch(&request, actor)
            .await
            .map_err(|e| e.logged("pay_batch"))?;

        let inventory_failures = effects.apply(self.inventory.as_ref()).await;
        tracing::info!(
            batch_id = %request.batch_id,
            orders = outcome.orders,
            inventory_failures,
            actor,
            "Batch paid"
        );

        Ok(outcome)
    }

    async fn run_pay_batch(
        &self,
        request: &PayBatchRequest,
        actor: ActorId,
    ) -> Result<(PaymentOutcome, InventoryEffects)> {
        let batch_id = request.batch_id.trim();
        let now = Utc::now();
        let mut tx = self.orders.begin().await?;

        let patch = OrderPatch {
            status: Some(OrderStatus::Approved),
            payment: Some(Stamp { by: actor, at: now }),
            receipt: Some(request.receipt.normalized()),
            proof: Some(request.proof.replace()),
            ..OrderPatch::at(now)
        };
        let paid = tx
            .update_where_batch(batch_id, OrderStatus::ToPay, &patch)
            .await?;
        if paid == 0 {
            return Err(AppError::not_found(format!(
                "No orders waiting for payment in batch {}",
                batch_id
            )));
        }

        let mut effects = InventoryEffects::new();
        for row in tx.find_batch_with_project(batch_id).await? {
            if is_purchased_material(&row.order) {
                register_stored_amount(&mut effects, &row, batch_id);
            }
        }

        tx.commit().await?;

        let outcome = PaymentOutcome::new(
            format!("{} orders paid", paid),
            Some(batch_id.to_string()),
            paid as usize,
        );
        Ok((outcome, effects))
    }

    /// Create one approved, paid material order per item and register the items.
    pub async fn quick_pay(&self, request: QuickPayRequest, actor: ActorId) -> Result<PaymentOutcome> {
        let project_id = request.validate().map_err(|e| e.logged("quick_pay"))?;

        let (outcome, effects) = self
            .run_quick_pay(project_id, &request, actor)
            .await
            .map_err(|e| e.logged("quick_pay"))?;

        let inventory_failures = effects.apply(self.inventory.as_ref()).await;
        tracing::info!(
            batch_id = outcome.batch_id.as_deref().unwrap_or_default(),
            project_id,
            orders = outcome.orders,
            inventory_failures,
            actor,
            "Quick payment registered"
        );

        Ok(outcome)
    }

    async fn run_quick_pay(
        &self,
        project_id: ProjectId,
        request: &QuickPayRequest,
        actor: ActorId,
    ) -> Result<(PaymentOutcome, InventoryEffects)> {
        let project_name = self.projects.project_name(project_id).await?;
        let invoice = request.invoice();
        let exchange_rate = rate_for(self.rates.as_ref(), invoice.currency).await?;
        let mut tx = self.orders.begin().await?;

        let batch_id = BatchKind::QuickPay.generate();
        let now = Utc::now();
        let fields = invoice.to_fields(&batch_id, exchange_rate);
        let first_item_number = tx.next_item_number(project_id).await?;

        let mut effects = InventoryEffects::new();
        for (index, item) in request.items.iter().enumerate() {
            let item_number = first_item_number + index as u32;
            let mut order = quick_pay_order(project_id, item_number, item, actor, now);

            let amounts = AmountCalculator::for_settings(
                item.subtotal,
                fields.currency,
                exchange_rate,
                IgvSettings {
                    enabled: false,
                    rate: fields.igv_rate,
                },
            )?
            .rounded();
            let patch = OrderPatch {
                status: Some(OrderStatus::Approved),
                source_type: Some(SourceType::External),
                money: Some(MoneyFields {
                    amount: item.subtotal,
                    amounts,
                }),
                invoice: Some(fields.clone()),
                approval: Some(ApprovalStamp {
                    by: actor,
                    at: now,
                    notes: None,
                }),
                payment: Some(Stamp { by: actor, at: now }),
                receipt: Some(request.receipt.normalized()),
                proof: Some(request.proof.replace()),
                ..OrderPatch::at(now)
            };
            order.apply(&patch);
            order.id = tx.insert(&order).await?;

            tracing::debug!(order_id = order.id, item_number, "Quick payment order created");

            let row = OrderWithProject {
                order,
                project_name: project_name.clone(),
            };
            effects.register_order(
                &row,
                item.subtotal,
                fields.currency,
                amounts.amount_pen,
                &batch_id,
            );
        }

        tx.commit().await?;

        let count = request.items.len();
        let outcome = PaymentOutcome::new(
            format!("{} items paid and registered", count),
            Some(batch_id),
            count,
        );
        Ok((outcome, effects))
    }

    /// Approve and pay queued orders in one step under a new payment batch
    pub async fn pay_bulk(&self, request: PayBulkRequest, actor: ActorId) -> Result<PaymentOutcome> {
        request.validate().map_err(|e| e.logged("pay_bulk"))?;

        let outcome = self
            .run_pay_bulk(&request, actor)
            .await
            .map_err(|e| e.logged("pay_bulk"))?;

        tracing::info!(
            batch_id = outcome.batch_id.as_deref().unwrap_or_default(),
            orders = outcome.orders,
            actor,
            "Orders paid in bulk"
        );

        Ok(outcome)
    }

    async fn run_pay_bulk(&self, request: &PayBulkRequest, actor: ActorId) -> Result<PaymentOutcome> {
        let exchange_rate = rate_for(self.rates.as_ref(), request.invoice.currency).await?;
        let mut tx = self.orders.begin().await?;

        if !tx
            .all_have_status(&request.order_ids, &[OrderStatus::ToPay])
            .await?
        {
            return Err(AppError::precondition(
                "Some orders are not waiting for payment",
            ));
        }

        let batch_id = BatchKind::Payment.generate();
        let now = Utc::now();
        let fields = request.invoice.to_fields(&batch_id, exchange_rate);
        let igv = request.invoice.igv();

        let mut paid = 0;
        for &id in &request.order_ids {
            let price = request.price_of(id);
            if price <= Decimal::ZERO {
                continue;
            }

            let patch = paid_purchase_patch(
                price,
                &fields,
                igv,
                ApprovalStamp {
                    by: actor,
                    at: now,
                    notes: request.invoice.notes.clone(),
                },
                now,
            )?;
            transition(tx.as_mut(), &[id], &[OrderStatus::ToPay], &patch).await?;
            paid += 1;
        }

        tx.commit().await?;

        Ok(PaymentOutcome::new(
            format!("{} orders paid", paid),
            Some(batch_id),
            paid,
        ))
    }

    /// Confirm payment of one approved order with its receipt and proof
    pub async fn confirm_payment(
        &self,
        order_id: OrderId,
        request: ConfirmPaymentRequest,
        actor: ActorId,
    ) -> Result<PaymentOutcome> {
        request.validate().map_err(|e| e.logged("confirm_payment"))?;

        let (outcome, effects) = self
            .run_confirm_payment(order_id, &request, actor)
            .await
            .map_err(|e| e.logged("confirm_payment"))?;

        let inventory_failures = effects.apply(self.inventory.as_ref()).await;
        tracing::info!(order_id, inventory_failures, actor, "Payment confirmed");

        Ok(outcome)
    }

    async fn run_confirm_payment(
        &self,
        order_id: OrderId,
        request: &ConfirmPaymentRequest,
        actor: ActorId,
    ) -> Result<(PaymentOutcome, InventoryEffects)> {
        let mut tx = self.orders.begin().await?;

        let order = find_order(tx.as_mut(), order_id).await?;
        if order.status != OrderStatus::Approved {
            return Err(AppError::precondition(
                "Only approved orders can be confirmed as paid",
            ));
        }

        let now = Utc::now();
        let patch = OrderPatch {
            payment: Some(Stamp { by: actor, at: now }),
            receipt: Some(request.receipt.normalized()),
            proof: Some(request.proof.replace()),
            ..OrderPatch::at(now)
        };
        transition(tx.as_mut(), &[order_id], &[OrderStatus::Approved], &patch).await?;

        let mut effects = InventoryEffects::new();
        for row in tx.find_with_project(&[order_id]).await? {
            if !is_purchased_material(&row.order) {
                continue;
            }
            let batch_id = row
                .order
                .batch_id
                .clone()
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| single_order_batch_id(BatchKind::Payment, order_id, now));
            register_stored_amount(&mut effects, &row, &batch_id);
        }

        tx.commit().await?;

        Ok((
            PaymentOutcome::new("Payment confirmed", order.batch_id, 1),
            effects,
        ))
    }

    /// Replace the receipt of every paid order in a batch. Proof values are only
    /// overwritten when supplied.
    pub async fn update_receipt(
        &self,
        request: UpdateReceiptRequest,
        actor: ActorId,
    ) -> Result<PaymentOutcome> {
        request.validate().map_err(|e| e.logged("update_receipt"))?;

        let outcome = self
            .run_update_receipt(&request)
            .await
            .map_err(|e| e.logged("update_receipt"))?;

        tracing::info!(
            batch_id = %request.batch_id,
            orders = outcome.orders,
            actor,
            "Batch receipt updated"
        );

        Ok(outcome)
    }

    async fn run_update_receipt(&self, request: &UpdateReceiptRequest) -> Result<PaymentOutcome> {
        let batch_id = request.batch_id.trim();
        let mut tx = self.orders.begin().await?;

        let patch = OrderPatch {
            receipt: Some(request.receipt.normalized()),
            proof: Some(request.proof.merge()),
            ..OrderPatch::at(Utc::now())
        };
        let updated = tx.update_confirmed_batch(batch_id, &patch).await?;
        if updated == 0 {
            return Err(AppError::not_found(format!(
                "No paid orders in batch {}",
                batch_id
            )));
        }

        tx.commit().await?;

        Ok(PaymentOutcome::new(
            "Receipt updated",
            Some(batch_id.to_string()),
            updated as usize,
        ))
    }

    /// Record that the goods of a paid order arrived
    pub async fn confirm_delivery(
        &self,
        order_id: OrderId,
        notes: Option<String>,
        actor: ActorId,
    ) -> Result<PaymentOutcome> {
        let outcome = self
            .run_confirm_delivery(order_id, notes, actor)
            .await
            .map_err(|e| e.logged("confirm_delivery"))?;

        tracing::info!(order_id, actor, "Delivery confirmed");
        Ok(outcome)
    }

    async fn run_confirm_delivery(
        &self,
        order_id: OrderId,
        notes: Option<String>,
        actor: ActorId,
    ) -> Result<PaymentOutcome> {
        let mut tx = self.orders.begin().await?;

        let order = find_order(tx.as_mut(), order_id).await?;
        if !order.payment_confirmed {
            return Err(AppError::precondition(
                "The order must be paid before delivery is confirmed",
            ));
        }
        if order.delivery_confirmed {
            return Err(AppError::precondition("Delivery was already confirmed"));
        }

        let now = Utc::now();
        let patch = OrderPatch {
            delivery: Some(DeliveryStamp {
                by: actor,
                at: now,
                notes: notes.filter(|n| !n.trim().is_empty()),
            }),
            ..OrderPatch::at(now)
        };
        transition(tx.as_mut(), &[order_id], &[order.status], &patch).await?;

        tx.commit().await?;

        Ok(PaymentOutcome::new("Delivery confirmed", order.batch_id, 1))
    }
}

async fn find_order(tx: &mut dyn OrderTransaction, order_id: OrderId) -> Result<PurchaseOrder> {
    tx.find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))
}

/// Material bought from a seller; stock-served rows were never purchased
fn is_purchased_material(order: &PurchaseOrder) -> bool {
    order.is_material() && order.source_type == SourceType::External
}

/// Queue registration tagged with the amount already stored on the order
fn register_stored_amount(effects: &mut InventoryEffects, row: &OrderWithProject, batch_id: &str) {
    effects.register_order(
        row,
        row.order.amount.unwrap_or(Decimal::ZERO),
        row.order.currency,
        row.order.amount_pen.unwrap_or(Decimal::ZERO),
        batch_id,
    );
}

fn paid_purchase_patch(
    amount: Decimal,
    fields: &InvoiceFields,
    igv: IgvSettings,
    approval: ApprovalStamp,
    now: DateTime<Utc>,
) -> Result<OrderPatch> {
    let amounts =
        AmountCalculator::for_settings(amount, fields.currency, fields.exchange_rate, igv)?.rounded();

    Ok(OrderPatch {
        status: Some(OrderStatus::Approved),
        source_type: Some(SourceType::External),
        money: Some(MoneyFields { amount, amounts }),
        invoice: Some(fields.clone()),
        payment: Some(Stamp {
            by: approval.by,
            at: now,
        }),
        approval: Some(approval),
        ..OrderPatch::at(now)
    })
}

/// Pending-shaped row for one quick payment item; the caller applies the paid patch
fn quick_pay_order(
    project_id: ProjectId,
    item_number: u32,
    item: &QuickPayItem,
    actor: ActorId,
    now: DateTime<Utc>,
) -> PurchaseOrder {
    let description = item.description.trim().to_string();
    let line = MaterialLine {
        diameter: item.diameter.clone(),
        series: item.series.clone(),
        material_type: item.material_type.clone(),
        ..MaterialLine::new(description.clone(), item.qty)
    };

    let mut order =
        PurchaseOrder::new_pending(project_id, item_number, OrderType::Material, description, vec![line]);
    order.unit = Some(
        item.unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_UNIT)
            .to_string(),
    );
    order.created_by = Some(actor);
    order.created_at = now;
    order
}
