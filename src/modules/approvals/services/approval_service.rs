// Approval and fulfillment engine.
//
// Every operation validates its request before touching the store and takes its one
// exchange rate before opening the order transaction, so no row lock waits on the
// rate provider. Inside the transaction: status precondition, guarded writes, commit.
// Inventory effects are collected on the way and applied only after the commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::{ActorId, AppError, Currency, OrderId, Result};
use crate::modules::approvals::models::{
    ApprovalOutcome, ApproveBatchRequest, ApproveBatchSummary, ApproveBulkRequest,
    ApproveOrderRequest, BulkApprovalSummary, FulfillmentInstruction,
};
use crate::modules::approvals::services::batch_id::{single_order_batch_id, BatchKind};
use crate::modules::exchange_rates::{rate_for, ExchangeRateGateway};
use crate::modules::inventory::{InventoryEffects, InventoryGateway};
use crate::modules::orders::models::{
    ApprovalStamp, DeliveryStamp, InventorySource, InvoiceFields, MaterialLine, MoneyFields,
    OrderPatch, OrderStatus, OrderWithProject, PurchaseOrder, SourceType, Stamp,
};
use crate::modules::orders::repositories::{transition, OrderRepository, OrderTransaction};
use crate::modules::taxes::{AmountCalculator, IgvSettings};

const INVENTORY_SUFFIX: &str = " [De Inventario]";
const DEFAULT_REJECTION_NOTE: &str = "Rejected";

pub struct ApprovalService {
    orders: Arc<dyn OrderRepository>,
    rates: Arc<dyn ExchangeRateGateway>,
    inventory: Arc<dyn InventoryGateway>,
}

/// Column values every order of one request shares
struct SharedFields {
    invoice: InvoiceFields,
    approval: ApprovalStamp,
    currency: Currency,
    exchange_rate: Option<Decimal>,
    igv: IgvSettings,
    actor: ActorId,
    now: DateTime<Utc>,
}

impl SharedFields {
    fn money(&self, amount: Decimal) -> Result<MoneyFields> {
        let amounts =
            AmountCalculator::for_settings(amount, self.currency, self.exchange_rate, self.igv)?;
        Ok(MoneyFields {
            amount,
            amounts: amounts.rounded(),
        })
    }

    fn amount_pen(&self, amount: Decimal) -> Result<Decimal> {
        AmountCalculator::convert_to_pen(amount, self.currency, self.exchange_rate)
            .map(|pen| Currency::PEN.round(pen))
    }

    /// Patch of an order served from stock: approved, zero cost, paid and delivered
    fn inventory_patch(&self, inventory_item_id: Option<u64>, reference_price: Decimal) -> OrderPatch {
        OrderPatch {
            status: Some(OrderStatus::Approved),
            source_type: Some(SourceType::Inventory),
            money: Some(MoneyFields::zero()),
            invoice: Some(self.invoice.clone()),
            approval: Some(self.approval.clone()),
            inventory_source: Some(InventorySource {
                inventory_item_id,
                reference_price,
            }),
            payment: Some(Stamp {
                by: self.actor,
                at: self.now,
            }),
            delivery: Some(DeliveryStamp {
                by: self.actor,
                at: self.now,
                notes: None,
            }),
            ..OrderPatch::at(self.now)
        }
    }

    /// Patch of an order bought from the seller at `amount`
    fn purchase_patch(&self, status: OrderStatus, amount: Decimal) -> Result<OrderPatch> {
        Ok(OrderPatch {
            status: Some(status),
            source_type: Some(SourceType::External),
            money: Some(self.money(amount)?),
            invoice: Some(self.invoice.clone()),
            approval: Some(self.approval.clone()),
            ..OrderPatch::at(self.now)
        })
    }
}

impl ApprovalService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        rates: Arc<dyn ExchangeRateGateway>,
        inventory: Arc<dyn InventoryGateway>,
    ) -> Self {
        Self {
            orders,
            rates,
            inventory,
        }
    }

    /// Approve a batch of pending orders, serving each from inventory, from a split
    /// between inventory and purchase, or from an external purchase.
    pub async fn approve_batch(
        &self,
        request: ApproveBatchRequest,
        actor: ActorId,
    ) -> Result<ApproveBatchSummary> {
        let plan = request.plan().map_err(|e| e.logged("approve_batch"))?;

        let (summary, effects) = self
            .run_approve_batch(&request, &plan, actor)
            .await
            .map_err(|e| e.logged("approve_batch"))?;

        let inventory_failures = effects.apply(self.inventory.as_ref()).await;

        tracing::info!(
            batch_id = %summary.batch_id,
            fulfilled_from_inventory = summary.fulfilled_from_inventory,
            routed_to_purchase = summary.routed_to_purchase,
            skipped = summary.skipped,
            inventory_failures,
            actor,
            "Order batch approved"
        );

        Ok(summary)
    }

    async fn run_approve_batch(
        &self,
        request: &ApproveBatchRequest,
        plan: &[(OrderId, FulfillmentInstruction)],
        actor: ActorId,
    ) -> Result<(ApproveBatchSummary, InventoryEffects)> {
        let currency = request.invoice.currency;
        let exchange_rate = rate_for(self.rates.as_ref(), currency).await?;
        let mut tx = self.orders.begin().await?;

        if !tx
            .all_have_status(&request.order_ids, &[OrderStatus::Pending])
            .await?
        {
            return Err(AppError::precondition("Some orders were already processed"));
        }

        let batch_id = BatchKind::Approval.generate();
        let now = Utc::now();
        let shared = SharedFields {
            invoice: request.invoice.to_fields(&batch_id, exchange_rate),
            approval: ApprovalStamp {
                by: actor,
                at: now,
                notes: request.invoice.notes.clone(),
            },
            currency,
            exchange_rate,
            igv: request.invoice.igv(),
            actor,
            now,
        };

        // Split originals are checked before the first write
        let mut originals: HashMap<OrderId, PurchaseOrder> = HashMap::new();
        for (id, instruction) in plan {
            if let FulfillmentInstruction::Split {
                qty_from_inventory,
                qty_to_buy,
                ..
            } = instruction
            {
                let order = tx
                    .find_by_id(*id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
                check_split_quantities(&order, *qty_from_inventory, *qty_to_buy)?;
                originals.insert(*id, order);
            }
        }

        let mut effects = InventoryEffects::new();
        let mut fulfilled_from_inventory = 0;
        let mut skipped = 0;
        let mut purchase_ids = Vec::new();

        for (id, instruction) in plan {
            let id = *id;
            let price = request.price_of(id);

            match instruction {
                FulfillmentInstruction::Inventory {
                    inventory_item_id,
                    qty_from_inventory,
                    reference_price,
                } => {
                    let patch =
                        shared.inventory_patch(*inventory_item_id, reference_price.unwrap_or(price));
                    transition(tx.as_mut(), &[id], &[OrderStatus::Pending], &patch).await?;

                    effects.deduct(*inventory_item_id, *qty_from_inventory, id);
                    fulfilled_from_inventory += 1;
                    tracing::debug!(order_id = id, "Order fulfilled from inventory");
                }
                FulfillmentInstruction::Split {
                    inventory_item_id,
                    qty_from_inventory,
                    qty_to_buy,
                    reference_price,
                } => {
                    let original = originals
                        .get(&id)
                        .ok_or_else(|| AppError::internal(format!("Split order {} was not loaded", id)))?;

                    let patch = OrderPatch {
                        materials: Some(MaterialLine::with_quantity(&original.materials, *qty_to_buy, true)),
                        ..shared.purchase_patch(OrderStatus::ToPay, price)?
                    };
                    transition(tx.as_mut(), &[id], &[OrderStatus::Pending], &patch).await?;

                    let sibling = split_sibling(
                        original,
                        *qty_from_inventory,
                        shared.inventory_patch(*inventory_item_id, *reference_price),
                        actor,
                    );
                    let sibling_id = tx.insert(&sibling).await?;

                    effects.deduct(*inventory_item_id, *qty_from_inventory, sibling_id);
                    fulfilled_from_inventory += 1;
                    purchase_ids.push(id);
                    tracing::debug!(order_id = id, sibling_id, "Order split between inventory and purchase");
                }
                FulfillmentInstruction::External => {
                    if price <= Decimal::ZERO {
                        skipped += 1;
                        tracing::debug!(order_id = id, "No price given, order left pending");
                        continue;
                    }

                    let patch = shared.purchase_patch(OrderStatus::ToPay, price)?;
                    transition(tx.as_mut(), &[id], &[OrderStatus::Pending], &patch).await?;
                    purchase_ids.push(id);
                }
            }
        }

        let purchased = tx.find_with_project(&purchase_ids).await?;
        register_purchases(
            &mut effects,
            &purchased,
            |id| request.price_of(id),
            &shared,
            &batch_id,
        )?;

        tx.commit().await?;

        let summary = ApproveBatchSummary::new(
            batch_id,
            fulfilled_from_inventory,
            purchase_ids.len(),
            skipped,
        );
        Ok((summary, effects))
    }

    /// Send one order to the payment queue. Orders already there are accepted again.
    pub async fn mark_to_pay(&self, order_id: OrderId, actor: ActorId) -> Result<()> {
        let effects = self
            .run_mark_to_pay(order_id)
            .await
            .map_err(|e| e.logged("mark_to_pay"))?;

        effects.apply(self.inventory.as_ref()).await;
        tracing::info!(order_id, actor, "Order sent to payment");

        Ok(())
    }

    async fn run_mark_to_pay(&self, order_id: OrderId) -> Result<InventoryEffects> {
        let accepted = [OrderStatus::Pending, OrderStatus::ToPay];
        let mut tx = self.orders.begin().await?;

        let order = find_order(tx.as_mut(), order_id).await?;
        if !accepted.contains(&order.status) {
            return Err(AppError::precondition("This order was already processed"));
        }
        if order.currency.requires_exchange_rate() && order.exchange_rate.is_none() {
            return Err(AppError::validation(format!(
                "Order {} is in {} without an exchange rate",
                order_id, order.currency
            )));
        }

        let now = Utc::now();
        let patch = OrderPatch {
            status: Some(OrderStatus::ToPay),
            ..OrderPatch::at(now)
        };
        transition(tx.as_mut(), &[order_id], &accepted, &patch).await?;

        let mut effects = InventoryEffects::new();
        for row in tx.find_with_project(&[order_id]).await? {
            if !row.order.is_material() {
                continue;
            }
            let batch_id = row
                .order
                .batch_id
                .clone()
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| single_order_batch_id(BatchKind::Approval, order_id, now));
            let amount = row.order.amount.unwrap_or(Decimal::ZERO);
            let amount_pen = row.order.amount_pen.unwrap_or(Decimal::ZERO);
            effects.register_order(&row, amount, row.order.currency, amount_pen, &batch_id);
        }

        tx.commit().await?;
        Ok(effects)
    }

    /// Approve one pending order at a price
    pub async fn approve(
        &self,
        order_id: OrderId,
        request: ApproveOrderRequest,
        actor: ActorId,
    ) -> Result<ApprovalOutcome> {
        request.validate().map_err(|e| e.logged("approve"))?;

        let (outcome, effects) = self
            .run_approve(order_id, &request, actor)
            .await
            .map_err(|e| e.logged("approve"))?;

        effects.apply(self.inventory.as_ref()).await;
        tracing::info!(order_id, actor, amount_pen = %outcome.amount_pen, "Order approved");

        Ok(outcome)
    }

    async fn run_approve(
        &self,
        order_id: OrderId,
        request: &ApproveOrderRequest,
        actor: ActorId,
    ) -> Result<(ApprovalOutcome, InventoryEffects)> {
        let currency = request.invoice.currency;
        let exchange_rate = rate_for(self.rates.as_ref(), currency).await?;
        let mut tx = self.orders.begin().await?;

        let order = find_order(tx.as_mut(), order_id).await?;
        if !order.is_pending() {
            return Err(AppError::precondition("This order was already processed"));
        }

        let now = Utc::now();
        let batch_id = single_order_batch_id(BatchKind::Approval, order_id, now);
        let shared = SharedFields {
            invoice: request.invoice.to_fields(&batch_id, exchange_rate),
            approval: ApprovalStamp {
                by: actor,
                at: now,
                notes: request.invoice.notes.clone(),
            },
            currency,
            exchange_rate,
            igv: request.invoice.igv(),
            actor,
            now,
        };

        let patch = shared.purchase_patch(OrderStatus::Approved, request.amount)?;
        let amount_pen = patch
            .money
            .map(|m| m.amounts.amount_pen)
            .unwrap_or(Decimal::ZERO);
        transition(tx.as_mut(), &[order_id], &[OrderStatus::Pending], &patch).await?;

        let mut effects = InventoryEffects::new();
        let approved = tx.find_with_project(&[order_id]).await?;
        register_purchases(&mut effects, &approved, |_| request.amount, &shared, &batch_id)?;

        tx.commit().await?;

        let outcome = ApprovalOutcome {
            success: true,
            message: "Order approved".to_string(),
            exchange_rate,
            amount_pen,
        };
        Ok((outcome, effects))
    }

    /// Approve pending orders directly, skipping the payment queue
    pub async fn approve_bulk(
        &self,
        request: ApproveBulkRequest,
        actor: ActorId,
    ) -> Result<BulkApprovalSummary> {
        request.validate().map_err(|e| e.logged("approve_bulk"))?;

        let (summary, effects) = self
            .run_approve_bulk(&request, actor)
            .await
            .map_err(|e| e.logged("approve_bulk"))?;

        effects.apply(self.inventory.as_ref()).await;
        tracing::info!(batch_id = %summary.batch_id, approved = summary.approved, actor, "Orders approved in bulk");

        Ok(summary)
    }

    async fn run_approve_bulk(
        &self,
        request: &ApproveBulkRequest,
        actor: ActorId,
    ) -> Result<(BulkApprovalSummary, InventoryEffects)> {
        let currency = request.invoice.currency;
        let exchange_rate = rate_for(self.rates.as_ref(), currency).await?;
        let mut tx = self.orders.begin().await?;

        if !tx
            .all_have_status(&request.order_ids, &[OrderStatus::Pending])
            .await?
        {
            return Err(AppError::precondition("Some orders were already processed"));
        }

        let batch_id = BatchKind::Bulk.generate();
        let now = Utc::now();
        let shared = SharedFields {
            invoice: request.invoice.to_fields(&batch_id, exchange_rate),
            approval: ApprovalStamp {
                by: actor,
                at: now,
                notes: request.invoice.notes.clone(),
            },
            currency,
            exchange_rate,
            igv: request.invoice.igv(),
            actor,
            now,
        };

        let price_of = |id: OrderId| request.prices.get(&id).copied().unwrap_or(Decimal::ZERO);

        let mut approved_ids = Vec::new();
        for &id in &request.order_ids {
            let price = price_of(id);
            if price <= Decimal::ZERO {
                continue;
            }

            let patch = shared.purchase_patch(OrderStatus::Approved, price)?;
            transition(tx.as_mut(), &[id], &[OrderStatus::Pending], &patch).await?;
            approved_ids.push(id);
        }

        let mut effects = InventoryEffects::new();
        let approved = tx.find_with_project(&approved_ids).await?;
        register_purchases(&mut effects, &approved, price_of, &shared, &batch_id)?;

        tx.commit().await?;

        let summary = BulkApprovalSummary {
            success: true,
            message: format!("{} orders approved", approved_ids.len()),
            approved: approved_ids.len(),
            batch_id,
        };
        Ok((summary, effects))
    }

    /// Reject a pending order. Rejection is final.
    pub async fn reject(&self, order_id: OrderId, notes: Option<String>, actor: ActorId) -> Result<()> {
        self.run_reject(order_id, notes, actor)
            .await
            .map_err(|e| e.logged("reject"))?;

        tracing::info!(order_id, actor, "Order rejected");
        Ok(())
    }

    async fn run_reject(&self, order_id: OrderId, notes: Option<String>, actor: ActorId) -> Result<()> {
        let mut tx = self.orders.begin().await?;

        let order = find_order(tx.as_mut(), order_id).await?;
        if !order.is_pending() {
            return Err(AppError::precondition("This order was already processed"));
        }

        let now = Utc::now();
        let notes = notes
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_NOTE.to_string());
        let patch = OrderPatch {
            status: Some(OrderStatus::Rejected),
            approval: Some(ApprovalStamp {
                by: actor,
                at: now,
                notes: Some(notes),
            }),
            ..OrderPatch::at(now)
        };
        transition(tx.as_mut(), &[order_id], &[OrderStatus::Pending], &patch).await?;

        tx.commit().await
    }
}

async fn find_order(tx: &mut dyn OrderTransaction, order_id: OrderId) -> Result<PurchaseOrder> {
    tx.find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))
}

/// Each material line of a split order must be fully covered by stock plus purchase
fn check_split_quantities(
    order: &PurchaseOrder,
    qty_from_inventory: Decimal,
    qty_to_buy: Decimal,
) -> Result<()> {
    let covered = qty_from_inventory + qty_to_buy;

    match order.materials.iter().find(|line| line.qty != covered) {
        Some(line) => Err(AppError::validation(format!(
            "Order {}: {} from inventory plus {} to buy does not match the {} needed",
            order.id, qty_from_inventory, qty_to_buy, line.qty
        ))),
        None => Ok(()),
    }
}

/// New approved row for the inventory-covered part of a split order
fn split_sibling(
    original: &PurchaseOrder,
    qty_from_inventory: Decimal,
    patch: OrderPatch,
    actor: ActorId,
) -> PurchaseOrder {
    let mut sibling = PurchaseOrder::new_pending(
        original.project_id,
        original.item_number,
        original.order_type,
        format!("{}{}", original.description, INVENTORY_SUFFIX),
        MaterialLine::with_quantity(&original.materials, qty_from_inventory, false),
    );
    sibling.unit = original.unit.clone();
    sibling.parent_order_id = Some(original.id);
    sibling.created_by = original.created_by.or(Some(actor));
    sibling.created_at = patch.updated_at;
    sibling.apply(&patch);
    sibling
}

/// Queue inventory registration for the purchased material orders among `rows`
fn register_purchases(
    effects: &mut InventoryEffects,
    rows: &[OrderWithProject],
    price_of: impl Fn(OrderId) -> Decimal,
    shared: &SharedFields,
    batch_id: &str,
) -> Result<()> {
    for row in rows {
        if !row.order.is_material() || row.order.source_type != SourceType::External {
            continue;
        }

        let amount = price_of(row.order.id);
        if amount <= Decimal::ZERO {
            continue;
        }

        effects.register_order(row, amount, shared.currency, shared.amount_pen(amount)?, batch_id);
    }

    Ok(())
}
