// Stub gateways that record what the engines asked of them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use compras::core::{AppError, OrderId, ProjectId, Result};
use compras::modules::exchange_rates::ExchangeRateGateway;
use compras::modules::inventory::{InventoryGateway, InventoryMatch, ReservationLine};
use compras::modules::projects::{Project, ProjectDirectory};

/// Rate source answering a fixed rate (or none) and counting lookups
pub struct StubRates {
    rate: Option<Decimal>,
    calls: AtomicUsize,
}

impl StubRates {
    pub fn with_rate(rate: Decimal) -> Self {
        Self {
            rate: Some(rate),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            rate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeRateGateway for StubRates {
    async fn get_rate(&self, _date: Option<NaiveDate>) -> Option<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub item_id: Option<u64>,
    pub qty: Decimal,
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub project_id: ProjectId,
    pub items: Vec<ReservationLine>,
    pub batch_id: String,
    pub project_name: String,
}

/// Inventory that records deductions and registrations. With `failing()` every call
/// is recorded and then answered with an error.
#[derive(Default)]
pub struct RecordingInventory {
    fail: bool,
    stock: Vec<InventoryMatch>,
    deductions: Mutex<Vec<Deduction>>,
    registrations: Mutex<Vec<Registration>>,
    searches: Mutex<Vec<String>>,
}

impl RecordingInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_stock(stock: Vec<InventoryMatch>) -> Self {
        Self {
            stock,
            ..Self::default()
        }
    }

    pub fn deductions(&self) -> Vec<Deduction> {
        self.deductions.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<()> {
        if self.fail {
            Err(AppError::internal("inventory unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InventoryGateway for RecordingInventory {
    async fn search(&self, query: &str, _project_id: Option<ProjectId>) -> Result<Vec<InventoryMatch>> {
        self.searches.lock().unwrap().push(query.to_string());
        self.outcome()?;
        Ok(self.stock.clone())
    }

    async fn deduct_stock(&self, item_id: Option<u64>, qty: Decimal, order_id: OrderId) -> Result<()> {
        self.deductions.lock().unwrap().push(Deduction {
            item_id,
            qty,
            order_id,
        });
        self.outcome()
    }

    async fn register_purchased_items(
        &self,
        project_id: ProjectId,
        items: &[ReservationLine],
        batch_id: &str,
        project_name: &str,
    ) -> Result<()> {
        self.registrations.lock().unwrap().push(Registration {
            project_id,
            items: items.to_vec(),
            batch_id: batch_id.to_string(),
            project_name: project_name.to_string(),
        });
        self.outcome()
    }
}

#[derive(Default)]
pub struct StubProjects {
    names: HashMap<ProjectId, String>,
}

impl StubProjects {
    pub fn with(id: ProjectId, name: &str) -> Self {
        let mut names = HashMap::new();
        names.insert(id, name.to_string());
        Self { names }
    }
}

#[async_trait]
impl ProjectDirectory for StubProjects {
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        Ok(self.names.get(&id).map(|name| Project {
            id,
            name: name.clone(),
        }))
    }
}
