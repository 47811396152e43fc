//! Shared fixtures for integration tests: an in-memory store behind every
//! repository trait, a mailer that records what it sends, and a ready
//! application state.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use shared::models::{
    Admin, Buyer, Farmer, FarmerStatus, NewBuyer, NewFarmer, NewOrder, NewProduct, Order, Product,
};
use shared::types::SalesPeriod;

use farm_market::config::{
    AdminBootstrapConfig, AuthConfig, Config, DatabaseConfig, JwtConfig, MailConfig,
    ServerConfig,
};
use farm_market::error::{AppError, AppResult};
use farm_market::external::{MailMessage, Mailer};
use farm_market::repositories::{
    AdminRepository, BuyerRepository, FarmerRepository, HealthProbe, OrderRepository,
    ProductRepository, Repositories, SalesQueryError, SalesRow,
};
use farm_market::services::AuthService;
use farm_market::AppState;

pub const PASSWORD: &str = "harvest-2024";
pub const RESET_LINK_BASE: &str = "http://localhost:5173/reset-password";

// ============================================================================
// In-memory store
// ============================================================================

/// Every entity table in memory, with the unique constraints of the schema
#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicI64,
    farmers: Mutex<Vec<Farmer>>,
    buyers: Mutex<Vec<Buyer>>,
    admins: Mutex<Vec<Admin>>,
    products: Mutex<Vec<Product>>,
    orders: Mutex<Vec<Order>>,
    /// Make the grouped sales query fail
    pub grouped_sales_broken: AtomicBool,
}

impl MemoryStore {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn farmers_snapshot(&self) -> Vec<Farmer> {
        self.farmers.lock().unwrap().clone()
    }

    pub fn orders_snapshot(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    /// Insert an order exactly as given, date included
    pub fn insert_order(&self, order: NewOrder) -> Order {
        let order = Order {
            id: self.next_id(),
            quantity: order.quantity,
            amount: order.amount,
            status: order.status,
            order_date: order.order_date,
            address: order.address,
            buyer_id: order.buyer_id,
            farmer_id: order.farmer_id,
            product_id: order.product_id,
            payment_id: order.payment_id,
        };
        self.orders.lock().unwrap().push(order.clone());
        order
    }

    pub fn break_grouped_sales(&self) {
        self.grouped_sales_broken.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FarmerRepository for MemoryStore {
    async fn create(&self, farmer: NewFarmer) -> AppResult<Farmer> {
        let mut farmers = self.farmers.lock().unwrap();
        for existing in farmers.iter() {
            if existing.email == farmer.email {
                return Err(AppError::DuplicateEntry("email".to_string()));
            }
            if existing.username == farmer.username {
                return Err(AppError::DuplicateEntry("username".to_string()));
            }
            if existing.national_id_no == farmer.national_id_no {
                return Err(AppError::DuplicateEntry("national_id_no".to_string()));
            }
        }

        let farmer = Farmer {
            id: self.next_id(),
            name: farmer.name,
            email: farmer.email,
            username: farmer.username,
            password_hash: farmer.password_hash,
            mobile_no: farmer.mobile_no,
            national_id_no: farmer.national_id_no,
            location: farmer.location,
            status: farmer.status,
            reset_token: None,
        };
        farmers.push(farmer.clone());
        Ok(farmer)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Farmer>> {
        Ok(self.farmers.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Farmer>> {
        Ok(self
            .farmers
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Farmer>> {
        Ok(self
            .farmers
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.email == email)
            .cloned())
    }

    async fn find_by_reset_token(&self, token_digest: &str) -> AppResult<Option<Farmer>> {
        Ok(self
            .farmers
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.reset_token.as_deref() == Some(token_digest))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Farmer>> {
        Ok(self.farmers_snapshot())
    }

    async fn find_by_status(&self, status: FarmerStatus) -> AppResult<Vec<Farmer>> {
        Ok(self
            .farmers
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.status == status)
            .cloned()
            .collect())
    }

    async fn update(&self, farmer: &Farmer) -> AppResult<()> {
        let mut farmers = self.farmers.lock().unwrap();
        if let Some(existing) = farmers.iter_mut().find(|f| f.id == farmer.id) {
            *existing = farmer.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut farmers = self.farmers.lock().unwrap();
        let before = farmers.len();
        farmers.retain(|f| f.id != id);
        let removed = farmers.len() != before;
        if removed {
            self.products.lock().unwrap().retain(|p| p.farmer_id != id);
        }
        Ok(removed)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.farmers.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl BuyerRepository for MemoryStore {
    async fn create(&self, buyer: NewBuyer) -> AppResult<Buyer> {
        let mut buyers = self.buyers.lock().unwrap();
        if buyers.iter().any(|b| b.email == buyer.email) {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let buyer = Buyer {
            id: self.next_id(),
            name: buyer.name,
            email: buyer.email,
            password_hash: buyer.password_hash,
            mobile_no: buyer.mobile_no,
            address: buyer.address,
        };
        buyers.push(buyer.clone());
        Ok(buyer)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Buyer>> {
        Ok(self.buyers.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Buyer>> {
        Ok(self
            .buyers
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Buyer>> {
        Ok(self
            .buyers
            .lock()
            .unwrap()
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Buyer>> {
        Ok(self.buyers.lock().unwrap().clone())
    }

    async fn update(&self, buyer: &Buyer) -> AppResult<()> {
        let mut buyers = self.buyers.lock().unwrap();
        if let Some(existing) = buyers.iter_mut().find(|b| b.id == buyer.id) {
            *existing = buyer.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut buyers = self.buyers.lock().unwrap();
        let before = buyers.len();
        buyers.retain(|b| b.id != id);
        Ok(buyers.len() != before)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.buyers.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn create(&self, username: &str, password_hash: &str) -> AppResult<Admin> {
        let mut admins = self.admins.lock().unwrap();
        if admins.iter().any(|a| a.username == username) {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let admin = Admin {
            id: self.next_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        admins.push(admin.clone());
        Ok(admin)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Admin>> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let product = Product {
            id: self.next_id(),
            name: product.name,
            category: product.category,
            description: product.description,
            cost: product.cost,
            farmer_id: product.farmer_id,
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect())
    }

    async fn find_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.farmer_id == farmer_id)
            .cloned()
            .collect())
    }

    async fn count_by_farmer(&self, farmer_id: i64) -> AppResult<i64> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.farmer_id == farmer_id)
            .count() as i64)
    }

    async fn update(&self, product: &Product) -> AppResult<bool> {
        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.products.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        Ok(self.insert_order(order))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Order>> {
        Ok(self.orders_snapshot())
    }

    async fn find_by_buyer(&self, buyer_id: i64) -> AppResult<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn find_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.farmer_id == farmer_id)
            .cloned()
            .collect())
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> AppResult<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.payment_id.as_deref() == Some(payment_id))
            .cloned())
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(existing) = orders.iter_mut().find(|o| o.id == order.id) {
            *existing = order.clone();
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.orders.lock().unwrap().len() as i64)
    }

    async fn count_by_farmer(&self, farmer_id: i64) -> AppResult<i64> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.farmer_id == farmer_id)
            .count() as i64)
    }

    /// Same grouping the SQL does: label by formatted date, count every
    /// order, sum completed amounts. Keep in step with
    /// `PgOrderRepository::grouped_sales`.
    async fn grouped_sales(
        &self,
        period: SalesPeriod,
        since: NaiveDateTime,
        farmer_id: Option<i64>,
    ) -> Result<Vec<SalesRow>, SalesQueryError> {
        if self.grouped_sales_broken.load(Ordering::SeqCst) {
            return Err(SalesQueryError::Unavailable(
                "grouped query disabled".to_string(),
            ));
        }

        let format = match period {
            SalesPeriod::Daily => "%Y-%m-%d",
            SalesPeriod::Monthly => "%Y-%m",
        };

        let mut rows: Vec<SalesRow> = Vec::new();
        for order in self.orders.lock().unwrap().iter() {
            if order.order_date < since {
                continue;
            }
            if farmer_id.is_some_and(|id| id != order.farmer_id) {
                continue;
            }

            let label = order.order_date.format(format).to_string();
            let revenue = if order.is_completed() {
                order.amount
            } else {
                Decimal::ZERO
            };

            match rows.iter_mut().find(|row| row.label == label) {
                Some(row) => {
                    row.order_count += 1;
                    row.revenue += revenue;
                }
                None => rows.push(SalesRow {
                    label,
                    order_count: 1,
                    revenue,
                }),
            }
        }

        rows.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(rows)
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}

// ============================================================================
// Mailer
// ============================================================================

/// Keeps every mail instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    pub failing: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_html(&self, message: MailMessage) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService("relay unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ============================================================================
// Application fixtures
// ============================================================================

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        auth: AuthConfig { bcrypt_cost: 4 },
        mail: MailConfig {
            api_endpoint: None,
            api_key: String::new(),
            from_address: "no-reply@farmmarket.test".to_string(),
            reset_link_base: RESET_LINK_BASE.to_string(),
        },
        admin: AdminBootstrapConfig {
            username: Some("admin".to_string()),
            password: Some("admin-pass-123".to_string()),
        },
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub config: Config,
    pub repos: Repositories,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let repos = Repositories {
            farmers: store.clone(),
            buyers: store.clone(),
            admins: store.clone(),
            products: store.clone(),
            orders: store.clone(),
            health: store.clone(),
        };

        Self {
            store,
            mailer: Arc::new(RecordingMailer::default()),
            config: test_config(),
            repos,
        }
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        self.mailer.clone()
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.repos.clone(), self.mailer(), self.config.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(&self.config)
    }

    /// Insert a farmer with [`PASSWORD`] and the given status
    pub async fn seed_farmer(&self, username: &str, status: FarmerStatus) -> Farmer {
        let seq = self.store.next_id.load(Ordering::SeqCst);
        FarmerRepository::create(
            self.store.as_ref(),
            NewFarmer {
                name: format!("Farmer {}", username),
                email: format!("{}@example.com", username),
                username: username.to_string(),
                password_hash: self.auth().hash_password(PASSWORD).unwrap(),
                mobile_no: "9876543210".to_string(),
                national_id_no: format!("NID-{}-{}", username, seq),
                location: "Nashik".to_string(),
                status,
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_buyer(&self, name: &str) -> Buyer {
        BuyerRepository::create(
            self.store.as_ref(),
            NewBuyer {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: self.auth().hash_password(PASSWORD).unwrap(),
                mobile_no: "9123456780".to_string(),
                address: "14 Mandi Road, Pune".to_string(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_product(&self, farmer_id: i64, name: &str, cost: i64) -> Product {
        ProductRepository::create(
            self.store.as_ref(),
            NewProduct {
                name: name.to_string(),
                category: "Vegetables".to_string(),
                description: format!("Fresh {}", name.to_lowercase()),
                cost: Decimal::from(cost),
                farmer_id,
            },
        )
        .await
        .unwrap()
    }

    pub fn seed_order(
        &self,
        buyer_id: i64,
        farmer_id: i64,
        product_id: i64,
        amount: i64,
        status: &str,
        order_date: NaiveDateTime,
    ) -> Order {
        self.store.insert_order(NewOrder {
            quantity: 1,
            amount: Decimal::from(amount),
            status: status.to_string(),
            order_date,
            address: Some("14 Mandi Road, Pune".to_string()),
            buyer_id,
            farmer_id,
            product_id,
            payment_id: None,
        })
    }
}
