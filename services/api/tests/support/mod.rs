//! Shared harness for router-level tests: in-memory stores behind the
//! repository traits and helpers for building requests.

#![allow(dead_code)]

use api::{
    AppState, HealthProbe, ServerConfig, create_router,
    models::{
        AccountFilter, ContactMessage, NewContactMessage, NewOrder, NewPremiumAccount, NewProduct,
        Order, OrderStatus, OrderStatusUpdate, PaymentStatus, PremiumAccount, PremiumAccountPatch,
        PremiumAccountSummary, Product, ProductPatch,
    },
    repositories::{
        ContactRepository, OrderRepository, PremiumAccountRepository, ProductRepository,
    },
    upload::UploadStore,
};
use async_trait::async_trait;
use auth::{Admin, AdminRepository, Authenticator, JwtConfig, JwtService};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use common::error::{StoreError, StoreResult};
use serde_json::Value;
use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "router-tests-secret-0123456789abcdef";
pub const ADMIN_EMAIL: &str = "owner@magicworld.test";
pub const ADMIN_PASSWORD: &str = "Sup3r!Secret-Pass";

fn duplicate(constraint: &str) -> StoreError {
    StoreError::DuplicateKey {
        constraint: constraint.to_string(),
    }
}

#[derive(Default)]
pub struct MemoryAdmins {
    admins: Mutex<Vec<Admin>>,
}

#[async_trait]
impl AdminRepository for MemoryAdmins {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let admins = self.admins.lock().unwrap();
        Ok(admins.iter().find(|a| a.email == email).cloned())
    }

    async fn upsert(&self, email: &str, password_hash: &str) -> StoreResult<Admin> {
        let mut admins = self.admins.lock().unwrap();
        if let Some(existing) = admins.iter_mut().find(|a| a.email == email) {
            existing.password_hash = password_hash.to_string();
            return Ok(existing.clone());
        }
        let admin = Admin {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        admins.push(admin.clone());
        Ok(admin)
    }
}

#[derive(Default)]
pub struct MemoryProducts {
    pub rows: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for MemoryProducts {
    async fn create(&self, new: &NewProduct) -> StoreResult<Product> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.slug == new.slug) {
            return Err(duplicate("products_slug_key"));
        }
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            slug: new.slug.clone(),
            description: new.description.clone(),
            image: new.image.clone(),
            version: new.version.clone(),
            size: new.size.clone(),
            updated: new.updated.clone(),
            category: new.category.clone(),
            product_type: new.product_type.clone(),
            status_enabled: new.status_enabled,
            status_label: new.status_label.clone(),
            prices: new.prices,
            download_link: new.download_link.clone(),
            features_enabled: new.features_enabled,
            features_data: new.features_data.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.insert(0, product.clone());
        Ok(product)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slug) = &patch.slug {
            if rows.iter().any(|p| &p.slug == slug && p.id != id) {
                return Err(duplicate("products_slug_key"));
            }
        }
        let Some(p) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        fn set<T: Clone>(field: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *field = v.clone();
            }
        }
        set(&mut p.name, &patch.name);
        set(&mut p.slug, &patch.slug);
        set(&mut p.description, &patch.description);
        set(&mut p.image, &patch.image);
        set(&mut p.version, &patch.version);
        set(&mut p.size, &patch.size);
        set(&mut p.updated, &patch.updated);
        set(&mut p.category, &patch.category);
        set(&mut p.product_type, &patch.product_type);
        set(&mut p.status_enabled, &patch.status_enabled);
        set(&mut p.status_label, &patch.status_label);
        set(&mut p.prices.day, &patch.price_day);
        set(&mut p.prices.week, &patch.price_week);
        set(&mut p.download_link, &patch.download_link);
        set(&mut p.features_enabled, &patch.features_enabled);
        set(&mut p.features_data, &patch.features_data);
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryPremiumAccounts {
    pub rows: Mutex<Vec<PremiumAccount>>,
}

#[async_trait]
impl PremiumAccountRepository for MemoryPremiumAccounts {
    async fn create(&self, new: &NewPremiumAccount) -> StoreResult<PremiumAccount> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.slug == new.slug) {
            return Err(duplicate("premium_accounts_slug_key"));
        }
        let now = Utc::now();
        let account = PremiumAccount {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            slug: new.slug.clone(),
            img: new.img.clone(),
            gallery: new.gallery.clone(),
            description: new.description.clone(),
            price: new.price,
            is_available: new.is_available,
            badges: new.badges.clone(),
            account_type: new.account_type,
            created_at: now,
            updated_at: now,
        };
        rows.insert(0, account.clone());
        Ok(account)
    }

    async fn list(&self, filter: &AccountFilter) -> StoreResult<Vec<PremiumAccountSummary>> {
        let rows = self.rows.lock().unwrap();
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        Ok(rows
            .iter()
            .filter(|a| filter.account_type.is_none_or(|t| a.account_type == t))
            .filter(|a| {
                search.as_ref().is_none_or(|s| {
                    format!("{} {}", a.title, a.description)
                        .to_lowercase()
                        .split_whitespace()
                        .any(|word| word == s)
                })
            })
            .cloned()
            .map(PremiumAccountSummary::from)
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<PremiumAccount>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PremiumAccount>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &PremiumAccountPatch,
    ) -> StoreResult<Option<PremiumAccount>> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slug) = &patch.slug {
            if rows.iter().any(|a| &a.slug == slug && a.id != id) {
                return Err(duplicate("premium_accounts_slug_key"));
            }
        }
        let Some(a) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.title {
            a.title = v.clone();
        }
        if let Some(v) = &patch.slug {
            a.slug = v.clone();
        }
        if let Some(v) = &patch.img {
            a.img = v.clone();
        }
        if let Some(v) = &patch.gallery {
            a.gallery = v.clone();
        }
        if let Some(v) = &patch.description {
            a.description = v.clone();
        }
        if let Some(v) = patch.price {
            a.price = v;
        }
        if let Some(v) = patch.is_available {
            a.is_available = v;
        }
        if let Some(v) = &patch.badges {
            a.badges = v.clone();
        }
        if let Some(v) = patch.account_type {
            a.account_type = v;
        }
        a.updated_at = Utc::now();
        Ok(Some(a.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryOrders {
    pub rows: Mutex<Vec<Order>>,
    /// Makes every insert fail, as if the database went away
    pub fail_inserts: AtomicBool,
}

#[async_trait]
impl OrderRepository for MemoryOrders {
    async fn create(&self, new: &NewOrder) -> StoreResult<Order> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            product_name: new.product_name.clone(),
            plan: new.plan.clone(),
            price: new.price,
            email: new.email.clone(),
            telegram: new.telegram.clone(),
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            screenshot: new.screenshot.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(0, order.clone());
        Ok(order)
    }

    async fn list(&self) -> StoreResult<Vec<Order>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update_status(
        &self,
        id: Uuid,
        update: &OrderStatusUpdate,
    ) -> StoreResult<Option<Order>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(order) = rows.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if let Some(status) = update.payment_status {
            order.payment_status = status;
        }
        if let Some(status) = update.order_status {
            order.order_status = status;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|o| o.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryContacts {
    pub rows: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl ContactRepository for MemoryContacts {
    async fn create(&self, new: &NewContactMessage) -> StoreResult<ContactMessage> {
        let now = Utc::now();
        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            email: new.email.clone(),
            message: new.message.clone(),
            read: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(0, message.clone());
        Ok(message)
    }

    async fn list(&self) -> StoreResult<Vec<ContactMessage>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn mark_read(&self, id: Uuid) -> StoreResult<Option<ContactMessage>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(message) = rows.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        message.read = true;
        message.updated_at = Utc::now();
        Ok(Some(message.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok(rows.len() != before)
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthProbe for AlwaysHealthy {
    async fn is_healthy(&self) -> bool {
        true
    }
}

pub struct TestApp {
    pub router: Router,
    pub jwt: JwtService,
    pub admin_id: Uuid,
    pub upload_dir: PathBuf,
    pub products: Arc<MemoryProducts>,
    pub premium_accounts: Arc<MemoryPremiumAccounts>,
    pub orders: Arc<MemoryOrders>,
    pub contacts: Arc<MemoryContacts>,
}

impl TestApp {
    pub async fn new() -> Self {
        let jwt = JwtService::new(&JwtConfig::new(SECRET).unwrap()).unwrap();
        let admins = Arc::new(MemoryAdmins::default());
        let authenticator = Authenticator::new(admins, jwt.clone()).unwrap();
        let admin_id = authenticator
            .provision(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap()
            .id;

        let upload_dir = std::env::temp_dir().join(format!("magicworld-uploads-{}", Uuid::new_v4()));
        let products = Arc::new(MemoryProducts::default());
        let premium_accounts = Arc::new(MemoryPremiumAccounts::default());
        let orders = Arc::new(MemoryOrders::default());
        let contacts = Arc::new(MemoryContacts::default());

        let state = AppState {
            authenticator,
            products: products.clone(),
            premium_accounts: premium_accounts.clone(),
            orders: orders.clone(),
            contacts: contacts.clone(),
            uploads: UploadStore::new(&upload_dir),
            health: Arc::new(AlwaysHealthy),
        };
        let server = ServerConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            upload_dir: upload_dir.clone(),
            ..ServerConfig::default()
        };

        Self {
            router: create_router(state, &server),
            jwt,
            admin_id,
            upload_dir,
            products,
            premium_accounts,
            orders,
            contacts,
        }
    }

    pub fn admin_token(&self) -> String {
        self.jwt.issue_admin_token(Uuid::new_v4()).unwrap()
    }

    /// Send a request and return (status, JSON body); non-JSON bodies come back as a string
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
        (status, value)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    /// Files currently in the upload directory
    pub fn uploaded_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.upload_dir) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    request("DELETE", uri, token, None)
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, token, Some(body))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: Vec<u8>,
}

const BOUNDARY: &str = "----magicworld-test-boundary";

/// Build a `multipart/form-data` POST to `/orders/upload`
pub fn upload(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/orders/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Sign arbitrary claims with the test secret
pub fn forge_token(claims: &Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn now_secs() -> u64 {
    Utc::now().timestamp() as u64
}
