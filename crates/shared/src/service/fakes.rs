//! In-memory stand-ins for every repository trait, shared by service tests.

use crate::{
    abstract_trait::*,
    domain::{
        enums::{OrderStatus, UserType},
        requests::{
            CreateCategoryRequest, CreateProductRequest, CreateUserRecord, FindAllCategories,
            FindAllOrders, FindAllProducts, FindAllUsers, PageRequest, PlaceOrder,
            UpdateCategoryRequest, UpdateProductRequest, UpdateProfileRequest, UpdateUserRequest,
        },
    },
    errors::RepositoryError,
    model::{
        Cart, CartItem, Category, Order, OrderItem, OrderStatusChange, Product, RefreshToken,
        User, UserCounts,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn paginate<T>(items: Vec<T>, page: Option<i64>, page_size: Option<i64>) -> (Vec<T>, i64) {
    let page = PageRequest::new(page, page_size);
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (items, total)
}

fn contains(haystack: &str, needle: &Option<String>) -> bool {
    match needle.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

struct CartLine {
    id: i32,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    created_at: NaiveDateTime,
}

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: Vec<User>,
    tokens: Vec<RefreshToken>,
    categories: Vec<Category>,
    products: Vec<Product>,
    carts: Vec<Cart>,
    cart_lines: Vec<CartLine>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

impl Tables {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn category(&self, id: i32) -> Option<Category> {
        let mut category = self.categories.iter().find(|c| c.id == id)?.clone();
        category.products_count =
            self.products.iter().filter(|p| p.category_id == id).count() as i64;
        Some(category)
    }

    fn product(&self, id: i32) -> Option<Product> {
        let mut product = self.products.iter().find(|p| p.id == id)?.clone();
        if let Some(category) = self.categories.iter().find(|c| c.id == product.category_id) {
            product.category_name = category.name.clone();
        }
        Some(product)
    }

    fn cart_item(&self, line: &CartLine) -> Option<CartItem> {
        let product = self.product(line.product_id)?;
        Some(CartItem {
            id: line.id,
            cart_id: line.cart_id,
            product_id: product.id,
            product_name: product.name,
            product_price: product.price,
            product_stock: product.stock,
            product_is_active: product.is_active,
            quantity: line.quantity,
            created_at: line.created_at,
            updated_at: line.created_at,
        })
    }
}

/// One in-memory database implementing all repository traits.
#[derive(Default)]
pub(crate) struct FakeStore {
    tables: Mutex<Tables>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn insert_user(&self, mut user: User) -> User {
        let mut tables = self.lock();
        user.id = tables.id();
        tables.users.push(user.clone());
        user
    }

    pub fn user(&self, id: i32) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn insert_category(&self, name: &str) -> Category {
        let mut tables = self.lock();
        let category = Category {
            id: tables.id(),
            name: name.to_string(),
            description: String::new(),
            products_count: 0,
            created_at: now(),
            updated_at: now(),
        };
        tables.categories.push(category.clone());
        category
    }

    pub fn insert_product(&self, name: &str, price: Decimal, stock: i32, category_id: i32) -> Product {
        let mut tables = self.lock();
        let product = Product {
            id: tables.id(),
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
            category_id,
            category_name: String::new(),
            is_active: true,
            created_at: now(),
            updated_at: now(),
        };
        tables.products.push(product.clone());
        tables.product(product.id).unwrap_or(product)
    }

    pub fn set_product_active(&self, id: i32, active: bool) {
        if let Some(product) = self.lock().products.iter_mut().find(|p| p.id == id) {
            product.is_active = active;
        }
    }

    pub fn set_stock(&self, id: i32, stock: i32) {
        if let Some(product) = self.lock().products.iter_mut().find(|p| p.id == id) {
            product.stock = stock;
        }
    }

    pub fn product(&self, id: i32) -> Option<Product> {
        self.lock().product(id)
    }

    /// Writes a raw status, bypassing the transition rule.
    pub fn force_order_status(&self, id: i32, raw: &str) {
        if let Some(order) = self.lock().orders.iter_mut().find(|o| o.id == id) {
            order.status = raw.to_string();
        }
    }

    pub fn token_count(&self, user_id: i32) -> usize {
        self.lock().tokens.iter().filter(|t| t.user_id == user_id).count()
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for FakeStore {
    async fn find_all(&self, req: &FindAllUsers) -> Result<(Vec<User>, i64), RepositoryError> {
        let users: Vec<User> = self
            .lock()
            .users
            .iter()
            .filter(|u| contains(&u.username, &req.search) || contains(&u.email, &req.search))
            .filter(|u| req.user_type.is_none_or(|t| u.kind() == t))
            .cloned()
            .collect();
        Ok(paginate(users, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.user(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn count_by_type(&self) -> Result<UserCounts, RepositoryError> {
        let tables = self.lock();
        let admin_users = tables.users.iter().filter(|u| u.is_admin()).count() as i64;
        let total_users = tables.users.len() as i64;
        Ok(UserCounts {
            total_users,
            admin_users,
            customer_users: total_users - admin_users,
        })
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<User>, RepositoryError> {
        let mut users = self.lock().users.clone();
        users.reverse();
        users.truncate(limit as usize);
        Ok(users)
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for FakeStore {
    async fn create_user(&self, req: &CreateUserRecord) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.username == req.username) {
            return Err(RepositoryError::AlreadyExists("username".into()));
        }

        let user = User {
            id: tables.id(),
            username: req.username.clone(),
            email: req.email.clone(),
            password: req.password_hash.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            phone: req.phone.clone(),
            address: req.address.clone(),
            user_type: req.user_type.as_str().to_string(),
            is_active: true,
            is_staff: req.user_type == UserType::Admin,
            date_joined: now(),
            last_login: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i32,
        req: &UpdateProfileRequest,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(email) = &req.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &req.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &req.last_name {
            user.last_name = last_name.clone();
        }
        if req.phone.is_some() {
            user.phone = req.phone.clone();
        }
        if req.address.is_some() {
            user.address = req.address.clone();
        }
        Ok(user.clone())
    }

    async fn update_user(&self, id: i32, req: &UpdateUserRequest) -> Result<User, RepositoryError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(username) = &req.username {
            user.username = username.clone();
        }
        if let Some(email) = &req.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &req.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &req.last_name {
            user.last_name = last_name.clone();
        }
        if req.phone.is_some() {
            user.phone = req.phone.clone();
        }
        if req.address.is_some() {
            user.address = req.address.clone();
        }
        if let Some(user_type) = req.user_type {
            user.user_type = user_type.as_str().to_string();
            user.is_staff = user_type == UserType::Admin;
        }
        if let Some(is_active) = req.is_active {
            user.is_active = is_active;
        }
        Ok(user.clone())
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        user.password = password_hash.to_string();
        Ok(())
    }

    async fn touch_last_login(&self, id: i32) -> Result<(), RepositoryError> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(now());
        }
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.tokens.retain(|t| t.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenQueryRepositoryTrait for FakeStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, RepositoryError> {
        Ok(self
            .lock()
            .tokens
            .iter()
            .find(|t| t.token == token && t.expired_date > now())
            .cloned())
    }
}

#[async_trait]
impl RefreshTokenCommandRepositoryTrait for FakeStore {
    async fn create(
        &self,
        user_id: i32,
        token: &str,
        expired_date: NaiveDateTime,
    ) -> Result<RefreshToken, RepositoryError> {
        let mut tables = self.lock();
        let row = RefreshToken {
            id: tables.id(),
            user_id,
            token: token.to_string(),
            expired_date,
            created_at: now(),
        };
        tables.tokens.push(row.clone());
        Ok(row)
    }

    async fn delete_token(&self, token: &str) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        let before = tables.tokens.len();
        tables.tokens.retain(|t| t.token != token);
        Ok(tables.tokens.len() < before)
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        self.lock().tokens.retain(|t| t.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl CategoryQueryRepositoryTrait for FakeStore {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<(Vec<Category>, i64), RepositoryError> {
        let tables = self.lock();
        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter_map(|c| tables.category(c.id))
            .filter(|c| contains(&c.name, &req.name))
            .filter(|c| contains(&c.name, &req.search) || contains(&c.description, &req.search))
            .filter(|c| req.min_products.is_none_or(|min| c.products_count >= min))
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(categories, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError> {
        Ok(self.lock().category(id))
    }
}

#[async_trait]
impl CategoryCommandRepositoryTrait for FakeStore {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<Category, RepositoryError> {
        if self.lock().categories.iter().any(|c| c.name == req.name) {
            return Err(RepositoryError::AlreadyExists("name".into()));
        }
        let mut category = self.insert_category(&req.name);
        category.description = req.description.clone();
        let mut tables = self.lock();
        if let Some(stored) = tables.categories.iter_mut().find(|c| c.id == category.id) {
            stored.description = category.description.clone();
        }
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<Category, RepositoryError> {
        let mut tables = self.lock();
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &req.name {
            category.name = name.clone();
        }
        if let Some(description) = &req.description {
            category.description = description.clone();
        }
        tables.category(id).ok_or(RepositoryError::NotFound)
    }

    async fn delete_category(&self, id: i32) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.products.retain(|p| p.category_id != id);
        Ok(())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for FakeStore {
    async fn find_all(
        &self,
        req: &FindAllProducts,
        active_only: bool,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let tables = self.lock();
        let mut products: Vec<Product> = tables
            .products
            .iter()
            .filter_map(|p| tables.product(p.id))
            .filter(|p| !active_only || p.is_active)
            .filter(|p| active_only || req.is_active.is_none_or(|a| p.is_active == a))
            .filter(|p| req.category.is_none_or(|c| p.category_id == c))
            .filter(|p| contains(&p.name, &req.name))
            .filter(|p| contains(&p.name, &req.search) || contains(&p.category_name, &req.search))
            .collect();
        products.reverse();
        Ok(paginate(products, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.product(id))
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for FakeStore {
    async fn create_product(&self, req: &CreateProductRequest) -> Result<Product, RepositoryError> {
        if self.lock().category(req.category).is_none() {
            return Err(RepositoryError::ForeignKey("category".into()));
        }
        let product = self.insert_product(&req.name, req.price, req.stock, req.category);
        self.set_product_active(product.id, req.is_active);
        self.product(product.id).ok_or(RepositoryError::NotFound)
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &req.name {
            product.name = name.clone();
        }
        if let Some(price) = req.price {
            product.price = price;
        }
        if let Some(stock) = req.stock {
            product.stock = stock;
        }
        if let Some(category) = req.category {
            product.category_id = category;
        }
        if let Some(is_active) = req.is_active {
            product.is_active = is_active;
        }
        tables.product(id).ok_or(RepositoryError::NotFound)
    }

    async fn update_stock(&self, id: i32, stock: i32) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.stock = stock;
        tables.product(id).ok_or(RepositoryError::NotFound)
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.cart_lines.retain(|l| l.product_id != id);
        Ok(())
    }
}

#[async_trait]
impl CartQueryRepositoryTrait for FakeStore {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .lock()
            .carts
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn find_items(&self, cart_id: i32) -> Result<Vec<CartItem>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .cart_lines
            .iter()
            .filter(|l| l.cart_id == cart_id)
            .filter_map(|l| tables.cart_item(l))
            .collect())
    }

    async fn find_item_by_product(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .cart_lines
            .iter()
            .find(|l| l.cart_id == cart_id && l.product_id == product_id)
            .and_then(|l| tables.cart_item(l)))
    }

    async fn find_item_by_id(
        &self,
        cart_id: i32,
        item_id: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .cart_lines
            .iter()
            .find(|l| l.cart_id == cart_id && l.id == item_id)
            .and_then(|l| tables.cart_item(l)))
    }
}

#[async_trait]
impl CartCommandRepositoryTrait for FakeStore {
    async fn get_or_create(&self, user_id: i32) -> Result<Cart, RepositoryError> {
        let mut tables = self.lock();
        if let Some(cart) = tables.carts.iter().find(|c| c.user_id == user_id) {
            return Ok(cart.clone());
        }
        let cart = Cart {
            id: tables.id(),
            user_id,
            created_at: now(),
            updated_at: now(),
        };
        tables.carts.push(cart.clone());
        Ok(cart)
    }

    async fn save_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        if let Some(line) = tables
            .cart_lines
            .iter_mut()
            .find(|l| l.cart_id == cart_id && l.product_id == product_id)
        {
            line.quantity = quantity;
            return Ok(());
        }
        let id = tables.id();
        tables.cart_lines.push(CartLine {
            id,
            cart_id,
            product_id,
            quantity,
            created_at: now(),
        });
        Ok(())
    }

    async fn update_item_quantity(&self, item_id: i32, quantity: i32) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let line = tables
            .cart_lines
            .iter_mut()
            .find(|l| l.id == item_id)
            .ok_or(RepositoryError::NotFound)?;
        line.quantity = quantity;
        Ok(())
    }

    async fn remove_item(&self, item_id: i32) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let before = tables.cart_lines.len();
        tables.cart_lines.retain(|l| l.id != item_id);
        if tables.cart_lines.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self, cart_id: i32) -> Result<(), RepositoryError> {
        self.lock().cart_lines.retain(|l| l.cart_id != cart_id);
        Ok(())
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for FakeStore {
    async fn find_all(
        &self,
        req: &FindAllOrders,
        owner: Option<i32>,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| owner.or(req.user).is_none_or(|u| o.user_id == u))
            .filter(|o| req.status.is_none_or(|s| o.status == s.as_str()))
            .cloned()
            .collect();
        orders.reverse();
        Ok(paginate(orders, req.page, req.page_size))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>, RepositoryError> {
        Ok(self
            .lock()
            .order_items
            .iter()
            .filter(|i| order_ids.contains(&i.order_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for FakeStore {
    async fn place_order(&self, req: &PlaceOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.lock();

        for line in &req.lines {
            let available = tables
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .map(|p| p.stock)
                .unwrap_or(0);
            if available < line.quantity {
                return Err(RepositoryError::Conflict(format!(
                    "Insufficient stock for {}",
                    line.product_name
                )));
            }
        }

        let user_name = tables
            .users
            .iter()
            .find(|u| u.id == req.user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default();

        let order = Order {
            id: tables.id(),
            user_id: req.user_id,
            user_name,
            status: OrderStatus::Pending.as_str().to_string(),
            total_price: req.total_price,
            shipping_address: req.shipping_address.clone(),
            created_at: now(),
            updated_at: now(),
        };

        for line in &req.lines {
            if let Some(product) = tables.products.iter_mut().find(|p| p.id == line.product_id) {
                product.stock -= line.quantity;
            }
            let id = tables.id();
            tables.order_items.push(OrderItem {
                id,
                order_id: order.id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price: line.price,
                created_at: now(),
            });
        }

        let ordered = req.product_ids();
        tables
            .cart_lines
            .retain(|l| l.cart_id != req.cart_id || !ordered.contains(&l.product_id));
        tables.orders.push(order.clone());

        Ok(order)
    }

    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderStatusChange, RepositoryError> {
        let mut tables = self.lock();
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::NotFound)?;

        let previous: OrderStatus = order.status.parse().map_err(RepositoryError::Custom)?;
        if !previous.can_transition_to(status) {
            return Err(RepositoryError::Conflict(format!(
                "Cannot change status from {previous} to {status}"
            )));
        }

        order.status = status.as_str().to_string();
        Ok(OrderStatusChange {
            order: order.clone(),
            previous,
        })
    }
}

pub(crate) fn memory_cache() -> crate::cache::CacheStore {
    crate::cache::CacheStore::new(
        Arc::new(crate::cache::MemoryCacheBackend::new(1_000)),
        chrono::Duration::hours(1),
    )
}
