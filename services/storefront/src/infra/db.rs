use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IntoActiveModel as _, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr, sea_query::OnConflict,
};

use wafi_domain::id::{NotificationId, OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;
use wafi_domain::pagination::{PageRequest, Sort};
use wafi_domain::product::ProductStatus;
use wafi_storefront_schema::{notifications, orders, products, reservations, users};

use crate::domain::repository::{
    NotificationRepository, OrderRepository, ProductRepository, ReservationRepository,
    StockRepository, UserRepository,
};
use crate::domain::types::{
    Notification, NotificationSortBy, Order, Product, ProductDraft, ProductFilter, Reservation,
    ReserveOutcome, StockChange, StockWrite, User, is_restock, restock_notifications,
};
use crate::error::StorefrontError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StorefrontError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorefrontError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn list(&self) -> Result<Vec<User>, StorefrontError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn create(&self, user: &User) -> Result<bool, StorefrontError> {
        let model = users::ActiveModel {
            id: Set(user.id.0),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(user.created_at),
        };
        let inserted = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert user")?;
        Ok(inserted > 0)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    Ok(User {
        id: UserId(model.id),
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        role: model.role.parse().context("decode user role")?,
        created_at: model.created_at,
    })
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl DbProductRepository {
    /// Load, modify and save one row, bumping `updated_at`.
    async fn update_with(
        &self,
        id: ProductId,
        apply: impl FnOnce(&mut products::ActiveModel),
    ) -> Result<Option<Product>, StorefrontError> {
        let Some(model) = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find product for update")?
        else {
            return Ok(None);
        };
        let mut product = model.into_active_model();
        apply(&mut product);
        product.updated_at = Set(Utc::now());
        let model = product
            .update(&self.db)
            .await
            .context("update product")?;
        Ok(Some(product_from_model(model)?))
    }
}

impl ProductRepository for DbProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StorefrontError> {
        let model = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model).transpose()?)
    }

    async fn find_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, StorefrontError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .context("find products by ids")?;
        let products = models
            .into_iter()
            .map(product_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(products)
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, StorefrontError> {
        let mut query = products::Entity::find();
        if let Some(statuses) = filter.visibility.statuses() {
            query = query.filter(products::Column::Status.is_in(statuses.iter().map(|s| s.as_str())));
        }
        if let Some(category) = &filter.category {
            query = query.filter(products::Column::Category.eq(category.as_str()));
        }
        query = query.order_by_asc(products::Column::Id);
        if let Some(page) = page {
            query = query.offset(page.offset()).limit(page.limit());
        }
        let models = query.all(&self.db).await.context("list products")?;
        let products = models
            .into_iter()
            .map(product_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(products)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, StorefrontError> {
        let model = product_to_active_model(draft)?
            .insert(&self.db)
            .await
            .context("insert product")?;
        Ok(product_from_model(model)?)
    }

    async fn set_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<Option<Product>, StorefrontError> {
        self.update_with(id, |product| {
            product.status = Set(status.as_str().to_owned())
        })
        .await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StorefrontError> {
        let result = products::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, StorefrontError> {
        let count = products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?;
        Ok(count)
    }

    async fn insert_many(&self, drafts: &[ProductDraft]) -> Result<u64, StorefrontError> {
        if drafts.is_empty() {
            return Ok(0);
        }
        let models = drafts
            .iter()
            .map(product_to_active_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let inserted = products::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .context("insert catalog")?;
        Ok(inserted)
    }
}

fn product_to_active_model(draft: &ProductDraft) -> anyhow::Result<products::ActiveModel> {
    let now = Utc::now();
    Ok(products::ActiveModel {
        id: NotSet,
        name: Set(draft.name.clone()),
        price: Set(draft.price),
        image_urls: Set(serde_json::to_value(&draft.image_urls).context("encode product images")?),
        description: Set(draft.description.clone()),
        category: Set(draft.category.clone()),
        stock: Set(draft.stock),
        status: Set(ProductStatus::Active.as_str().to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

fn product_from_model(model: products::Model) -> anyhow::Result<Product> {
    Ok(Product {
        id: ProductId(model.id),
        name: model.name,
        price: model.price,
        image_urls: serde_json::from_value(model.image_urls).context("decode product images")?,
        description: model.description,
        category: model.category,
        stock: model.stock,
        status: model.status.parse().context("decode product status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), StorefrontError> {
        orders::ActiveModel {
            id: Set(order.id.0),
            user_id: Set(order.user_id.map(|id| id.0)),
            customer: Set(serde_json::to_value(&order.customer).context("encode order customer")?),
            items: Set(serde_json::to_value(&order.items).context("encode order items")?),
            total: Set(order.total),
            status: Set(order.status.as_str().to_owned()),
            created_at: Set(order.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert order")?;
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StorefrontError> {
        let model = orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find order by id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn list(
        &self,
        user_id: Option<UserId>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StorefrontError> {
        let mut query = orders::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(orders::Column::UserId.eq(user_id.0));
        }
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list orders")?;
        let orders = models
            .into_iter()
            .map(order_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(orders)
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, StorefrontError> {
        let Some(model) = orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find order for status update")?
        else {
            return Ok(None);
        };
        let mut order = model.into_active_model();
        order.status = Set(status.as_str().to_owned());
        let model = order
            .update(&self.db)
            .await
            .context("update order status")?;
        Ok(Some(order_from_model(model)?))
    }
}

fn order_from_model(model: orders::Model) -> anyhow::Result<Order> {
    Ok(Order {
        id: OrderId(model.id),
        user_id: model.user_id.map(UserId),
        customer: serde_json::from_value(model.customer).context("decode order customer")?,
        items: serde_json::from_value(model.items).context("decode order items")?,
        total: model.total,
        status: model.status.parse().context("decode order status")?,
        created_at: model.created_at,
    })
}

// ── Reservation repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReservationRepository {
    pub db: DatabaseConnection,
}

impl ReservationRepository for DbReservationRepository {
    async fn list(&self) -> Result<Vec<Reservation>, StorefrontError> {
        let models = reservations::Entity::find()
            .order_by_asc(reservations::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list reservations")?;
        Ok(models.into_iter().map(reservation_from_model).collect())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Reservation>, StorefrontError> {
        let models = reservations::Entity::find()
            .filter(reservations::Column::UserId.eq(user_id.0))
            .order_by_asc(reservations::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list reservations by user")?;
        Ok(models.into_iter().map(reservation_from_model).collect())
    }

    async fn take_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Reservation>, StorefrontError> {
        let taken = self
            .db
            .transaction::<_, Vec<Reservation>, sea_orm::DbErr>(|txn| {
                Box::pin(async move { take_reservations(txn, product_id).await })
            })
            .await
            .context("take reservations for product")?;
        Ok(taken)
    }
}

/// Lock, read and delete a product's reservations inside `txn`.
async fn take_reservations(
    txn: &DatabaseTransaction,
    product_id: ProductId,
) -> Result<Vec<Reservation>, sea_orm::DbErr> {
    let models = reservations::Entity::find()
        .filter(reservations::Column::ProductId.eq(product_id.0))
        .order_by_asc(reservations::Column::CreatedAt)
        .lock_exclusive()
        .all(txn)
        .await?;
    if models.is_empty() {
        return Ok(Vec::new());
    }
    reservations::Entity::delete_many()
        .filter(reservations::Column::ProductId.eq(product_id.0))
        .filter(reservations::Column::UserId.is_in(models.iter().map(|m| m.user_id)))
        .exec(txn)
        .await?;
    Ok(models.into_iter().map(reservation_from_model).collect())
}

fn reservation_from_model(model: reservations::Model) -> Reservation {
    Reservation {
        product_id: ProductId(model.product_id),
        user_id: UserId(model.user_id),
        created_at: model.created_at,
    }
}

// ── Stock repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStockRepository {
    pub db: DatabaseConnection,
}

impl StockRepository for DbStockRepository {
    async fn write(
        &self,
        id: ProductId,
        change: &StockChange,
    ) -> Result<Option<StockWrite>, StorefrontError> {
        let change = change.clone();
        let write = self
            .db
            .transaction::<_, Option<StockWrite>, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = products::Entity::find_by_id(id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let mut product = product_from_model(model.clone()).map_err(db_err)?;
                    let stock_before = product.stock;
                    change.apply_to(&mut product);

                    let mut row = model.into_active_model();
                    row.name = Set(product.name.clone());
                    row.price = Set(product.price);
                    row.image_urls = Set(serde_json::to_value(&product.image_urls)
                        .context("encode product images")
                        .map_err(db_err)?);
                    row.description = Set(product.description.clone());
                    row.category = Set(product.category.clone());
                    row.stock = Set(product.stock);
                    row.updated_at = Set(Utc::now());
                    let product = product_from_model(row.update(txn).await?).map_err(db_err)?;

                    let mut created = Vec::new();
                    if is_restock(stock_before, product.stock) {
                        let waiting = take_reservations(txn, id).await?;
                        created = restock_notifications(&product, &waiting, Utc::now());
                        if !created.is_empty() {
                            notifications::Entity::insert_many(
                                created.iter().map(notification_to_active_model),
                            )
                            .exec_without_returning(txn)
                            .await?;
                        }
                    }
                    Ok(Some(StockWrite {
                        product,
                        stock_before,
                        notifications: created,
                    }))
                })
            })
            .await
            .context("write product stock")?;
        Ok(write)
    }

    async fn reserve(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<ReserveOutcome, StorefrontError> {
        let outcome = self
            .db
            .transaction::<_, ReserveOutcome, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    // Shared lock: waits for any in-flight stock write to commit.
                    let product = products::Entity::find_by_id(product_id.0)
                        .lock_shared()
                        .one(txn)
                        .await?;
                    let Some(product) = product
                        .filter(|p| p.status != ProductStatus::Deleted.as_str())
                    else {
                        return Ok(ReserveOutcome::Missing);
                    };
                    if product.stock > 0 {
                        return Ok(ReserveOutcome::InStock);
                    }

                    let model = reservations::ActiveModel {
                        product_id: Set(product_id.0),
                        user_id: Set(user_id.0),
                        created_at: Set(Utc::now()),
                    };
                    let inserted = reservations::Entity::insert(model)
                        .on_conflict(
                            OnConflict::columns([
                                reservations::Column::ProductId,
                                reservations::Column::UserId,
                            ])
                            .do_nothing()
                            .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;

                    let stored = reservations::Entity::find()
                        .filter(reservations::Column::ProductId.eq(product_id.0))
                        .filter(reservations::Column::UserId.eq(user_id.0))
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            sea_orm::DbErr::RecordNotFound("reservation after insert".to_owned())
                        })?;
                    let reservation = reservation_from_model(stored);
                    Ok(if inserted > 0 {
                        ReserveOutcome::Created(reservation)
                    } else {
                        ReserveOutcome::AlreadyReserved(reservation)
                    })
                })
            })
            .await
            .context("reserve product")?;
        Ok(outcome)
    }
}

fn db_err(e: anyhow::Error) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("{e:#}"))
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn list(
        &self,
        user_id: UserId,
        sort_by: NotificationSortBy,
        page: PageRequest,
    ) -> Result<Vec<Notification>, StorefrontError> {
        let mut query =
            notifications::Entity::find().filter(notifications::Column::UserId.eq(user_id.0));
        query = match sort_by {
            NotificationSortBy::CreatedAt(Sort::Desc) => {
                query.order_by_desc(notifications::Column::CreatedAt)
            }
            NotificationSortBy::CreatedAt(Sort::Asc) => {
                query.order_by_asc(notifications::Column::CreatedAt)
            }
        };
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list notifications")?;
        Ok(models.into_iter().map(notification_from_model).collect())
    }

    async fn count_unread(&self, user_id: UserId) -> Result<u64, StorefrontError> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id.0))
            .filter(notifications::Column::Read.eq(false))
            .count(&self.db)
            .await
            .context("count unread notifications")?;
        Ok(count)
    }

    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorefrontError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::Read, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id.0))
            .filter(notifications::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .context("mark notifications read")?;
        Ok(result.rows_affected)
    }
}

fn notification_to_active_model(notification: &Notification) -> notifications::ActiveModel {
    notifications::ActiveModel {
        id: Set(notification.id.0),
        user_id: Set(notification.user_id.0),
        product_id: Set(notification.product_id.0),
        message: Set(notification.message.clone()),
        read: Set(notification.read),
        created_at: Set(notification.created_at),
    }
}

fn notification_from_model(model: notifications::Model) -> Notification {
    Notification {
        id: NotificationId(model.id),
        user_id: UserId(model.user_id),
        product_id: ProductId(model.product_id),
        message: model.message,
        read: model.read,
        created_at: model.created_at,
    }
}
