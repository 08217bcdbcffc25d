//! Product service

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{self as dto, ProductCreate, ProductUpdate};
use shared::query::{PageQuery, PaginatedResponse};

use crate::convert;
use crate::db::models::Product;
use crate::db::{Database, ProductStore, RepoError, UnitOfWork};
use crate::error::{ServiceError, ServiceResult};
use crate::orders::money;
use crate::utils::validation::{
    MAX_PRODUCT_CODE_LEN, MAX_PRODUCT_NAME_LEN, validate_required_text,
};

#[derive(Clone)]
pub struct ProductService<D: Database> {
    db: D,
}

impl<D: Database> ProductService<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<dto::Product>> {
        let mut tx = self.db.begin().await?;
        let products = tx.all_products().await?;
        tx.commit().await?;
        Ok(products.into_iter().map(convert::product_to_dto).collect())
    }

    /// One page ordered by id. Non-positive page or size fall back to 1 / 10.
    pub async fn list_paged(&self, query: PageQuery) -> ServiceResult<PaginatedResponse<dto::Product>> {
        let (page, page_size) = query.normalize();
        let mut tx = self.db.begin().await?;
        let (items, total) = tx
            .paged_products(PageQuery::offset(page, page_size), page_size)
            .await?;
        tx.commit().await?;
        Ok(PaginatedResponse::new(items, total, page, page_size).map(convert::product_to_dto))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<dto::Product> {
        let mut tx = self.db.begin().await?;
        let product = find(&mut tx, id).await?;
        tx.commit().await?;
        Ok(convert::product_to_dto(product))
    }

    pub async fn create(&self, data: ProductCreate) -> ServiceResult<dto::Product> {
        validate_fields(&data.code, &data.name, data.sale_price, data.stock)?;

        let mut tx = self.db.begin().await?;
        let product = tx
            .create_product(&convert::product_draft(data))
            .await
            .map_err(classify)?;
        tx.commit().await?;

        tracing::info!(product_id = product.id, code = %product.code, "Product created");
        Ok(convert::product_to_dto(product))
    }

    pub async fn update(&self, id: i64, data: ProductUpdate) -> ServiceResult<dto::Product> {
        let mut tx = self.db.begin().await?;
        let mut product = tx
            .product_for_update(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        convert::apply_product_update(&mut product, data);
        validate_fields(&product.code, &product.name, product.sale_price, product.stock)?;

        tx.update_product(&product).await.map_err(classify)?;
        tx.commit().await?;

        tracing::info!(product_id = id, "Product updated");
        Ok(convert::product_to_dto(product))
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.db.begin().await?;
        let deleted = tx.delete_product(id).await.map_err(|e| match e {
            RepoError::Validation(_) => ServiceError::App(
                AppError::new(ErrorCode::ProductInUse).with_detail("product_id", id),
            ),
            other => other.into(),
        })?;
        if !deleted {
            return Err(not_found(id));
        }
        tx.commit().await?;

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }
}

async fn find<T: UnitOfWork>(tx: &mut T, id: i64) -> ServiceResult<Product> {
    tx.product_by_id(id).await?.ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> ServiceError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("id", id)
        .into()
}

/// Duplicate codes get their own error code
fn classify(e: RepoError) -> ServiceError {
    match e {
        RepoError::Duplicate(msg) => {
            AppError::with_message(ErrorCode::ProductCodeExists, msg).into()
        }
        other => other.into(),
    }
}

fn validate_fields(code: &str, name: &str, sale_price: Decimal, stock: i32) -> ServiceResult<()> {
    validate_required_text(code, "code", MAX_PRODUCT_CODE_LEN)?;
    validate_required_text(name, "name", MAX_PRODUCT_NAME_LEN)?;
    if sale_price <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("sale_price must be positive, got {sale_price}"),
        )
        .into());
    }
    if !money::is_cent_precise(sale_price) || !money::in_amount_range(sale_price) {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("sale_price must be whole cents within range, got {sale_price}"),
        )
        .into());
    }
    if stock < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("stock must not be negative, got {stock}"),
        )
        .into());
    }
    Ok(())
}
