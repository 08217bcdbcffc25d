//! Customer service

use shared::error::{AppError, ErrorCode};
use shared::models::{self as dto, CustomerCreate, CustomerUpdate};

use crate::convert;
use crate::db::models::Customer;
use crate::db::{CustomerStore, Database, RepoError, UnitOfWork};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_CUSTOMER_NAME_LEN, MAX_PHONE_LEN, MAX_TAX_ID_LEN,
    validate_optional_text, validate_required_text,
};

#[derive(Clone)]
pub struct CustomerService<D: Database> {
    db: D,
}

impl<D: Database> CustomerService<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<dto::Customer>> {
        let mut tx = self.db.begin().await?;
        let customers = tx.all_customers().await?;
        tx.commit().await?;
        Ok(customers.into_iter().map(convert::customer_to_dto).collect())
    }

    pub async fn get(&self, id: i64) -> ServiceResult<dto::Customer> {
        let mut tx = self.db.begin().await?;
        let customer = find(&mut tx, id).await?;
        tx.commit().await?;
        Ok(convert::customer_to_dto(customer))
    }

    pub async fn create(&self, data: CustomerCreate) -> ServiceResult<dto::Customer> {
        validate_required_text(&data.name, "name", MAX_CUSTOMER_NAME_LEN)?;
        validate_required_text(&data.tax_id, "tax_id", MAX_TAX_ID_LEN)?;
        validate_optional_text(&data.phone, "phone", MAX_PHONE_LEN)?;
        validate_optional_text(&data.address, "address", MAX_ADDRESS_LEN)?;

        let mut tx = self.db.begin().await?;
        let customer = tx
            .create_customer(&convert::customer_draft(data))
            .await
            .map_err(classify)?;
        tx.commit().await?;

        tracing::info!(customer_id = customer.id, "Customer created");
        Ok(convert::customer_to_dto(customer))
    }

    pub async fn update(&self, id: i64, data: CustomerUpdate) -> ServiceResult<dto::Customer> {
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_CUSTOMER_NAME_LEN)?;
        }
        if let Some(tax_id) = &data.tax_id {
            validate_required_text(tax_id, "tax_id", MAX_TAX_ID_LEN)?;
        }
        validate_optional_text(&data.phone, "phone", MAX_PHONE_LEN)?;
        validate_optional_text(&data.address, "address", MAX_ADDRESS_LEN)?;

        let mut tx = self.db.begin().await?;
        let mut customer = find(&mut tx, id).await?;
        convert::apply_customer_update(&mut customer, data);
        tx.update_customer(&customer).await.map_err(classify)?;
        tx.commit().await?;

        tracing::info!(customer_id = id, "Customer updated");
        Ok(convert::customer_to_dto(customer))
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.db.begin().await?;
        let deleted = tx.delete_customer(id).await.map_err(|e| match e {
            RepoError::Validation(_) => ServiceError::App(
                AppError::new(ErrorCode::CustomerHasOrders).with_detail("customer_id", id),
            ),
            other => other.into(),
        })?;
        if !deleted {
            return Err(not_found(id));
        }
        tx.commit().await?;

        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }
}

async fn find<T: UnitOfWork>(tx: &mut T, id: i64) -> ServiceResult<Customer> {
    tx.customer_by_id(id).await?.ok_or_else(|| not_found(id))
}

fn not_found(id: i64) -> ServiceError {
    AppError::with_message(ErrorCode::CustomerNotFound, format!("Customer {id} not found"))
        .with_detail("id", id)
        .into()
}

fn classify(e: RepoError) -> ServiceError {
    match e {
        RepoError::Duplicate(msg) => {
            AppError::with_message(ErrorCode::CustomerTaxIdExists, msg).into()
        }
        other => other.into(),
    }
}
