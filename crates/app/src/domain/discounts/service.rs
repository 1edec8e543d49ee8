//! Discounts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::discounts::{
        data::NewDiscount,
        errors::DiscountsServiceError,
        records::{DiscountRecord, DiscountUuid},
        repository::PgDiscountsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgDiscountsService {
    db: Db,
    repository: PgDiscountsRepository,
}

impl PgDiscountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDiscountsRepository::new(),
        }
    }
}

#[async_trait]
impl DiscountsService for PgDiscountsService {
    async fn list_discounts(&self) -> Result<Vec<DiscountRecord>, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let discounts = self.repository.list_discounts(&mut tx).await?;

        tx.commit().await?;

        Ok(discounts)
    }

    async fn get_discount(
        &self,
        discount: DiscountUuid,
    ) -> Result<DiscountRecord, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let discount = self.repository.get_discount(&mut tx, discount).await?;

        tx.commit().await?;

        Ok(discount)
    }

    #[tracing::instrument(
        name = "discounts.service.create_discount",
        skip(self, discount),
        fields(discount_uuid = %discount.uuid, percentage = discount.discount),
        err
    )]
    async fn create_discount(
        &self,
        discount: NewDiscount,
    ) -> Result<DiscountRecord, DiscountsServiceError> {
        if !discount.discount.is_finite() || !(0.0..=100.0).contains(&discount.discount) {
            return Err(DiscountsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_discount(&mut tx, &discount).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// All discounts, oldest first.
    async fn list_discounts(&self) -> Result<Vec<DiscountRecord>, DiscountsServiceError>;

    /// Retrieve a single discount.
    async fn get_discount(
        &self,
        discount: DiscountUuid,
    ) -> Result<DiscountRecord, DiscountsServiceError>;

    /// Creates a discount; the percentage must be within `0..=100`.
    async fn create_discount(
        &self,
        discount: NewDiscount,
    ) -> Result<DiscountRecord, DiscountsServiceError>;
}
