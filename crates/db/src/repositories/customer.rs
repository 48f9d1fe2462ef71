//! Customer repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::customers;

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Display name.
    pub name: String,
    /// UAE Tax Registration Number, if known.
    pub trn: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Input for updating a customer. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// New display name.
    pub name: Option<String>,
    /// New TRN.
    pub trn: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New address.
    pub address: Option<String>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateCustomerInput) -> Result<customers::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            trn: Set(input.trn),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        customer.insert(&self.db).await
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists customers ordered by name, with an optional name search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<customers::Model>, u64), DbErr> {
        let mut query = customers::Entity::find();

        if let Some(needle) = search {
            query = query.filter(customers::Column::Name.contains(needle));
        }

        let paginator = query
            .order_by_asc(customers::Column::Name)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Updates a customer in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<Option<customers::Model>, DbErr> {
        let Some(customer) = customers::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: customers::ActiveModel = customer.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(trn) = input.trn {
            active.trn = Set(Some(trn));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(Some(active.update(&self.db).await?))
    }
}
