//! SeaORM implementation of LoanRepository
//!
//! `open` and `close` are the only writers of item/loan status. Each runs in
//! one transaction and moves status with a guarded `UPDATE ... WHERE status = ?`
//! so that two requests racing for the same item cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{
    Component, DomainError, ItemStatus, Kit, Loan, LoanFilter, LoanRepository, LoanStatus,
    LoanTarget, NewLoan, UpdateLoanInput,
};
use crate::infrastructure::repositories::kit_repository::load_kits;
use crate::models::component::{self, Entity as ComponentEntity};
use crate::models::kit::{self, Entity as KitEntity};
use crate::models::loan::{self, ActiveModel, Column, Entity as LoanEntity};

/// SeaORM-based implementation of LoanRepository
pub struct SeaOrmLoanRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_one(&self, model: loan::Model) -> Result<Loan, DomainError> {
        load_loans(&self.db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("loan vanished while loading".to_string()))
    }
}

/// Embed the borrowed component or kit into each loan row.
/// Soft-deleted items are still embedded: the loan keeps its history.
async fn load_loans<C: ConnectionTrait>(
    db: &C,
    loans: Vec<loan::Model>,
) -> Result<Vec<Loan>, DomainError> {
    let component_ids: Vec<i32> = loans.iter().filter_map(|l| l.component_id).collect();
    let kit_ids: Vec<i32> = loans.iter().filter_map(|l| l.kit_id).collect();

    let mut components: HashMap<i32, Component> = HashMap::new();
    if !component_ids.is_empty() {
        for model in ComponentEntity::find()
            .filter(component::Column::Id.is_in(component_ids))
            .all(db)
            .await?
        {
            components.insert(model.id, Component::try_from(model)?);
        }
    }

    let mut kits: HashMap<i32, Kit> = HashMap::new();
    if !kit_ids.is_empty() {
        let models = KitEntity::find()
            .filter(kit::Column::Id.is_in(kit_ids))
            .all(db)
            .await?;
        for kit in load_kits(db, models).await? {
            kits.insert(kit.id, kit);
        }
    }

    loans
        .into_iter()
        .map(|loan| {
            Ok(Loan {
                component: loan.component_id.and_then(|id| components.get(&id).cloned()),
                kit: loan.kit_id.and_then(|id| kits.get(&id).cloned()),
                id: loan.id,
                user_name: loan.user_name,
                user_email: loan.user_email,
                component_id: loan.component_id,
                kit_id: loan.kit_id,
                loan_date: loan.loan_date,
                expected_return_date: loan.expected_return_date,
                return_date: loan.return_date,
                status: loan.status.parse()?,
                notes: loan.notes,
                created_at: loan.created_at,
                updated_at: loan.updated_at,
            })
        })
        .collect()
}

/// Flip an active component from `available` to `loaned`.
async fn claim_component(txn: &DatabaseTransaction, id: i32, now: &str) -> Result<(), DomainError> {
    let result = ComponentEntity::update_many()
        .col_expr(
            component::Column::Status,
            Expr::value(ItemStatus::Loaned.as_str()),
        )
        .col_expr(component::Column::UpdatedAt, Expr::value(now.to_owned()))
        .filter(component::Column::Id.eq(id))
        .filter(component::Column::IsActive.eq(true))
        .filter(component::Column::Status.eq(ItemStatus::Available.as_str()))
        .exec(txn)
        .await?;

    if result.rows_affected == 1 {
        return Ok(());
    }

    let exists = ComponentEntity::find_by_id(id)
        .filter(component::Column::IsActive.eq(true))
        .one(txn)
        .await?;

    match exists {
        None => Err(DomainError::validation("Component not found")),
        Some(_) => Err(DomainError::validation("Component is not available")),
    }
}

/// Flip an active kit from `available` to `loaned`.
async fn claim_kit(txn: &DatabaseTransaction, id: i32, now: &str) -> Result<(), DomainError> {
    let result = KitEntity::update_many()
        .col_expr(kit::Column::Status, Expr::value(ItemStatus::Loaned.as_str()))
        .col_expr(kit::Column::UpdatedAt, Expr::value(now.to_owned()))
        .filter(kit::Column::Id.eq(id))
        .filter(kit::Column::IsActive.eq(true))
        .filter(kit::Column::Status.eq(ItemStatus::Available.as_str()))
        .exec(txn)
        .await?;

    if result.rows_affected == 1 {
        return Ok(());
    }

    let exists = KitEntity::find_by_id(id)
        .filter(kit::Column::IsActive.eq(true))
        .one(txn)
        .await?;

    match exists {
        None => Err(DomainError::validation("Kit not found")),
        Some(_) => Err(DomainError::validation("Kit is not available")),
    }
}

/// Put the item back on the shelf. A soft-deleted item is left alone.
async fn release(txn: &DatabaseTransaction, target: LoanTarget, now: &str) -> Result<(), DomainError> {
    let released = match target {
        LoanTarget::Component(id) => {
            ComponentEntity::update_many()
                .col_expr(
                    component::Column::Status,
                    Expr::value(ItemStatus::Available.as_str()),
                )
                .col_expr(component::Column::UpdatedAt, Expr::value(now.to_owned()))
                .filter(component::Column::Id.eq(id))
                .filter(component::Column::IsActive.eq(true))
                .exec(txn)
                .await?
                .rows_affected
        }
        LoanTarget::Kit(id) => {
            KitEntity::update_many()
                .col_expr(kit::Column::Status, Expr::value(ItemStatus::Available.as_str()))
                .col_expr(kit::Column::UpdatedAt, Expr::value(now.to_owned()))
                .filter(kit::Column::Id.eq(id))
                .filter(kit::Column::IsActive.eq(true))
                .exec(txn)
                .await?
                .rows_affected
        }
    };

    if released == 0 {
        tracing::warn!("Returned item {:?} is no longer in the catalog", target);
    }

    Ok(())
}

#[async_trait]
impl LoanRepository for SeaOrmLoanRepository {
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<Loan>, DomainError> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status.as_str()));
        }

        let loans = LoanEntity::find()
            .filter(condition)
            .order_by_desc(Column::LoanDate)
            .order_by_desc(Column::Id)
            .offset(filter.page.offset)
            .limit(filter.page.limit)
            .all(&self.db)
            .await?;

        load_loans(&self.db, loans).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Loan>, DomainError> {
        match LoanEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => self.load_one(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_active(&self) -> Result<Vec<Loan>, DomainError> {
        let loans = LoanEntity::find()
            .filter(Column::Status.eq(LoanStatus::Active.as_str()))
            .order_by_desc(Column::LoanDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        load_loans(&self.db, loans).await
    }

    async fn open(&self, new_loan: NewLoan) -> Result<Loan, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        // 1. Claim the item; dropping `txn` on error rolls everything back
        match new_loan.target {
            LoanTarget::Component(id) => claim_component(&txn, id, &now).await?,
            LoanTarget::Kit(id) => claim_kit(&txn, id, &now).await?,
        }

        // 2. Record the loan
        let saved = ActiveModel {
            user_name: Set(new_loan.user_name),
            user_email: Set(new_loan.user_email),
            component_id: Set(new_loan.target.component_id()),
            kit_id: Set(new_loan.target.kit_id()),
            loan_date: Set(now.clone()),
            expected_return_date: Set(new_loan.expected_return_date),
            return_date: Set(None),
            status: Set(LoanStatus::Active.as_str().to_owned()),
            notes: Set(new_loan.notes),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!("Loan {} opened for {:?}", saved.id, new_loan.target);
        self.load_one(saved).await
    }

    async fn close(&self, id: i32) -> Result<Loan, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        // 1. Find Loan
        let existing = LoanEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let target = LoanTarget::from_refs(existing.component_id, existing.kit_id)
            .map_err(|e| DomainError::Internal(format!("loan {} is malformed: {}", id, e)))?;

        // 2. active -> returned, only once
        let result = LoanEntity::update_many()
            .col_expr(Column::Status, Expr::value(LoanStatus::Returned.as_str()))
            .col_expr(Column::ReturnDate, Expr::value(Some(now.clone())))
            .col_expr(Column::UpdatedAt, Expr::value(now.clone()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(LoanStatus::Active.as_str()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::validation("Loan is already returned"));
        }

        // 3. Item back to 'available'
        release(&txn, target, &now).await?;

        txn.commit().await?;

        tracing::info!("Loan {} returned", id);
        self.find_by_id(id).await?.ok_or(DomainError::NotFound)
    }

    async fn update_details(
        &self,
        id: i32,
        input: UpdateLoanInput,
    ) -> Result<Option<Loan>, DomainError> {
        let Some(existing) = LoanEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();

        if let Some(user_name) = input.user_name {
            active.user_name = Set(user_name);
        }
        if let Some(user_email) = input.user_email {
            active.user_email = Set(user_email);
        }
        if let Some(date) = input.expected_return_date {
            active.expected_return_date = Set(date);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;

        self.load_one(result).await.map(Some)
    }
}
