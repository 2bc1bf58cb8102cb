//! SeaORM implementation of ComponentRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::{
    Component, ComponentRepository, CreateComponentInput, DomainError, ItemStatus, Page,
    UpdateComponentInput,
};
use crate::models::component::{ActiveModel, Column, Entity as ComponentEntity, Model};

/// SeaORM-based implementation of ComponentRepository
pub struct SeaOrmComponentRepository {
    db: DatabaseConnection,
}

impl SeaOrmComponentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: i32) -> Result<Option<Model>, DomainError> {
        Ok(ComponentEntity::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?)
    }
}

impl TryFrom<Model> for Component {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Component {
            id: model.id,
            name: model.name,
            serial_number: model.serial_number,
            description: model.description,
            category: model.category,
            status: model.status.parse()?,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn duplicate_serial(e: sea_orm::DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Validation(_) => DomainError::validation("Serial number already exists"),
        other => other,
    }
}

#[async_trait]
impl ComponentRepository for SeaOrmComponentRepository {
    async fn find_all(&self, page: Page) -> Result<Vec<Component>, DomainError> {
        ComponentEntity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Component::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Component>, DomainError> {
        self.find_active_model(id)
            .await?
            .map(Component::try_from)
            .transpose()
    }

    async fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> Result<Option<Component>, DomainError> {
        ComponentEntity::find()
            .filter(Column::SerialNumber.eq(serial_number))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .map(Component::try_from)
            .transpose()
    }

    async fn create(&self, input: CreateComponentInput) -> Result<Component, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_component = ActiveModel {
            name: Set(input.name),
            serial_number: Set(input.serial_number),
            description: Set(input.description),
            category: Set(input.category),
            status: Set(ItemStatus::Available.as_str().to_owned()),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_component
            .insert(&self.db)
            .await
            .map_err(duplicate_serial)?;

        Component::try_from(result)
    }

    async fn update(
        &self,
        id: i32,
        input: UpdateComponentInput,
    ) -> Result<Option<Component>, DomainError> {
        let Some(existing) = self.find_active_model(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(serial_number) = input.serial_number {
            active.serial_number = Set(serial_number);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = input.category {
            active.category = Set(Some(category));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await.map_err(duplicate_serial)?;

        Component::try_from(result).map(Some)
    }

    async fn soft_delete(&self, id: i32) -> Result<bool, DomainError> {
        let Some(existing) = self.find_active_model(id).await? else {
            return Ok(false);
        };

        let mut active: ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.db).await?;

        Ok(true)
    }
}
