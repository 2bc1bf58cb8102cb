//! SeaORM implementation of KitRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{
    ComponentSummary, CreateKitInput, DomainError, ItemStatus, Kit, KitComponent, KitRepository,
    Page, UpdateKitInput,
};
use crate::models::component::Entity as ComponentEntity;
use crate::models::kit::{self, ActiveModel, Column, Entity as KitEntity};
use crate::models::kit_component::{
    self, ActiveModel as KitComponentActiveModel, Entity as KitComponentEntity,
};

/// SeaORM-based implementation of KitRepository
pub struct SeaOrmKitRepository {
    db: DatabaseConnection,
}

impl SeaOrmKitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: i32) -> Result<Option<kit::Model>, DomainError> {
        Ok(KitEntity::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?)
    }

    async fn load_one(&self, model: kit::Model) -> Result<Kit, DomainError> {
        load_kits(&self.db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("kit vanished while loading".to_string()))
    }
}

fn duplicate_kit_code(e: sea_orm::DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Validation(_) => DomainError::validation("Kit code already exists"),
        other => other,
    }
}

/// Attach memberships (with a short component view) to each kit row.
/// Used by loan queries as well, so it accepts any connection.
pub(crate) async fn load_kits<C: ConnectionTrait>(
    db: &C,
    kits: Vec<kit::Model>,
) -> Result<Vec<Kit>, DomainError> {
    let kit_ids: Vec<i32> = kits.iter().map(|k| k.id).collect();
    let mut members: HashMap<i32, Vec<KitComponent>> = HashMap::new();

    if !kit_ids.is_empty() {
        let links = KitComponentEntity::find()
            .filter(kit_component::Column::KitId.is_in(kit_ids))
            .order_by_asc(kit_component::Column::Id)
            .find_also_related(ComponentEntity)
            .all(db)
            .await?;

        for (link, component) in links {
            let Some(component) = component else {
                continue;
            };
            members.entry(link.kit_id).or_default().push(KitComponent {
                id: link.id,
                component_id: link.component_id,
                quantity: link.quantity,
                component: ComponentSummary {
                    id: component.id,
                    name: component.name,
                    serial_number: component.serial_number,
                    status: component.status.parse()?,
                },
            });
        }
    }

    kits.into_iter()
        .map(|kit| {
            Ok(Kit {
                components: members.remove(&kit.id).unwrap_or_default(),
                id: kit.id,
                name: kit.name,
                description: kit.description,
                kit_code: kit.kit_code,
                status: kit.status.parse()?,
                is_active: kit.is_active,
                created_at: kit.created_at,
                updated_at: kit.updated_at,
            })
        })
        .collect()
}

#[async_trait]
impl KitRepository for SeaOrmKitRepository {
    async fn find_all(&self, page: Page) -> Result<Vec<Kit>, DomainError> {
        let kits = KitEntity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        load_kits(&self.db, kits).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Kit>, DomainError> {
        match self.find_active_model(id).await? {
            Some(model) => self.load_one(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_kit_code(&self, kit_code: &str) -> Result<Option<Kit>, DomainError> {
        let result = KitEntity::find()
            .filter(Column::KitCode.eq(kit_code))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        match result {
            Some(model) => self.load_one(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, input: CreateKitInput) -> Result<Kit, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let new_kit = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            kit_code: Set(input.kit_code),
            status: Set(ItemStatus::Available.as_str().to_owned()),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        let saved = new_kit.insert(&txn).await.map_err(duplicate_kit_code)?;

        for member in input.components {
            KitComponentActiveModel {
                kit_id: Set(saved.id),
                component_id: Set(member.component_id),
                quantity: Set(member.quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.load_one(saved).await
    }

    async fn update(&self, id: i32, input: UpdateKitInput) -> Result<Option<Kit>, DomainError> {
        let Some(existing) = self.find_active_model(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(kit_code) = input.kit_code {
            active.kit_code = Set(kit_code);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await.map_err(duplicate_kit_code)?;

        self.load_one(result).await.map(Some)
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

    async fn set_component(
        &self,
        kit_id: i32,
        component_id: i32,
        quantity: i32,
    ) -> Result<Option<Kit>, DomainError> {
        let Some(kit) = self.find_active_model(kit_id).await? else {
            return Ok(None);
        };

        // Single statement upsert on UNIQUE(kit_id, component_id)
        KitComponentEntity::insert(KitComponentActiveModel {
            kit_id: Set(kit_id),
            component_id: Set(component_id),
            quantity: Set(quantity),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                kit_component::Column::KitId,
                kit_component::Column::ComponentId,
            ])
            .update_column(kit_component::Column::Quantity)
            .to_owned(),
        )
        .exec(&self.db)
        .await?;

        self.load_one(kit).await.map(Some)
    }

    async fn remove_component(
        &self,
        kit_id: i32,
        component_id: i32,
    ) -> Result<Option<Kit>, DomainError> {
        let Some(kit) = self.find_active_model(kit_id).await? else {
            return Ok(None);
        };

        let result = KitComponentEntity::delete_many()
            .filter(kit_component::Column::KitId.eq(kit_id))
            .filter(kit_component::Column::ComponentId.eq(component_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        self.load_one(kit).await.map(Some)
    }
}
