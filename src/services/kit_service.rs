//! Kit Service - catalog rules for kits and their component lists

use std::collections::HashSet;

use crate::domain::{
    ComponentRepository, CreateKitInput, DomainError, Kit, KitRepository, Page, UpdateKitInput,
};
use crate::services::component_service::require_text;

pub async fn list_kits(repo: &dyn KitRepository, page: Page) -> Result<Vec<Kit>, DomainError> {
    repo.find_all(page).await
}

pub async fn get_kit(repo: &dyn KitRepository, id: i32) -> Result<Kit, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

/// Create a kit. The kit code must be free among active kits and every
/// listed component must exist, appear once, and have a positive quantity.
pub async fn create_kit(
    kits: &dyn KitRepository,
    components: &dyn ComponentRepository,
    input: CreateKitInput,
) -> Result<Kit, DomainError> {
    require_text("name", &input.name)?;
    require_text("kit_code", &input.kit_code)?;

    if kits.find_by_kit_code(&input.kit_code).await?.is_some() {
        tracing::warn!("Rejected duplicate kit code {}", input.kit_code);
        return Err(DomainError::validation("Kit code already exists"));
    }

    let mut seen = HashSet::new();
    for member in &input.components {
        if !seen.insert(member.component_id) {
            return Err(DomainError::validation(format!(
                "Component {} is listed more than once",
                member.component_id
            )));
        }
        check_member(components, member.component_id, member.quantity).await?;
    }

    let kit = kits.create(input).await?;
    tracing::info!(
        "Kit {} registered ({}) with {} components",
        kit.id,
        kit.kit_code,
        kit.components.len()
    );
    Ok(kit)
}

pub async fn update_kit(
    repo: &dyn KitRepository,
    id: i32,
    input: UpdateKitInput,
) -> Result<Kit, DomainError> {
    if let Some(name) = &input.name {
        require_text("name", name)?;
    }
    if let Some(kit_code) = &input.kit_code {
        require_text("kit_code", kit_code)?;
        if let Some(other) = repo.find_by_kit_code(kit_code).await? {
            if other.id != id {
                return Err(DomainError::validation("Kit code already exists"));
            }
        }
    }

    repo.update(id, input).await?.ok_or(DomainError::NotFound)
}

pub async fn delete_kit(repo: &dyn KitRepository, id: i32) -> Result<(), DomainError> {
    if repo.soft_delete(id).await? {
        tracing::info!("Kit {} deactivated", id);
        Ok(())
    } else {
        Err(DomainError::NotFound)
    }
}

/// Add a component to a kit or change its quantity.
pub async fn set_kit_component(
    kits: &dyn KitRepository,
    components: &dyn ComponentRepository,
    kit_id: i32,
    component_id: i32,
    quantity: i32,
) -> Result<Kit, DomainError> {
    check_member(components, component_id, quantity).await?;

    kits.set_component(kit_id, component_id, quantity)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Drop a component from a kit. `None` when the kit does not exist,
/// `NotFound` when the component is not a member.
pub async fn remove_kit_component(
    kits: &dyn KitRepository,
    kit_id: i32,
    component_id: i32,
) -> Result<Option<Kit>, DomainError> {
    kits.remove_component(kit_id, component_id).await
}

async fn check_member(
    components: &dyn ComponentRepository,
    component_id: i32,
    quantity: i32,
) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::validation("Quantity must be at least 1"));
    }
    if components.find_by_id(component_id).await?.is_none() {
        return Err(DomainError::validation(format!(
            "Component {} not found",
            component_id
        )));
    }
    Ok(())
}
