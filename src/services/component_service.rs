//! Component Service - catalog rules for single components

use crate::domain::{
    Component, ComponentRepository, CreateComponentInput, DomainError, Page, UpdateComponentInput,
};

pub async fn list_components(
    repo: &dyn ComponentRepository,
    page: Page,
) -> Result<Vec<Component>, DomainError> {
    repo.find_all(page).await
}

pub async fn get_component(
    repo: &dyn ComponentRepository,
    id: i32,
) -> Result<Component, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

/// Create a component. The serial number must not be in use by an active component.
pub async fn create_component(
    repo: &dyn ComponentRepository,
    input: CreateComponentInput,
) -> Result<Component, DomainError> {
    require_text("name", &input.name)?;
    require_text("serial_number", &input.serial_number)?;

    if repo
        .find_by_serial_number(&input.serial_number)
        .await?
        .is_some()
    {
        tracing::warn!("Rejected duplicate serial number {}", input.serial_number);
        return Err(DomainError::validation("Serial number already exists"));
    }

    let component = repo.create(input).await?;
    tracing::info!(
        "Component {} registered ({})",
        component.id,
        component.serial_number
    );
    Ok(component)
}

pub async fn update_component(
    repo: &dyn ComponentRepository,
    id: i32,
    input: UpdateComponentInput,
) -> Result<Component, DomainError> {
    if let Some(name) = &input.name {
        require_text("name", name)?;
    }
    if let Some(serial_number) = &input.serial_number {
        require_text("serial_number", serial_number)?;
        if let Some(other) = repo.find_by_serial_number(serial_number).await? {
            if other.id != id {
                return Err(DomainError::validation("Serial number already exists"));
            }
        }
    }

    repo.update(id, input).await?.ok_or(DomainError::NotFound)
}

/// Soft delete: the row stays for loan history.
pub async fn delete_component(repo: &dyn ComponentRepository, id: i32) -> Result<(), DomainError> {
    if repo.soft_delete(id).await? {
        tracing::info!("Component {} deactivated", id);
        Ok(())
    } else {
        Err(DomainError::NotFound)
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
