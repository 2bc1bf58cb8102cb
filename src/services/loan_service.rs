//! Loan Service - the loan lifecycle (`active` -> `returned`)
//!
//! Only `create_loan` and `return_loan` change loan or item status.
//! `update_loan` is restricted to descriptive fields.

use chrono::{DateTime, Utc};

use crate::domain::{
    CreateLoanInput, DomainError, Loan, LoanFilter, LoanRepository, LoanTarget, NewLoan,
    UpdateLoanInput,
};
use crate::services::component_service::require_text;

pub async fn list_loans(repo: &dyn LoanRepository, filter: LoanFilter) -> Result<Vec<Loan>, DomainError> {
    repo.find_all(filter).await
}

pub async fn list_active_loans(repo: &dyn LoanRepository) -> Result<Vec<Loan>, DomainError> {
    repo.find_active().await
}

pub async fn get_loan(repo: &dyn LoanRepository, id: i32) -> Result<Loan, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

/// Open a loan on exactly one available component or kit.
pub async fn create_loan(
    repo: &dyn LoanRepository,
    input: CreateLoanInput,
) -> Result<Loan, DomainError> {
    let target = LoanTarget::from_refs(input.component_id, input.kit_id)?;
    require_text("user_name", &input.user_name)?;
    validate_email(&input.user_email)?;
    let expected_return_date = normalize_timestamp(&input.expected_return_date)?;

    let result = repo
        .open(NewLoan {
            target,
            user_name: input.user_name.trim().to_owned(),
            user_email: input.user_email.trim().to_owned(),
            expected_return_date,
            notes: input.notes,
        })
        .await;

    if let Err(DomainError::Validation(reason)) = &result {
        tracing::warn!("Loan request for {:?} rejected: {}", target, reason);
    }
    result
}

/// Close a loan and put its item back on the shelf.
pub async fn return_loan(repo: &dyn LoanRepository, id: i32) -> Result<Loan, DomainError> {
    repo.close(id).await
}

/// Patch borrower details, due date or notes.
pub async fn update_loan(
    repo: &dyn LoanRepository,
    id: i32,
    mut input: UpdateLoanInput,
) -> Result<Loan, DomainError> {
    if let Some(user_name) = input.user_name.take() {
        require_text("user_name", &user_name)?;
        input.user_name = Some(user_name.trim().to_owned());
    }
    if let Some(user_email) = input.user_email.take() {
        validate_email(&user_email)?;
        input.user_email = Some(user_email.trim().to_owned());
    }
    if let Some(date) = &input.expected_return_date {
        input.expected_return_date = Some(normalize_timestamp(date)?);
    }

    repo.update_details(id, input)
        .await?
        .ok_or(DomainError::NotFound)
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Invalid email address: {}",
            email
        )))
    }
}

/// Accept any RFC 3339 offset, store UTC.
fn normalize_timestamp(value: &str) -> Result<String, DomainError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
        .map_err(|_| {
            DomainError::validation(format!(
                "expected_return_date must be an RFC 3339 timestamp, got '{}'",
                value
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_needs_local_part_and_dotted_domain() {
        assert!(validate_email("ana@uni.edu").is_ok());
        assert!(validate_email(" ana@lab.uni.edu ").is_ok());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@uni.edu").is_err());
        assert!(validate_email("ana@localhost").is_err());
        assert!(validate_email("ana@uni.edu.").is_err());
        assert!(validate_email("a@b@uni.edu").is_err());
    }

    #[test]
    fn timestamps_are_stored_in_utc() {
        assert_eq!(
            normalize_timestamp("2026-03-01T10:00:00-05:00").unwrap(),
            "2026-03-01T15:00:00+00:00"
        );
        assert!(matches!(
            normalize_timestamp("next friday"),
            Err(DomainError::Validation(_))
        ));
    }
}
