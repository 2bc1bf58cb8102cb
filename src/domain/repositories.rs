//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: u64 = 100;

/// Largest page a list endpoint hands out
pub const MAX_LIMIT: u64 = 1000;

/// Availability of a component or kit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Loaned,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Loaned => "loaned",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(ItemStatus::Available),
            "loaned" => Ok(ItemStatus::Loaned),
            other => Err(DomainError::Internal(format!(
                "unknown item status '{}'",
                other
            ))),
        }
    }
}

/// Loan lifecycle state. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            other => Err(DomainError::Internal(format!(
                "unknown loan status '{}'",
                other
            ))),
        }
    }
}

/// Offset/limit window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    /// Query values are clamped: SQLite binds offset and limit as `i64`.
    pub fn new(offset: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            offset: offset.unwrap_or(0).min(i64::MAX as u64),
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Component data for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Component {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: ItemStatus,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a component
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateComponentInput {
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Input for updating a component. Status is not patchable here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateComponentInput {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Repository trait for Component entity
#[async_trait]
pub trait ComponentRepository: Send + Sync {
    /// Find active components, ordered by id
    async fn find_all(&self, page: Page) -> Result<Vec<Component>, DomainError>;

    /// Find an active component by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Component>, DomainError>;

    /// Find an active component by serial number
    async fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> Result<Option<Component>, DomainError>;

    /// Create a new component (status `available`)
    async fn create(&self, input: CreateComponentInput) -> Result<Component, DomainError>;

    /// Patch an active component. `None` when it does not exist.
    async fn update(
        &self,
        id: i32,
        input: UpdateComponentInput,
    ) -> Result<Option<Component>, DomainError>;

    /// Flip `is_active` to false. Returns whether an active row was found.
    async fn soft_delete(&self, id: i32) -> Result<bool, DomainError>;
}

// ---------------------------------------------------------------------------
// Kits
// ---------------------------------------------------------------------------

/// Short component view embedded in kit memberships
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentSummary {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub status: ItemStatus,
}

/// One (component, quantity) entry of a kit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KitComponent {
    pub id: i32,
    pub component_id: i32,
    pub quantity: i32,
    pub component: ComponentSummary,
}

/// Kit data for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Kit {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub kit_code: String,
    pub status: ItemStatus,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub components: Vec<KitComponent>,
}

/// Membership entry supplied when creating a kit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct KitMemberInput {
    pub component_id: i32,
    pub quantity: i32,
}

/// Input for creating a kit
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateKitInput {
    pub name: String,
    pub description: Option<String>,
    pub kit_code: String,
    #[serde(default)]
    pub components: Vec<KitMemberInput>,
}

/// Input for updating a kit. Status is not patchable here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateKitInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kit_code: Option<String>,
}

/// Repository trait for Kit entity and its component memberships
#[async_trait]
pub trait KitRepository: Send + Sync {
    /// Find active kits with their components, ordered by id
    async fn find_all(&self, page: Page) -> Result<Vec<Kit>, DomainError>;

    /// Find an active kit by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Kit>, DomainError>;

    /// Find an active kit by kit code
    async fn find_by_kit_code(&self, kit_code: &str) -> Result<Option<Kit>, DomainError>;

    /// Create a kit together with its initial memberships
    async fn create(&self, input: CreateKitInput) -> Result<Kit, DomainError>;

    /// Patch an active kit. `None` when it does not exist.
    async fn update(&self, id: i32, input: UpdateKitInput) -> Result<Option<Kit>, DomainError>;

    /// Flip `is_active` to false. Returns whether an active row was found.
    async fn soft_delete(&self, id: i32) -> Result<bool, DomainError>;

    /// Insert a membership or replace its quantity. `None` when the kit is missing.
    async fn set_component(
        &self,
        kit_id: i32,
        component_id: i32,
        quantity: i32,
    ) -> Result<Option<Kit>, DomainError>;

    /// Drop a membership. `None` when the kit is missing, `NotFound` when the
    /// component is not a member.
    async fn remove_component(
        &self,
        kit_id: i32,
        component_id: i32,
    ) -> Result<Option<Kit>, DomainError>;
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

/// The single item a loan refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanTarget {
    Component(i32),
    Kit(i32),
}

impl LoanTarget {
    /// Exactly one reference must be given.
    pub fn from_refs(component_id: Option<i32>, kit_id: Option<i32>) -> Result<Self, DomainError> {
        match (component_id, kit_id) {
            (Some(id), None) => Ok(LoanTarget::Component(id)),
            (None, Some(id)) => Ok(LoanTarget::Kit(id)),
            (Some(_), Some(_)) => Err(DomainError::validation(
                "A loan must reference either a component or a kit, not both",
            )),
            (None, None) => Err(DomainError::validation(
                "A loan must reference a component or a kit",
            )),
        }
    }

    pub fn component_id(&self) -> Option<i32> {
        match self {
            LoanTarget::Component(id) => Some(*id),
            LoanTarget::Kit(_) => None,
        }
    }

    pub fn kit_id(&self) -> Option<i32> {
        match self {
            LoanTarget::Kit(id) => Some(*id),
            LoanTarget::Component(_) => None,
        }
    }
}

/// Loan data for API responses, with the borrowed item embedded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_name: String,
    pub user_email: String,
    pub component_id: Option<i32>,
    pub kit_id: Option<i32>,
    pub loan_date: String,
    pub expected_return_date: String,
    pub return_date: Option<String>,
    pub status: LoanStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub component: Option<Component>,
    pub kit: Option<Kit>,
}

/// Loan request as received from clients
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLoanInput {
    pub user_name: String,
    pub user_email: String,
    pub component_id: Option<i32>,
    pub kit_id: Option<i32>,
    /// RFC 3339 timestamp
    pub expected_return_date: String,
    pub notes: Option<String>,
}

/// Validated loan request handed to the repository
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub target: LoanTarget,
    pub user_name: String,
    pub user_email: String,
    pub expected_return_date: String,
    pub notes: Option<String>,
}

/// Descriptive fields of a loan that may be patched.
/// Status and return date only change through the return operation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateLoanInput {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub expected_return_date: Option<String>,
    pub notes: Option<String>,
}

/// Filter criteria for loan queries
#[derive(Debug, Default, Clone)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
    pub page: Page,
}

/// Repository trait for Loan entity
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find loans matching the filter, newest first
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<Loan>, DomainError>;

    /// Find a loan by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Loan>, DomainError>;

    /// Find every loan still out
    async fn find_active(&self) -> Result<Vec<Loan>, DomainError>;

    /// Atomically claim the target item and record an active loan.
    async fn open(&self, loan: NewLoan) -> Result<Loan, DomainError>;

    /// Atomically release the item and mark the loan returned.
    async fn close(&self, id: i32) -> Result<Loan, DomainError>;

    /// Patch descriptive fields. `None` when the loan does not exist.
    async fn update_details(
        &self,
        id: i32,
        input: UpdateLoanInput,
    ) -> Result<Option<Loan>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_target_requires_exactly_one_reference() {
        assert_eq!(
            LoanTarget::from_refs(Some(3), None).unwrap(),
            LoanTarget::Component(3)
        );
        assert_eq!(LoanTarget::from_refs(None, Some(7)).unwrap(), LoanTarget::Kit(7));
        assert!(matches!(
            LoanTarget::from_refs(Some(1), Some(2)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            LoanTarget::from_refs(None, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn statuses_round_trip_through_their_column_text() {
        for status in [ItemStatus::Available, ItemStatus::Loaned] {
            assert_eq!(status.as_str().parse::<ItemStatus>().unwrap(), status);
        }
        for status in [LoanStatus::Active, LoanStatus::Returned] {
            assert_eq!(status.as_str().parse::<LoanStatus>().unwrap(), status);
        }
        assert!("lost".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn page_defaults_to_first_hundred() {
        assert_eq!(Page::default(), Page { offset: 0, limit: 100 });
        assert_eq!(Page::new(Some(20), Some(5)), Page { offset: 20, limit: 5 });
    }

    #[test]
    fn page_is_clamped_to_bindable_values() {
        let page = Page::new(Some(u64::MAX), Some(u64::MAX));
        assert_eq!(page.offset, i64::MAX as u64);
        assert_eq!(page.limit, MAX_LIMIT);
    }
}
