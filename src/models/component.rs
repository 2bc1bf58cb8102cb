use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Unique among active components (partial index, see db.rs).
    pub serial_number: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Availability of the item.
    /// Valid values:
    /// - `available`: On the shelf, can be loaned
    /// - `loaned`: Referenced by an active Loan
    pub status: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::kit_component::Entity")]
    KitComponent,
    #[sea_orm(has_many = "super::loan::Entity")]
    Loan,
}

impl Related<super::kit_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KitComponent.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
