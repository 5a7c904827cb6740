use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog item entity
///
/// Rows are written by the point-of-sale catalog sync; this service reads
/// them for identifier resolution and reorder analysis. `quantity_on_hand`
/// is the authoritative current stock at the primary location and may be
/// negative after oversells or miscounts.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Primary key: opaque catalog identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Item display name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Item name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Secondary SKU used on shelf labels
    pub sku: Option<String>,

    /// Barcode / UPC
    pub upc: Option<String>,

    /// Per-unit acquisition cost (used for order cost estimates)
    pub unit_cost: Decimal,

    /// Retail price
    pub retail_price: Decimal,

    /// Current on-hand quantity at the primary location (signed)
    pub quantity_on_hand: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Item entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_event::Entity")]
    InventoryEvents,
}

impl Related<super::inventory_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryEvents.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(Utc::now());
            }
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        Ok(active_model)
    }
}
