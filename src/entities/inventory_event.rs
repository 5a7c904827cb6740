use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why an item's on-hand quantity changed.
///
/// The set is closed: the ledger sync maps every source-system movement onto
/// one of these codes, and unknown strings fail the read instead of being
/// silently skipped. Demand analysis treats `Sale` and `LayawayClose` as
/// customer sales; everything else moves stock without signalling demand.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ReasonCode {
    #[sea_orm(string_value = "Sale")]
    Sale,
    #[sea_orm(string_value = "LayawayClose")]
    LayawayClose,
    #[sea_orm(string_value = "Return")]
    Return,
    #[sea_orm(string_value = "Receiving")]
    Receiving,
    #[sea_orm(string_value = "Adjustment")]
    Adjustment,
    #[sea_orm(string_value = "TransferIn")]
    TransferIn,
    #[sea_orm(string_value = "TransferOut")]
    TransferOut,
    #[sea_orm(string_value = "Damage")]
    Damage,
    #[sea_orm(string_value = "Theft")]
    Theft,
    #[sea_orm(string_value = "CycleCount")]
    CycleCount,
    #[sea_orm(string_value = "InitialStock")]
    InitialStock,
}

impl ReasonCode {
    /// True for codes that represent a customer taking goods home.
    /// A layaway close is the moment the last payment clears and the item
    /// leaves the store, so it counts as a sale for demand purposes.
    pub fn is_sale(&self) -> bool {
        matches!(self, ReasonCode::Sale | ReasonCode::LayawayClose)
    }
}

/// One row in the append-only stock ledger.
///
/// `quantity_delta` is signed: sales and outbound transfers are negative,
/// receipts and returns positive. Rows are never updated or deleted; the
/// running sum over a complete, time-ordered slice reconciles exactly with
/// the item's `quantity_on_hand`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: String,
    pub quantity_delta: i32,
    pub reason: ReasonCode,
    pub occurred_at: DateTime<Utc>,
    pub location_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.id {
            active_model.id = Set(Uuid::new_v4());
        }
        Ok(active_model)
    }
}
