use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Business partner record ("entidad comercial"). A single entity may act as
/// client, supplier, or both; `entity_type` records which.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_entities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// CLIENTE, PROVEEDOR or AMBOS
    pub entity_type: String,
    /// DNI, RUC or CE
    pub document_type: String,
    /// Unique among active entities
    pub document_number: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Role a business entity plays
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum EntityType {
    #[serde(rename = "CLIENTE")]
    #[strum(serialize = "CLIENTE")]
    Cliente,
    #[serde(rename = "PROVEEDOR")]
    #[strum(serialize = "PROVEEDOR")]
    Proveedor,
    #[serde(rename = "AMBOS")]
    #[strum(serialize = "AMBOS")]
    Ambos,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cliente => "CLIENTE",
            Self::Proveedor => "PROVEEDOR",
            Self::Ambos => "AMBOS",
        }
    }

    /// Whether this entity may appear as the supplier on a purchase order
    pub fn can_supply(&self) -> bool {
        matches!(self, Self::Proveedor | Self::Ambos)
    }
}

/// Identity document kind
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum DocumentType {
    #[serde(rename = "DNI")]
    #[strum(serialize = "DNI")]
    Dni,
    #[serde(rename = "RUC")]
    #[strum(serialize = "RUC")]
    Ruc,
    #[serde(rename = "CE")]
    #[strum(serialize = "CE")]
    Ce,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dni => "DNI",
            Self::Ruc => "RUC",
            Self::Ce => "CE",
        }
    }
}
