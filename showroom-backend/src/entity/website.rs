use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use showroom_shared::AssetPath;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "website")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Generic title, used when an edition has no title of its own
    pub title: String,
    pub category_id: Uuid,
    /// Deprecated, kept for existing data
    pub order: i32,
    pub country: Option<String>,
    /// Deprecated, kept for existing data
    #[sea_orm(column_type = "Text")]
    pub desc: String,
    /// Storage path of the screenshot, owned exclusively by this row
    pub screenshot: AssetPath,
    pub url: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::edition_website::Entity")]
    EditionWebsites,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::edition_website::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EditionWebsites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
