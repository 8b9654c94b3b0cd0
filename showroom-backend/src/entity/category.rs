use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Groups listed websites, shown as a coloured menu entry.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub url_name: String,
    pub order: i32,
    pub color: String,
    pub active_color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::website::Entity")]
    Websites,
}

impl Related<super::website::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Websites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
