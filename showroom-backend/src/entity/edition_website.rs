use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::website;

/// Places a website in an edition, optionally with edition specific text.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "edition_website")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub edition_id: Uuid,
    pub website_id: Uuid,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub desc: String,
    pub order: i32,
    pub pub_date: DateTime<Utc>,
}

impl Model {
    /// The edition specific title, or the website's generic one when unset.
    pub fn get_title<'a>(&'a self, website: &'a website::Model) -> &'a str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &website.title,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::edition::Entity",
        from = "Column::EditionId",
        to = "super::edition::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Edition,
    #[sea_orm(
        belongs_to = "super::website::Entity",
        from = "Column::WebsiteId",
        to = "super::website::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Website,
}

impl Related<super::edition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Edition.def()
    }
}

impl Related<super::website::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Website.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
