use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A localized variant of the showroom, one per country/language.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "edition")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_title: String,
    pub country: String,
    /// The lowest order is the default edition.
    pub order: i32,
    pub short_description: String,
    pub html_title: String,
    pub site_subtitle: String,
    pub rss_title: String,
    pub rss_description: String,
    pub facebook_url: Option<String>,
    pub home_menu_title: String,
    pub home_menu_color: String,
    pub home_menu_active_color: String,
    pub home_num_websites: i32,
    pub footer_left: String,
    pub footer_right: String,
    pub contact_title: String,
    #[sea_orm(column_type = "Text")]
    pub contact_html: String,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.site_title, self.country)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::edition_website::Entity")]
    EditionWebsites,
}

impl Related<super::edition_website::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EditionWebsites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
