//! Editions and the websites placed in them

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use showroom_shared::fields::{EDITION_FIELDS, EDITION_WEBSITE_FIELDS};
use showroom_shared::ShowroomError;
use tracing::{debug, error};
use uuid::Uuid;

use crate::entity::{edition, edition_website, website};
use crate::validation::{check_color, check_country, check_length, check_required};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewEdition {
    pub site_title: String,
    pub country: String,
    #[serde(default)]
    pub order: i32,
    pub short_description: String,
    pub html_title: String,
    pub site_subtitle: String,
    pub rss_title: String,
    pub rss_description: String,
    #[serde(default)]
    pub facebook_url: Option<String>,
    pub home_menu_title: String,
    pub home_menu_color: String,
    pub home_menu_active_color: String,
    pub home_num_websites: i32,
    pub footer_left: String,
    pub footer_right: String,
    pub contact_title: String,
    pub contact_html: String,
    #[serde(default)]
    pub comments: String,
}

impl NewEdition {
    pub fn validate(&self) -> Result<(), ShowroomError> {
        check_required("site_title", &self.site_title)?;
        check_country(&self.country)?;
        for (name, value) in [
            ("site_title", &self.site_title),
            ("short_description", &self.short_description),
            ("html_title", &self.html_title),
            ("site_subtitle", &self.site_subtitle),
            ("rss_title", &self.rss_title),
            ("rss_description", &self.rss_description),
            ("home_menu_title", &self.home_menu_title),
            ("footer_left", &self.footer_left),
            ("footer_right", &self.footer_right),
            ("contact_title", &self.contact_title),
        ] {
            check_length(EDITION_FIELDS, name, value)?;
        }
        if let Some(facebook_url) = &self.facebook_url {
            check_length(EDITION_FIELDS, "facebook_url", facebook_url)?;
        }
        check_color("home_menu_color", &self.home_menu_color)?;
        check_color("home_menu_active_color", &self.home_menu_active_color)?;
        if self.home_num_websites < 0 {
            return Err(ShowroomError::ValidationError(
                "home_num_websites can't be negative".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn create_edition<C: ConnectionTrait>(
    conn: &C,
    new: NewEdition,
) -> Result<edition::Model, ShowroomError> {
    new.validate()?;

    let saved = edition::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_title: Set(new.site_title),
        country: Set(new.country),
        order: Set(new.order),
        short_description: Set(new.short_description),
        html_title: Set(new.html_title),
        site_subtitle: Set(new.site_subtitle),
        rss_title: Set(new.rss_title),
        rss_description: Set(new.rss_description),
        facebook_url: Set(new.facebook_url.filter(|url| !url.is_empty())),
        home_menu_title: Set(new.home_menu_title),
        home_menu_color: Set(new.home_menu_color),
        home_menu_active_color: Set(new.home_menu_active_color),
        home_num_websites: Set(new.home_num_websites),
        footer_left: Set(new.footer_left),
        footer_right: Set(new.footer_right),
        contact_title: Set(new.contact_title),
        contact_html: Set(new.contact_html),
        comments: Set(new.comments),
    }
    .insert(conn)
    .await
    .inspect_err(|err| error!("Failed to save edition: {:?}", err))?;

    debug!("Created edition {}", saved);
    Ok(saved)
}

pub async fn list_editions<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<edition::Model>, ShowroomError> {
    Ok(edition::Entity::find()
        .order_by_asc(edition::Column::Order)
        .order_by_asc(edition::Column::SiteTitle)
        .all(conn)
        .await?)
}

/// The edition served when none is asked for: first in order.
pub async fn default_edition<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<edition::Model>, ShowroomError> {
    Ok(edition::Entity::find()
        .order_by_asc(edition::Column::Order)
        .order_by_asc(edition::Column::SiteTitle)
        .one(conn)
        .await?)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewEditionWebsite {
    pub edition_id: Uuid,
    pub website_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub order: i32,
}

pub async fn add_website_to_edition<C: ConnectionTrait>(
    conn: &C,
    new: NewEditionWebsite,
) -> Result<edition_website::Model, ShowroomError> {
    if let Some(title) = &new.title {
        check_length(EDITION_WEBSITE_FIELDS, "title", title)?;
    }
    if edition::Entity::find_by_id(new.edition_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(ShowroomError::NotFound(format!(
            "edition {}",
            new.edition_id
        )));
    }
    if website::Entity::find_by_id(new.website_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(ShowroomError::NotFound(format!(
            "website {}",
            new.website_id
        )));
    }

    Ok(edition_website::ActiveModel {
        id: Set(Uuid::new_v4()),
        edition_id: Set(new.edition_id),
        website_id: Set(new.website_id),
        title: Set(new.title.filter(|title| !title.is_empty())),
        desc: Set(new.desc),
        order: Set(new.order),
        pub_date: Set(Utc::now()),
    }
    .insert(conn)
    .await?)
}

/// A website as shown in one edition.
#[derive(Clone, Debug, Serialize)]
pub struct EditionListing {
    pub title: String,
    pub entry: edition_website::Model,
    pub website: website::Model,
}

/// Websites of an edition in display order, each titled per [`edition_website::Model::get_title`].
pub async fn edition_websites<C: ConnectionTrait>(
    conn: &C,
    edition_id: Uuid,
) -> Result<Vec<EditionListing>, ShowroomError> {
    let rows = edition_website::Entity::find()
        .filter(edition_website::Column::EditionId.eq(edition_id))
        .find_also_related(website::Entity)
        .order_by_asc(edition_website::Column::Order)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(entry, website)| {
            let website = website?;
            Some(EditionListing {
                title: entry.get_title(&website).to_string(),
                entry,
                website,
            })
        })
        .collect())
}
