//! Website records and the lifecycle of their screenshots
//!
//! The row and its screenshot file are kept in step here: an upload is written
//! to a fresh path before the row is saved, the thumbnail processor runs once
//! the row exists, and the file is removed before the row is deleted.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use showroom_shared::fields::WEBSITE_FIELDS;
use showroom_shared::{AssetPath, ShowroomError};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::asset::{AssetError, Thumbnail};
use crate::entity::{category, website};
use crate::validation::{check_country, check_length, check_required};
use crate::AppState;

/// An uploaded screenshot, before it has a storage path.
#[derive(Clone)]
pub struct ScreenshotUpload {
    /// Name the file was uploaded under, only its extension is kept.
    pub filename: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ScreenshotUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenshotUpload")
            .field("filename", &self.filename)
            .field("size", &self.data.len())
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewWebsite {
    pub title: String,
    pub category_id: Uuid,
    pub url: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub desc: String,
}

impl NewWebsite {
    pub fn validate(&self) -> Result<(), ShowroomError> {
        check_required("title", &self.title)?;
        check_length(WEBSITE_FIELDS, "title", &self.title)?;
        check_required("url", &self.url)?;
        check_length(WEBSITE_FIELDS, "url", &self.url)?;
        if let Some(country) = &self.country {
            check_country(country)?;
        }
        Ok(())
    }
}

/// Field changes for [`update_website`], `None` leaves a field as it is.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WebsiteChanges {
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
    pub url: Option<String>,
    /// `Some(None)` clears the country.
    pub country: Option<Option<String>>,
    pub order: Option<i32>,
    pub desc: Option<String>,
}

impl WebsiteChanges {
    pub fn validate(&self) -> Result<(), ShowroomError> {
        if let Some(title) = &self.title {
            check_required("title", title)?;
            check_length(WEBSITE_FIELDS, "title", title)?;
        }
        if let Some(url) = &self.url {
            check_required("url", url)?;
            check_length(WEBSITE_FIELDS, "url", url)?;
        }
        if let Some(Some(country)) = &self.country {
            check_country(country)?;
        }
        Ok(())
    }
}

/// A saved website and how its screenshot processing went.
///
/// A processing failure does not undo the save: the record stays and keeps
/// pointing at the unprocessed upload.
#[derive(Debug)]
pub struct SavedWebsite {
    pub website: website::Model,
    pub thumbnail: Result<Thumbnail, AssetError>,
    /// Screenshot left behind in storage after being replaced by a new upload.
    pub orphaned: Option<AssetPath>,
}

impl SavedWebsite {
    pub fn warning(&self) -> Option<&AssetError> {
        self.thumbnail.as_ref().err()
    }
}

async fn ensure_category(state: &AppState, category_id: Uuid) -> Result<(), ShowroomError> {
    match category::Entity::find_by_id(category_id)
        .one(&state.conn)
        .await?
    {
        Some(_) => Ok(()),
        None => Err(ShowroomError::NotFound(format!("category {category_id}"))),
    }
}

/// Writes `upload` to a freshly generated path.
async fn store_screenshot(
    state: &AppState,
    upload: &ScreenshotUpload,
) -> Result<AssetPath, ShowroomError> {
    let path = state.pipeline.generate_path(&upload.filename)?;
    state.pipeline.store_upload(&path, &upload.data).await?;
    debug!(
        "Stored upload {:?} ({} bytes) at {}",
        upload.filename,
        upload.data.len(),
        path
    );
    Ok(path)
}

pub async fn create_website(
    state: &AppState,
    new: NewWebsite,
    upload: ScreenshotUpload,
) -> Result<SavedWebsite, ShowroomError> {
    new.validate()?;
    ensure_category(state, new.category_id).await?;

    let path = store_screenshot(state, &upload).await?;

    let model = website::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(new.title),
        category_id: Set(new.category_id),
        order: Set(new.order),
        country: Set(new.country.filter(|c| !c.is_empty())),
        desc: Set(new.desc),
        screenshot: Set(path.clone()),
        url: Set(new.url),
        pub_date: Set(Utc::now()),
    };
    let saved = match model.insert(&state.conn).await {
        Ok(saved) => saved,
        Err(err) => {
            error!("Failed to save website, removing its upload: {:?}", err);
            state.pipeline.delete_asset(&path).await;
            return Err(err.into());
        }
    };
    debug!("Created website {} ({})", saved.title, saved.id);

    let thumbnail = state.pipeline.after_save(&saved.screenshot).await;
    Ok(SavedWebsite {
        website: saved,
        thumbnail,
        orphaned: None,
    })
}

/// Applies `changes` and, if given, a replacement screenshot.
///
/// A replacement gets a new path; the previous file stays in storage and is
/// reported in [`SavedWebsite::orphaned`]. Without one the processor re-runs
/// on the current file, which is a no-op for an already processed image.
pub async fn update_website(
    state: &AppState,
    id: Uuid,
    changes: WebsiteChanges,
    upload: Option<ScreenshotUpload>,
) -> Result<SavedWebsite, ShowroomError> {
    changes.validate()?;
    let existing = website::Entity::find_by_id(id)
        .one(&state.conn)
        .await?
        .ok_or_else(|| ShowroomError::NotFound(format!("website {id}")))?;
    if let Some(category_id) = changes.category_id {
        ensure_category(state, category_id).await?;
    }

    let previous = existing.screenshot.clone();
    let mut target = existing.into_active_model();
    if let Some(title) = changes.title {
        target.title = Set(title);
    }
    if let Some(category_id) = changes.category_id {
        target.category_id = Set(category_id);
    }
    if let Some(url) = changes.url {
        target.url = Set(url);
    }
    if let Some(country) = changes.country {
        target.country = Set(country.filter(|c| !c.is_empty()));
    }
    if let Some(order) = changes.order {
        target.order = Set(order);
    }
    if let Some(desc) = changes.desc {
        target.desc = Set(desc);
    }

    let replacement = match &upload {
        Some(upload) => {
            let path = store_screenshot(state, upload).await?;
            target.screenshot = Set(path.clone());
            Some(path)
        }
        None => None,
    };

    let saved = match target.update(&state.conn).await {
        Ok(saved) => saved,
        Err(err) => {
            error!("Failed to update website {}: {:?}", id, err);
            if let Some(path) = &replacement {
                state.pipeline.delete_asset(path).await;
            }
            return Err(err.into());
        }
    };

    let orphaned = replacement.map(|_| {
        warn!(
            "Website {} now uses {}, previous screenshot {} left in storage",
            id, saved.screenshot, previous
        );
        previous
    });

    let thumbnail = state.pipeline.after_save(&saved.screenshot).await;
    Ok(SavedWebsite {
        website: saved,
        thumbnail,
        orphaned,
    })
}

/// Deletes the website and its screenshot, returns whether it existed.
///
/// The screenshot goes first and a failure to remove it never blocks the
/// row deletion.
pub async fn delete_website(state: &AppState, id: Uuid) -> Result<bool, ShowroomError> {
    let Some(existing) = website::Entity::find_by_id(id).one(&state.conn).await? else {
        debug!("Website {} already gone", id);
        return Ok(false);
    };

    state.pipeline.before_delete(&existing.screenshot).await;
    existing
        .delete(&state.conn)
        .await
        .inspect_err(|err| error!("Failed to delete website {}: {:?}", id, err))?;
    debug!("Deleted website {}", id);
    Ok(true)
}

pub async fn get_website(state: &AppState, id: Uuid) -> Result<website::Model, ShowroomError> {
    website::Entity::find_by_id(id)
        .one(&state.conn)
        .await?
        .ok_or_else(|| ShowroomError::NotFound(format!("website {id}")))
}

/// Websites ordered by their category's order, then their own.
pub async fn list_websites(
    state: &AppState,
    category_id: Option<Uuid>,
) -> Result<Vec<website::Model>, ShowroomError> {
    let mut query = website::Entity::find().find_also_related(category::Entity);
    if let Some(category_id) = category_id {
        query = query.filter(website::Column::CategoryId.eq(category_id));
    }
    Ok(query
        .order_by_asc(category::Column::Order)
        .order_by_asc(website::Column::Order)
        .order_by_asc(website::Column::PubDate)
        .all(&state.conn)
        .await?
        .into_iter()
        .map(|(website, _)| website)
        .collect())
}
