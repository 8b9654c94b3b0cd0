//! Category records

use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use showroom_shared::fields::CATEGORY_FIELDS;
use showroom_shared::ShowroomError;
use tracing::{debug, error};
use uuid::Uuid;

use crate::entity::{category, website};
use crate::validation::{check_color, check_length, check_required, check_url_name};
use crate::AppState;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub url_name: String,
    #[serde(default)]
    pub order: i32,
    pub color: String,
    pub active_color: String,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), ShowroomError> {
        check_required("name", &self.name)?;
        check_length(CATEGORY_FIELDS, "name", &self.name)?;
        check_url_name(&self.url_name)?;
        check_length(CATEGORY_FIELDS, "url_name", &self.url_name)?;
        check_color("color", &self.color)?;
        check_color("active_color", &self.active_color)?;
        Ok(())
    }
}

pub async fn create_category<C: ConnectionTrait>(
    conn: &C,
    new: NewCategory,
) -> Result<category::Model, ShowroomError> {
    new.validate()?;
    if find_by_url_name(conn, &new.url_name).await?.is_some() {
        return Err(ShowroomError::ValidationError(format!(
            "a category with url_name {:?} already exists",
            new.url_name
        )));
    }

    let saved = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        url_name: Set(new.url_name),
        order: Set(new.order),
        color: Set(new.color),
        active_color: Set(new.active_color),
    }
    .insert(conn)
    .await
    .inspect_err(|err| error!("Failed to save category: {:?}", err))?;

    debug!("Created category {} ({})", saved.url_name, saved.id);
    Ok(saved)
}

/// All categories, in menu order.
pub async fn list_categories<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<category::Model>, ShowroomError> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Order)
        .order_by_asc(category::Column::Name)
        .all(conn)
        .await?)
}

pub async fn find_by_url_name<C: ConnectionTrait>(
    conn: &C,
    url_name: &str,
) -> Result<Option<category::Model>, ShowroomError> {
    Ok(category::Entity::find()
        .filter(category::Column::UrlName.eq(url_name))
        .one(conn)
        .await?)
}

/// Deletes a category together with its websites.
///
/// Every website's screenshot is removed before the rows go, the websites
/// and their edition entries are then dropped by the cascade. Returns
/// whether the category existed.
pub async fn delete_category(state: &AppState, id: Uuid) -> Result<bool, ShowroomError> {
    let Some(category) = category::Entity::find_by_id(id).one(&state.conn).await? else {
        debug!("Category {} already gone", id);
        return Ok(false);
    };

    let websites = category
        .find_related(website::Entity)
        .all(&state.conn)
        .await?;
    for site in &websites {
        state.pipeline.before_delete(&site.screenshot).await;
    }

    category
        .delete(&state.conn)
        .await
        .inspect_err(|err| error!("Failed to delete category {}: {:?}", id, err))?;
    debug!(
        "Deleted category {} along with {} website(s)",
        id,
        websites.len()
    );
    Ok(true)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::start_db;

    pub(crate) fn sample_category(url_name: &str, order: i32) -> NewCategory {
        NewCategory {
            name: format!("Category {url_name}"),
            url_name: url_name.to_string(),
            order,
            color: "#003300".to_string(),
            active_color: "#006600".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_in_order() {
        let conn = start_db(None).await.expect("db");
        create_category(&conn, sample_category("tools", 300))
            .await
            .expect("tools");
        create_category(&conn, sample_category("design", 100))
            .await
            .expect("design");
        create_category(&conn, sample_category("blogs", 200))
            .await
            .expect("blogs");

        let names: Vec<String> = list_categories(&conn)
            .await
            .expect("list")
            .into_iter()
            .map(|c| c.url_name)
            .collect();
        assert_eq!(names, vec!["design", "blogs", "tools"]);

        assert!(find_by_url_name(&conn, "blogs")
            .await
            .expect("lookup")
            .is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid() {
        let conn = start_db(None).await.expect("db");

        let reserved = sample_category("contact", 0);
        assert!(matches!(
            create_category(&conn, reserved).await,
            Err(ShowroomError::ValidationError(_))
        ));

        let mut bad_color = sample_category("colors", 0);
        bad_color.active_color = "green".to_string();
        assert!(matches!(
            create_category(&conn, bad_color).await,
            Err(ShowroomError::ValidationError(_))
        ));

        create_category(&conn, sample_category("dupe", 0))
            .await
            .expect("first");
        assert!(matches!(
            create_category(&conn, sample_category("dupe", 1)).await,
            Err(ShowroomError::ValidationError(_))
        ));

        assert!(list_categories(&conn).await.expect("list").len() == 1);
    }
}
