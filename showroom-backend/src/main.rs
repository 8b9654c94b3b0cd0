use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use showroom_backend::category::{self, NewCategory};
use showroom_backend::cli::{CliOpts, Command};
use showroom_backend::edition::{self, NewEdition};
use showroom_backend::entity::{
    category as category_entity, edition as edition_entity, website as website_entity,
};
use showroom_backend::website::{
    self, NewWebsite, SavedWebsite, ScreenshotUpload, WebsiteChanges,
};
use showroom_backend::AppState;
use showroom_shared::{AssetPath, ShowroomError};
use tracing::{error, info, warn};

#[derive(Serialize)]
struct CategoryListing {
    #[serde(flatten)]
    category: category_entity::Model,
    websites: Vec<website_entity::Model>,
}

#[derive(Serialize)]
struct Listing {
    editions: Vec<edition_entity::Model>,
    categories: Vec<CategoryListing>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ShowroomError> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|err| ShowroomError::Other(format!("failed to serialize output: {err}")))?;
    println!("{output}");
    Ok(())
}

async fn read_upload(path: &Path) -> Result<ScreenshotUpload, ShowroomError> {
    let data = tokio::fs::read(path).await.inspect_err(|err| {
        error!("Failed to read screenshot {}: {:?}", path.display(), err)
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(ScreenshotUpload { filename, data })
}

fn report(saved: &SavedWebsite) -> Result<(), ShowroomError> {
    match &saved.thumbnail {
        Ok(thumbnail) => info!(
            "Screenshot {} is {}x{}",
            saved.website.screenshot, thumbnail.width, thumbnail.height
        ),
        Err(err) => warn!(
            "Saved website {} but its screenshot was not processed: {}",
            saved.website.id, err
        ),
    }
    if let Some(orphan) = &saved.orphaned {
        warn!("Previous screenshot {} is no longer referenced", orphan);
    }
    print_json(&saved.website)
}

async fn run(cli: CliOpts, state: &AppState) -> Result<(), ShowroomError> {
    let db_path = cli.db_path();
    match cli.command {
        Command::Migrate => info!("Database at {} is up to date", db_path.display()),
        Command::AddCategory {
            name,
            url_name,
            order,
            color,
            active_color,
        } => {
            let created = category::create_category(
                &state.conn,
                NewCategory {
                    name,
                    url_name,
                    order,
                    color,
                    active_color,
                },
            )
            .await?;
            print_json(&created)?;
        }
        Command::AddEdition { file } => {
            let contents = tokio::fs::read_to_string(&file).await?;
            let new: NewEdition = serde_json::from_str(&contents).map_err(|err| {
                ShowroomError::ValidationError(format!("{}: {err}", file.display()))
            })?;
            print_json(&edition::create_edition(&state.conn, new).await?)?;
        }
        Command::AddWebsite {
            title,
            category: url_name,
            url,
            screenshot,
            country,
            order,
            desc,
        } => {
            let category = category::find_by_url_name(&state.conn, &url_name)
                .await?
                .ok_or_else(|| ShowroomError::NotFound(format!("category {url_name}")))?;
            let upload = read_upload(&screenshot).await?;
            let new = NewWebsite {
                title,
                category_id: category.id,
                url,
                country,
                order,
                desc,
            };
            report(&website::create_website(state, new, upload).await?)?;
        }
        Command::ReplaceScreenshot { id, screenshot } => {
            let upload = read_upload(&screenshot).await?;
            let saved =
                website::update_website(state, id, WebsiteChanges::default(), Some(upload))
                    .await?;
            report(&saved)?;
        }
        Command::DeleteWebsite { id } => match website::delete_website(state, id).await? {
            true => info!("Deleted website {}", id),
            false => info!("Website {} did not exist", id),
        },
        Command::DeleteCategory { url_name } => {
            let category = category::find_by_url_name(&state.conn, &url_name)
                .await?
                .ok_or_else(|| ShowroomError::NotFound(format!("category {url_name}")))?;
            category::delete_category(state, category.id).await?;
            info!("Deleted category {}", url_name);
        }
        Command::List => {
            let mut categories = Vec::new();
            for category in category::list_categories(&state.conn).await? {
                let websites = website::list_websites(state, Some(category.id)).await?;
                categories.push(CategoryListing { category, websites });
            }
            print_json(&Listing {
                editions: edition::list_editions(&state.conn).await?,
                categories,
            })?;
        }
        Command::Thumbnail { path } => {
            let path: AssetPath = path.parse()?;
            let thumbnail = state.pipeline.process_thumbnail(&path).await?;
            info!(
                "{} is {}x{} (was {}x{})",
                path,
                thumbnail.width,
                thumbnail.height,
                thumbnail.original_width,
                thumbnail.original_height
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliOpts::parse();
    showroom_backend::logging::init(cli.debug);

    let appstate = match AppState::new(&cli).await {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to initialize application state: {:?}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &appstate).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
