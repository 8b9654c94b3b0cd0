use std::collections::HashSet;
use std::io::Cursor;
use std::sync::{Arc, Once};
use std::time::Duration;

use image::{AnimationDecoder, ImageFormat};
use sea_orm::EntityTrait;
use showroom_shared::ShowroomError;
use tempfile::TempDir;
use tokio::task::JoinSet;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::asset::thumbnail::tests::sample_image;
use crate::asset::{AssetError, FsMediaStorage, PipelineConfig, ScreenshotPipeline};
use crate::category::tests::sample_category;
use crate::category::{create_category, delete_category};
use crate::edition::tests::sample_edition;
use crate::edition::{add_website_to_edition, create_edition, edition_websites, NewEditionWebsite};
use crate::entity::{category, EditionWebsite, Website};
use crate::website::{
    create_website, delete_website, list_websites, update_website, NewWebsite, ScreenshotUpload,
    WebsiteChanges,
};
use crate::AppState;

static INIT: Once = Once::new();

async fn setup_test_state() -> (AppState, TempDir) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                "showroom_backend=debug,showroom_shared=debug",
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
    let media = tempfile::tempdir().expect("media dir");
    (AppState::test(media.path()).await, media)
}

async fn some_category(state: &AppState, url_name: &str, order: i32) -> category::Model {
    create_category(&state.conn, sample_category(url_name, order))
        .await
        .expect("category")
}

fn new_website(title: &str, category: &category::Model) -> NewWebsite {
    NewWebsite {
        title: title.to_string(),
        category_id: category.id,
        url: format!("https://{}.example.com", title.to_lowercase()),
        country: Some("de".to_string()),
        order: 0,
        desc: String::new(),
    }
}

fn upload(filename: &str, data: Vec<u8>) -> ScreenshotUpload {
    ScreenshotUpload {
        filename: filename.to_string(),
        data,
    }
}

/// Files currently stored under the screenshot namespace.
fn stored_files(media: &TempDir) -> Vec<String> {
    let dir = media.path().join("screenshots");
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_website_screenshot_lifecycle() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "design", 100).await;

    let saved = create_website(
        &state,
        new_website("Holiday", &category),
        upload("holiday.JPG", sample_image(1200, 800, ImageFormat::Jpeg)),
    )
    .await
    .expect("create");
    info!("Saved {:?}", saved.website);

    let path = saved.website.screenshot.clone();
    assert!(path.as_str().starts_with("screenshots/s_"));
    assert!(path.as_str().ends_with(".JPG"));
    let thumbnail = saved.thumbnail.expect("processed");
    assert_eq!((thumbnail.width, thumbnail.height), (300, 200));
    assert!(saved.orphaned.is_none());

    let stored = std::fs::read(media.path().join(path.as_str())).expect("stored file");
    assert_eq!(image::guess_format(&stored).expect("format"), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&stored).expect("decode");
    assert_eq!((decoded.width(), decoded.height()), (300, 200));

    assert!(delete_website(&state, saved.website.id).await.expect("delete"));
    assert!(!media.path().join(path.as_str()).exists());
    assert!(Website::find_by_id(saved.website.id)
        .one(&state.conn)
        .await
        .expect("query")
        .is_none());

    // deleting again is a no-op
    assert!(!delete_website(&state, saved.website.id).await.expect("delete"));
}

#[tokio::test]
async fn test_corrupt_upload_is_kept_with_warning() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "tools", 0).await;
    let mut corrupt = sample_image(400, 300, ImageFormat::Jpeg);
    corrupt.truncate(64);

    let saved = create_website(
        &state,
        new_website("Broken", &category),
        upload("broken.jpg", corrupt.clone()),
    )
    .await
    .expect("record is saved regardless");

    assert!(matches!(saved.warning(), Some(AssetError::Decode(_))));
    let stored = std::fs::read(media.path().join(saved.website.screenshot.as_str()))
        .expect("stored file");
    assert_eq!(stored, corrupt);
}

#[tokio::test]
async fn test_small_upload_stored_byte_for_byte() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "blogs", 0).await;
    let original = sample_image(120, 80, ImageFormat::Png);

    let saved = create_website(
        &state,
        new_website("Tiny", &category),
        upload("tiny.png", original.clone()),
    )
    .await
    .expect("create");

    let thumbnail = saved.thumbnail.expect("processed");
    assert!(!thumbnail.resized());
    let stored = std::fs::read(media.path().join(saved.website.screenshot.as_str()))
        .expect("stored file");
    assert_eq!(stored, original);
}

#[tokio::test]
async fn test_rejected_uploads_leave_nothing_behind() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "news", 0).await;

    let res = create_website(
        &state,
        new_website("Readme", &category),
        upload("README", sample_image(10, 10, ImageFormat::Png)),
    )
    .await;
    assert!(matches!(res, Err(ShowroomError::AssetPath(_))));

    let mut invalid = new_website("Invalid", &category);
    invalid.country = Some("Germany".to_string());
    let res = create_website(
        &state,
        invalid,
        upload("invalid.png", sample_image(10, 10, ImageFormat::Png)),
    )
    .await;
    assert!(matches!(res, Err(ShowroomError::ValidationError(_))));

    let mut orphan = new_website("Orphan", &category);
    orphan.category_id = uuid::Uuid::new_v4();
    let res = create_website(
        &state,
        orphan,
        upload("orphan.png", sample_image(10, 10, ImageFormat::Png)),
    )
    .await;
    assert!(matches!(res, Err(ShowroomError::NotFound(_))));

    assert!(stored_files(&media).is_empty());
    assert!(Website::find()
        .all(&state.conn)
        .await
        .expect("query")
        .is_empty());
}

#[tokio::test]
async fn test_same_filename_gets_distinct_paths() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "dupes", 0).await;

    let mut paths = Vec::new();
    for title in ["First", "Second"] {
        let saved = create_website(
            &state,
            new_website(title, &category),
            upload("screenshot.png", sample_image(20, 20, ImageFormat::Png)),
        )
        .await
        .expect("create");
        paths.push(saved.website.screenshot);
    }

    assert_ne!(paths[0], paths[1]);
    assert_eq!(stored_files(&media).len(), 2);
}

#[tokio::test]
async fn test_update_without_upload_reprocesses_same_path() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "stable", 0).await;
    let saved = create_website(
        &state,
        new_website("Stable", &category),
        upload("stable.png", sample_image(600, 400, ImageFormat::Png)),
    )
    .await
    .expect("create");
    let processed = std::fs::read(media.path().join(saved.website.screenshot.as_str()))
        .expect("stored file");

    let updated = update_website(
        &state,
        saved.website.id,
        WebsiteChanges {
            title: Some("Renamed".to_string()),
            country: Some(None),
            ..Default::default()
        },
        None,
    )
    .await
    .expect("update");

    assert_eq!(updated.website.title, "Renamed");
    assert!(updated.website.country.is_none());
    assert_eq!(updated.website.screenshot, saved.website.screenshot);
    assert!(updated.orphaned.is_none());
    assert!(!updated.thumbnail.expect("processed").resized());
    let after = std::fs::read(media.path().join(updated.website.screenshot.as_str()))
        .expect("stored file");
    assert_eq!(after, processed);
}

#[tokio::test]
async fn test_replacing_screenshot_uses_new_path() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "swap", 0).await;
    let saved = create_website(
        &state,
        new_website("Swap", &category),
        upload("before.png", sample_image(600, 400, ImageFormat::Png)),
    )
    .await
    .expect("create");
    let before = saved.website.screenshot.clone();

    let updated = update_website(
        &state,
        saved.website.id,
        WebsiteChanges::default(),
        Some(upload("after.gif", sample_image(450, 300, ImageFormat::Gif))),
    )
    .await
    .expect("update");

    assert_ne!(updated.website.screenshot, before);
    assert!(updated.website.screenshot.as_str().ends_with(".gif"));
    assert_eq!(updated.orphaned.as_ref(), Some(&before));
    // the old file is left behind, not deleted
    assert!(media.path().join(before.as_str()).exists());
    assert_eq!(stored_files(&media).len(), 2);

    let res = update_website(
        &state,
        uuid::Uuid::new_v4(),
        WebsiteChanges::default(),
        None,
    )
    .await;
    assert!(matches!(res, Err(ShowroomError::NotFound(_))));
}

#[tokio::test]
async fn test_animated_gif_keeps_first_frame() {
    let (state, media) = setup_test_state().await;
    let category = some_category(&state, "animated", 0).await;

    let mut data = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut data);
        let frames = [[200u8, 0, 0, 255], [0, 0, 200, 255]].map(|pixel| {
            image::Frame::new(image::RgbaImage::from_pixel(450, 300, image::Rgba(pixel)))
        });
        encoder.encode_frames(frames).expect("encode gif");
    }

    let saved = create_website(
        &state,
        new_website("Animated", &category),
        upload("animated.gif", data),
    )
    .await
    .expect("create");
    let thumbnail = saved.thumbnail.expect("processed");
    assert_eq!((thumbnail.width, thumbnail.height), (300, 200));

    let stored = std::fs::read(media.path().join(saved.website.screenshot.as_str()))
        .expect("stored file");
    let decoder =
        image::codecs::gif::GifDecoder::new(Cursor::new(stored)).expect("gif decoder");
    let frames = decoder.into_frames().collect_frames().expect("frames");
    assert_eq!(frames.len(), 1);
    let first = frames[0].buffer().get_pixel(150, 100);
    assert!(first[0] > first[2], "expected the red first frame, got {first:?}");
}

#[tokio::test]
async fn test_processing_timeout_keeps_original() {
    let media = tempfile::tempdir().expect("media dir");
    let storage = FsMediaStorage::new(media.path()).await.expect("storage");
    let pipeline = ScreenshotPipeline::new(
        Arc::new(storage),
        PipelineConfig {
            processing_timeout: Some(Duration::ZERO),
            ..Default::default()
        },
    );

    let original = sample_image(2000, 2000, ImageFormat::Png);
    let path = pipeline.generate_path("huge.png").expect("path");
    pipeline.store_upload(&path, &original).await.expect("store");

    assert!(matches!(
        pipeline.after_save(&path).await,
        Err(AssetError::Timeout(_))
    ));
    assert_eq!(pipeline.storage().read(&path).await.expect("read"), original);
}

#[tokio::test]
async fn test_delete_category_removes_screenshots() {
    let (state, media) = setup_test_state().await;
    let doomed = some_category(&state, "doomed", 0).await;
    let kept = some_category(&state, "kept", 1).await;
    let edition = create_edition(&state.conn, sample_edition("en", 0))
        .await
        .expect("edition");

    let mut doomed_ids = Vec::new();
    for title in ["One", "Two"] {
        let saved = create_website(
            &state,
            new_website(title, &doomed),
            upload("one.png", sample_image(30, 20, ImageFormat::Png)),
        )
        .await
        .expect("create");
        add_website_to_edition(
            &state.conn,
            NewEditionWebsite {
                edition_id: edition.id,
                website_id: saved.website.id,
                title: None,
                desc: String::new(),
                order: 0,
            },
        )
        .await
        .expect("edition entry");
        doomed_ids.push(saved.website.id);
    }
    let survivor = create_website(
        &state,
        new_website("Survivor", &kept),
        upload("survivor.png", sample_image(30, 20, ImageFormat::Png)),
    )
    .await
    .expect("create");
    assert_eq!(stored_files(&media).len(), 3);

    assert!(delete_category(&state, doomed.id).await.expect("delete"));
    assert!(!delete_category(&state, doomed.id).await.expect("delete again"));

    let remaining = Website::find().all(&state.conn).await.expect("query");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor.website.id);
    assert!(EditionWebsite::find()
        .all(&state.conn)
        .await
        .expect("query")
        .is_empty());
    assert_eq!(stored_files(&media).len(), 1);
    assert!(media
        .path()
        .join(survivor.website.screenshot.as_str())
        .exists());
}

#[tokio::test]
async fn test_websites_ordered_by_category_then_order() {
    let (state, _media) = setup_test_state().await;
    let late = some_category(&state, "late", 200).await;
    let early = some_category(&state, "early", 100).await;

    for (title, category, order) in [
        ("LateA", &late, 1),
        ("EarlyB", &early, 2),
        ("EarlyA", &early, 1),
        ("LateB", &late, 2),
    ] {
        let mut new = new_website(title, category);
        new.order = order;
        create_website(
            &state,
            new,
            upload("site.png", sample_image(10, 10, ImageFormat::Png)),
        )
        .await
        .expect("create");
    }

    let titles: Vec<String> = list_websites(&state, None)
        .await
        .expect("list")
        .into_iter()
        .map(|w| w.title)
        .collect();
    assert_eq!(titles, vec!["EarlyA", "EarlyB", "LateA", "LateB"]);

    let early_only = list_websites(&state, Some(early.id)).await.expect("list");
    assert_eq!(early_only.len(), 2);
}

#[tokio::test]
async fn test_edition_website_title_fallback() {
    let (state, _media) = setup_test_state().await;
    let category = some_category(&state, "titles", 0).await;
    let edition = create_edition(&state.conn, sample_edition("de", 0))
        .await
        .expect("edition");

    let mut website_ids = Vec::new();
    for title in ["Generic", "Other"] {
        let saved = create_website(
            &state,
            new_website(title, &category),
            upload("site.png", sample_image(10, 10, ImageFormat::Png)),
        )
        .await
        .expect("create");
        website_ids.push(saved.website.id);
    }

    for (website_id, title, order) in [
        (website_ids[0], None, 200),
        (website_ids[1], Some("Eigener Titel".to_string()), 100),
    ] {
        add_website_to_edition(
            &state.conn,
            NewEditionWebsite {
                edition_id: edition.id,
                website_id,
                title,
                desc: String::new(),
                order,
            },
        )
        .await
        .expect("edition entry");
    }

    let titles: Vec<String> = edition_websites(&state.conn, edition.id)
        .await
        .expect("listing")
        .into_iter()
        .map(|listing| listing.title)
        .collect();
    assert_eq!(titles, vec!["Eigener Titel", "Generic"]);

    let res = add_website_to_edition(
        &state.conn,
        NewEditionWebsite {
            edition_id: uuid::Uuid::new_v4(),
            website_id: website_ids[0],
            title: None,
            desc: String::new(),
            order: 0,
        },
    )
    .await;
    assert!(matches!(res, Err(ShowroomError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_and_deletes() {
    let (state, media) = setup_test_state().await;
    let state = Arc::new(state);
    let category = some_category(&state, "busy", 0).await;
    let image = sample_image(600, 400, ImageFormat::Png);

    let mut doomed = Vec::new();
    for n in 0..4 {
        let saved = create_website(
            &state,
            new_website(&format!("Doomed{n}"), &category),
            upload("doomed.png", image.clone()),
        )
        .await
        .expect("create");
        doomed.push(saved.website);
    }

    let mut creates = JoinSet::new();
    for n in 0..6 {
        let state = state.clone();
        let new = new_website(&format!("Fresh{n}"), &category);
        let data = image.clone();
        creates.spawn(async move {
            create_website(&state, new, upload("fresh.png", data))
                .await
                .expect("create")
        });
    }
    let mut deletes = JoinSet::new();
    for website in &doomed {
        let state = state.clone();
        let id = website.id;
        deletes.spawn(async move { delete_website(&state, id).await.expect("delete") });
    }

    let mut created = Vec::new();
    while let Some(joined) = creates.join_next().await {
        created.push(joined.expect("create task"));
    }
    while let Some(joined) = deletes.join_next().await {
        assert!(joined.expect("delete task"));
    }

    let all_paths: HashSet<String> = created
        .iter()
        .map(|saved| saved.website.screenshot.to_string())
        .chain(doomed.iter().map(|website| website.screenshot.to_string()))
        .collect();
    assert_eq!(all_paths.len(), 10);

    for saved in &created {
        let stored = std::fs::read(media.path().join(saved.website.screenshot.as_str()))
            .expect("stored file");
        let decoded = image::load_from_memory(&stored).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (300, 200));
    }
    for website in &doomed {
        assert!(!media.path().join(website.screenshot.as_str()).exists());
    }
    assert_eq!(stored_files(&media).len(), 6);
    assert_eq!(
        Website::find().all(&state.conn).await.expect("query").len(),
        6
    );
    let leftovers = std::fs::read_dir(media.path().join(".tmp"))
        .expect("temp dir")
        .count();
    assert_eq!(leftovers, 0);
}
