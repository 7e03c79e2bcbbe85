use std::time::{Duration, Instant};

use uuid::Uuid;

use courtside_backend::card::{AvatarFetcher, CardError, CardRenderer, CARD_HEIGHT, CARD_WIDTH};
use courtside_backend::config::card::CardSettings;
use courtside_backend::db::repository::MatchRepository;

mod common;
use common::avatar_server::{spawn_avatar_server, SLOW_AVATAR_DELAY};
use common::fixtures::{at, match_between, participant};
use common::memory_repository::InMemoryMatchRepository;

/// The avatar test server listens on loopback.
fn local_settings() -> CardSettings {
    CardSettings {
        avatar_allow_private_hosts: true,
        ..CardSettings::default()
    }
}

fn renderer() -> CardRenderer {
    CardRenderer::new(&local_settings()).expect("Failed to build renderer")
}

/// A doubles match with one prior meeting; slot 1 gets `photo_url`.
fn doubles_with_history(photo_url: Option<String>) -> (Uuid, InMemoryMatchRepository) {
    let mut ana = participant("Ana Souza");
    ana.photo_url = photo_url;
    let bia = participant("Bia Lima");
    let carla = participant("Carla Reis");
    let duda = participant("Duda Alves");

    let current = match_between(
        [&ana, &bia],
        [Some(&carla), Some(&duda)],
        at(2024, 6, 1),
        None,
    );
    let previous = match_between(
        [&carla, &duda],
        [Some(&ana), Some(&bia)],
        at(2024, 3, 10),
        Some((7, 5)),
    );
    (current.record.id, InMemoryMatchRepository::new(vec![current, previous]))
}

#[tokio::test]
async fn unknown_match_is_not_found_and_loads_nothing() {
    let settings = CardSettings {
        assets_dir: "/nonexistent/card-assets".into(),
        ..CardSettings::default()
    };
    let renderer = CardRenderer::new(&settings).unwrap();
    let repository = InMemoryMatchRepository::default();
    let id = Uuid::new_v4();

    let result = renderer.render(&repository, id).await;

    assert!(matches!(result, Err(CardError::NotFound(missing)) if missing == id));
    assert!(!renderer.assets().is_loaded());
}

#[tokio::test]
async fn renders_a_full_size_png() {
    let (id, repository) = doubles_with_history(None);
    let card = renderer().render(&repository, id).await.expect("render failed");

    assert_eq!(card.content_type, "image/png");
    let image = image::load_from_memory(&card.bytes).expect("output is not an image");
    assert_eq!((image.width(), image.height()), (CARD_WIDTH, CARD_HEIGHT));
}

#[tokio::test]
async fn rendering_is_deterministic() {
    let (id, repository) = doubles_with_history(None);
    let renderer = renderer();

    let first = renderer.render(&repository, id).await.unwrap();
    let second = renderer.render(&repository, id).await.unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[tokio::test]
async fn render_looks_the_match_up_once() {
    let (id, repository) = doubles_with_history(None);

    renderer().render(&repository, id).await.unwrap();
    assert_eq!(repository.id_lookups(), 1);
}

#[tokio::test]
async fn html_avatar_falls_back_to_default() {
    let base = spawn_avatar_server();
    let renderer = renderer();

    let (plain_id, plain_repo) = doubles_with_history(None);
    let (html_id, html_repo) = doubles_with_history(Some(format!("{}/profile.html", base)));
    let (missing_id, missing_repo) = doubles_with_history(Some(format!("{}/missing.png", base)));

    let plain = renderer.render(&plain_repo, plain_id).await.unwrap();
    let html = renderer.render(&html_repo, html_id).await.unwrap();
    let missing = renderer.render(&missing_repo, missing_id).await.unwrap();

    assert_eq!(plain.bytes, html.bytes);
    assert_eq!(plain.bytes, missing.bytes);
}

#[tokio::test]
async fn valid_avatar_changes_the_card() {
    let base = spawn_avatar_server();
    let renderer = renderer();

    let (plain_id, plain_repo) = doubles_with_history(None);
    let (photo_id, photo_repo) = doubles_with_history(Some(format!("{}/avatar.png", base)));

    let plain = renderer.render(&plain_repo, plain_id).await.unwrap();
    let photo = renderer.render(&photo_repo, photo_id).await.unwrap();
    assert_ne!(plain.bytes, photo.bytes);
}

#[tokio::test]
async fn loopback_avatar_is_refused_by_default() {
    let base = spawn_avatar_server();
    let renderer = CardRenderer::new(&CardSettings::default()).unwrap();

    let (plain_id, plain_repo) = doubles_with_history(None);
    let (photo_id, photo_repo) = doubles_with_history(Some(format!("{}/avatar.png", base)));

    let plain = renderer.render(&plain_repo, plain_id).await.unwrap();
    let photo = renderer.render(&photo_repo, photo_id).await.unwrap();
    assert_eq!(plain.bytes, photo.bytes);
}

#[tokio::test]
async fn oversized_avatar_falls_back_to_default() {
    let base = spawn_avatar_server();
    let settings = CardSettings {
        avatar_max_bytes: 16,
        ..local_settings()
    };
    let renderer = CardRenderer::new(&settings).unwrap();

    let (plain_id, plain_repo) = doubles_with_history(None);
    let (photo_id, photo_repo) = doubles_with_history(Some(format!("{}/avatar.png", base)));

    let plain = renderer.render(&plain_repo, plain_id).await.unwrap();
    let photo = renderer.render(&photo_repo, photo_id).await.unwrap();
    assert_eq!(plain.bytes, photo.bytes);
}

#[tokio::test]
async fn over_dimension_avatar_falls_back_to_default() {
    let base = spawn_avatar_server();
    let renderer = renderer();

    let (plain_id, plain_repo) = doubles_with_history(None);
    let (wide_id, wide_repo) = doubles_with_history(Some(format!("{}/wide.png", base)));

    let plain = renderer.render(&plain_repo, plain_id).await.unwrap();
    let wide = renderer.render(&wide_repo, wide_id).await.unwrap();
    assert_eq!(plain.bytes, wide.bytes);
}

#[tokio::test]
async fn hanging_avatar_times_out_to_default() {
    let base = spawn_avatar_server();
    let settings = CardSettings {
        avatar_timeout_secs: 1,
        ..local_settings()
    };
    let renderer = CardRenderer::new(&settings).unwrap();

    let (plain_id, plain_repo) = doubles_with_history(None);
    let (hang_id, hang_repo) = doubles_with_history(Some(format!("{}/hang", base)));

    let plain = renderer.render(&plain_repo, plain_id).await.unwrap();
    let started = Instant::now();
    let hung = renderer.render(&hang_repo, hang_id).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(plain.bytes, hung.bytes);
}

#[tokio::test]
async fn avatars_are_fetched_concurrently_within_one_timeout() {
    let base = spawn_avatar_server();
    let fetcher = AvatarFetcher::new(Duration::from_secs(2), 5 * 1024 * 1024, true).unwrap();
    let slow = format!("{}/slow.png", base);
    let hang = format!("{}/hang", base);
    let (slow, hang) = (Some(slow.as_str()), Some(hang.as_str()));

    let started = Instant::now();
    let avatars = fetcher.fetch_all([slow, slow, slow, hang]).await;
    let elapsed = started.elapsed();

    let present: Vec<bool> = avatars.iter().map(Option::is_some).collect();
    assert_eq!(present, [true, true, true, false]);
    assert!(elapsed >= Duration::from_millis(1900), "{elapsed:?}");
    assert!(elapsed < SLOW_AVATAR_DELAY * 3 + Duration::from_millis(500), "{elapsed:?}");
}

#[tokio::test]
async fn failing_history_lookup_still_renders() {
    let (id, repository) = doubles_with_history(None);
    let current = repository.find_match_by_id(id).await.unwrap().unwrap();
    let failing = InMemoryMatchRepository::failing_history(vec![current]);

    let card = renderer().render(&failing, id).await.expect("render failed");
    assert!(!card.bytes.is_empty());
}
