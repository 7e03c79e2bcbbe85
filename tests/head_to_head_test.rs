use uuid::Uuid;

use courtside_backend::league::head_to_head::{HeadToHeadFinder, DEFAULT_HEAD_TO_HEAD_LIMIT};

mod common;
use common::fixtures::{at, doubles, four_players, match_between, participant};
use common::memory_repository::InMemoryMatchRepository;

#[tokio::test]
async fn no_history_returns_empty() {
    let (ana, bia, carla, duda) = four_players();
    let current = doubles([&ana, &bia], [&carla, &duda], at(2024, 6, 1), None);
    let id = current.record.id;
    let repository = InMemoryMatchRepository::new(vec![current]);

    let entries = HeadToHeadFinder::new(&repository)
        .find(id, DEFAULT_HEAD_TO_HEAD_LIMIT)
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn unknown_match_returns_empty() {
    let repository = InMemoryMatchRepository::default();
    let entries = HeadToHeadFinder::new(&repository)
        .find(Uuid::new_v4(), 3)
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn swapped_and_reordered_teams_count_as_the_same_pairing() {
    let (ana, bia, carla, duda) = four_players();
    let current = doubles([&ana, &bia], [&carla, &duda], at(2024, 6, 1), None);
    let id = current.record.id;

    let swapped = doubles([&duda, &carla], [&bia, &ana], at(2024, 5, 1), Some((6, 2)));
    let same = doubles([&bia, &ana], [&carla, &duda], at(2024, 4, 1), Some((7, 5)));
    let later = doubles([&ana, &bia], [&carla, &duda], at(2024, 7, 1), Some((6, 0)));
    let other_team = doubles([&ana, &carla], [&bia, &duda], at(2024, 3, 1), Some((6, 4)));

    let repository = InMemoryMatchRepository::new(vec![current, swapped, same, later, other_team]);
    let entries = HeadToHeadFinder::new(&repository).find(id, 5).await.unwrap();

    let lines: Vec<String> = entries.iter().map(|e| e.display_line()).collect();
    assert_eq!(
        lines,
        vec![
            "Duda/Carla 6x2 Bia/Ana - 01/05/2024".to_string(),
            "Bia/Ana 7x5 Carla/Duda - 01/04/2024".to_string(),
        ]
    );
}

#[tokio::test]
async fn limit_keeps_the_most_recent() {
    let (ana, bia, carla, duda) = four_players();
    let current = doubles([&ana, &bia], [&carla, &duda], at(2024, 12, 1), None);
    let id = current.record.id;

    let mut all = vec![current];
    for month in 1..=6 {
        all.push(doubles([&ana, &bia], [&carla, &duda], at(2024, month, 10), Some((6, 3))));
    }
    let repository = InMemoryMatchRepository::new(all);

    let entries = HeadToHeadFinder::new(&repository).find(id, 3).await.unwrap();
    let months: Vec<String> = entries
        .iter()
        .map(|e| e.played_at.format("%m").to_string())
        .collect();
    assert_eq!(months, vec!["06", "05", "04"]);
}

#[tokio::test]
async fn singles_without_opponents_tolerate_null_slots() {
    let (ana, bia, carla) = (participant("Ana"), participant("Bia"), participant("Carla"));
    let current = match_between([&ana, &bia], [None, None], at(2024, 6, 1), None);
    let id = current.record.id;
    let earlier = match_between([&bia, &ana], [None, None], at(2024, 2, 1), Some((6, 1)));
    let with_opponent =
        match_between([&ana, &bia], [Some(&carla), None], at(2024, 3, 1), Some((6, 1)));

    let repository = InMemoryMatchRepository::new(vec![current, earlier, with_opponent]);
    let entries = HeadToHeadFinder::new(&repository).find(id, 5).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_line(), "Bia/Ana 6x1 — - 01/02/2024");
}

#[tokio::test]
async fn preloaded_base_match_skips_the_id_lookup() {
    let (ana, bia, carla, duda) = four_players();
    let current = doubles([&ana, &bia], [&carla, &duda], at(2024, 6, 1), None);
    let earlier = doubles([&carla, &duda], [&ana, &bia], at(2024, 2, 1), Some((6, 4)));
    let repository = InMemoryMatchRepository::new(vec![current.clone(), earlier]);
    let finder = HeadToHeadFinder::new(&repository);

    let preloaded = finder.find_for(&current, 5).await.unwrap();
    assert_eq!(repository.id_lookups(), 0);

    let by_id = finder.find(current.record.id, 5).await.unwrap();
    assert_eq!(repository.id_lookups(), 1);
    assert_eq!(preloaded, by_id);
    assert_eq!(preloaded.len(), 1);
}
