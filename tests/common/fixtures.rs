use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use courtside_backend::models::matches::{Match, MatchDetails, Participant};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 18, 0, 0).unwrap()
}

pub fn participant(name: &str) -> Participant {
    Participant {
        id: Uuid::new_v4(),
        name: name.to_string(),
        photo_url: None,
    }
}

/// A match between `team_a` (slots 1-2) and `team_b` (slots 3-4).
pub fn match_between(
    team_a: [&Participant; 2],
    team_b: [Option<&Participant>; 2],
    played_at: DateTime<Utc>,
    games: Option<(i32, i32)>,
) -> MatchDetails {
    MatchDetails {
        record: Match {
            id: Uuid::new_v4(),
            played_at,
            location: Some("Arena Central".into()),
            player1_id: team_a[0].id,
            player2_id: team_a[1].id,
            player3_id: team_b[0].map(|p| p.id),
            player4_id: team_b[1].map(|p| p.id),
            games_a: games.map(|g| g.0),
            games_b: games.map(|g| g.1),
            tiebreak_a: None,
            tiebreak_b: None,
            super_tiebreak_a: None,
            super_tiebreak_b: None,
            tournament_id: None,
            created_at: played_at,
            updated_at: played_at,
        },
        participants: [
            Some(team_a[0].clone()),
            Some(team_a[1].clone()),
            team_b[0].cloned(),
            team_b[1].cloned(),
        ],
    }
}

pub fn four_players() -> (Participant, Participant, Participant, Participant) {
    (
        participant("Ana"),
        participant("Bia"),
        participant("Carla"),
        participant("Duda"),
    )
}

/// Doubles match with both teams filled.
pub fn doubles(
    team_a: [&Participant; 2],
    team_b: [&Participant; 2],
    played_at: DateTime<Utc>,
    games: Option<(i32, i32)>,
) -> MatchDetails {
    match_between(team_a, [Some(team_b[0]), Some(team_b[1])], played_at, games)
}
