use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted match. Team A is `player1`/`player2`, team B is `player3`/`player4`.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub location: Option<String>,
    pub player1_id: Uuid,
    pub player2_id: Uuid,
    pub player3_id: Option<Uuid>,
    pub player4_id: Option<Uuid>,
    pub games_a: Option<i32>,
    pub games_b: Option<i32>,
    pub tiebreak_a: Option<i32>,
    pub tiebreak_b: Option<i32>,
    pub super_tiebreak_a: Option<i32>,
    pub super_tiebreak_b: Option<i32>,
    pub tournament_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn player_slots(&self) -> [Option<Uuid>; 4] {
        [
            Some(self.player1_id),
            Some(self.player2_id),
            self.player3_id,
            self.player4_id,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}

/// A match together with the athletes sitting in its four slots.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MatchDetails {
    #[serde(flatten)]
    pub record: Match,
    pub participants: [Option<Participant>; 4],
}

impl MatchDetails {
    pub fn participant_name(&self, slot: usize) -> Option<&str> {
        self.participants
            .get(slot)
            .and_then(|p| p.as_ref())
            .map(|p| p.name.as_str())
    }

    pub fn photo_url(&self, slot: usize) -> Option<&str> {
        self.participants
            .get(slot)
            .and_then(|p| p.as_ref())
            .and_then(|p| p.photo_url.as_deref())
    }
}

/// Flat row produced by the match/athlete join.
#[derive(Debug, FromRow)]
pub struct MatchDetailsRow {
    #[sqlx(flatten)]
    pub record: Match,
    pub player1_name: Option<String>,
    pub player1_photo_url: Option<String>,
    pub player2_name: Option<String>,
    pub player2_photo_url: Option<String>,
    pub player3_name: Option<String>,
    pub player3_photo_url: Option<String>,
    pub player4_name: Option<String>,
    pub player4_photo_url: Option<String>,
}

impl From<MatchDetailsRow> for MatchDetails {
    fn from(row: MatchDetailsRow) -> Self {
        let slots = row.record.player_slots();
        let joined = [
            (row.player1_name, row.player1_photo_url),
            (row.player2_name, row.player2_photo_url),
            (row.player3_name, row.player3_photo_url),
            (row.player4_name, row.player4_photo_url),
        ];

        let mut participants: [Option<Participant>; 4] = Default::default();
        for (i, (slot, (name, photo_url))) in slots.iter().zip(joined).enumerate() {
            participants[i] = match (slot, name) {
                (Some(id), Some(name)) => Some(Participant { id: *id, name, photo_url }),
                _ => None,
            };
        }

        Self { record: row.record, participants }
    }
}

/// A validated, normalized set score ready to be written.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub games_a: i32,
    pub games_b: i32,
    pub tiebreak_a: Option<i32>,
    pub tiebreak_b: Option<i32>,
}

/// Raw score body. Each field may be a number, a numeric string, `""`, `null`
/// or absent; interpretation happens in the score validator.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreUpdateRequest {
    #[serde(default, alias = "gamesA")]
    pub games_a: Option<Value>,
    #[serde(default, alias = "gamesB")]
    pub games_b: Option<Value>,
    #[serde(default, alias = "tiebreakA")]
    pub tiebreak_a: Option<Value>,
    #[serde(default, alias = "tiebreakB")]
    pub tiebreak_b: Option<Value>,
    #[serde(default, alias = "superTiebreakA")]
    pub super_tiebreak_a: Option<Value>,
    #[serde(default, alias = "superTiebreakB")]
    pub super_tiebreak_b: Option<Value>,
}

impl ScoreUpdateRequest {
    /// True when no score field carries a value.
    pub fn is_blank(&self) -> bool {
        [
            &self.games_a,
            &self.games_b,
            &self.tiebreak_a,
            &self.tiebreak_b,
            &self.super_tiebreak_a,
            &self.super_tiebreak_b,
        ]
        .iter()
        .all(|v| match v {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub played_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    pub player1_id: Option<Uuid>,
    pub player2_id: Option<Uuid>,
    #[serde(default)]
    pub player3_id: Option<Uuid>,
    #[serde(default)]
    pub player4_id: Option<Uuid>,
    #[serde(default)]
    pub tournament_id: Option<Uuid>,
    #[serde(flatten)]
    pub score: ScoreUpdateRequest,
}

/// Insert payload built once the request has been checked.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub played_at: DateTime<Utc>,
    pub location: Option<String>,
    pub player1_id: Uuid,
    pub player2_id: Uuid,
    pub player3_id: Option<Uuid>,
    pub player4_id: Option<Uuid>,
    pub tournament_id: Option<Uuid>,
    pub score: Option<MatchScore>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn score_request_accepts_camel_case_aliases() {
        let request: ScoreUpdateRequest = serde_json::from_value(json!({
            "gamesA": 7,
            "gamesB": "6",
            "tiebreakA": 10,
            "tiebreakB": null
        }))
        .unwrap();
        assert_eq!(request.games_a, Some(json!(7)));
        assert_eq!(request.games_b, Some(json!("6")));
        assert!(request.tiebreak_b.is_none());
        assert!(!request.is_blank());
    }

    #[test]
    fn blank_score_request() {
        let request: ScoreUpdateRequest = serde_json::from_value(json!({
            "games_a": "",
            "tiebreak_a": null
        }))
        .unwrap();
        assert!(request.is_blank());
    }
}
