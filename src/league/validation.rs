use serde_json::Value;

use crate::models::matches::{MatchScore, ScoreUpdateRequest};

/// Reasons a proposed set score is refused. Messages are returned to the
/// client verbatim, so each one names the rule that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreValidationError {
    #[error("games_a and games_b are required and must be non-negative integers")]
    GamesRequired,

    #[error("tiebreak_a and tiebreak_b must be provided together")]
    TiebreakIncomplete,

    #[error("tiebreak values must be non-negative integers")]
    TiebreakNotNonNegativeInteger,

    #[error("a 6-6 score is not a valid final score")]
    SixAllNotFinal,

    #[error("super tiebreak is not accepted for this match format")]
    SuperTiebreakNotAllowed,

    #[error("a tiebreak is only valid for a 7-6 score")]
    TiebreakRequiresSevenSix,

    #[error("tiebreak must have ≥7 points and a ≥2 margin")]
    TiebreakInsufficient,

    #[error("a 6 game set must be won by at least 2 games")]
    SixGamesNeedsTwoMargin,

    #[error("a 7 game set without tiebreak must be 7-5")]
    SevenGamesRequiresSevenFive,

    #[error("invalid score")]
    InvalidScore,
}

/// Score fields after type coercion, before any tennis rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInput {
    pub games_a: i32,
    pub games_b: i32,
    pub tiebreak: Option<(i32, i32)>,
    pub super_tiebreak_present: bool,
}

enum Field {
    Blank,
    Value(i32),
    Invalid,
}

fn read_field(value: Option<&Value>) -> Field {
    match value {
        None | Some(Value::Null) => Field::Blank,
        Some(Value::String(s)) if s.trim().is_empty() => Field::Blank,
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(n) => to_non_negative(n),
            Err(_) => Field::Invalid,
        },
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                to_non_negative(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= i32::MAX as f64 => {
                        Field::Value(f as i32)
                    }
                    _ => Field::Invalid,
                }
            }
        }
        Some(_) => Field::Invalid,
    }
}

fn to_non_negative(n: i64) -> Field {
    match i32::try_from(n) {
        Ok(v) if v >= 0 => Field::Value(v),
        _ => Field::Invalid,
    }
}

impl ScoreInput {
    pub fn new(games_a: i32, games_b: i32) -> Self {
        Self {
            games_a,
            games_b,
            tiebreak: None,
            super_tiebreak_present: false,
        }
    }

    pub fn with_tiebreak(mut self, a: i32, b: i32) -> Self {
        self.tiebreak = Some((a, b));
        self
    }

    pub fn with_super_tiebreak(mut self) -> Self {
        self.super_tiebreak_present = true;
        self
    }

    /// Coerces the raw request body. Numbers and numeric strings are accepted;
    /// `""`, `null` and missing fields count as absent.
    pub fn parse(request: &ScoreUpdateRequest) -> Result<Self, ScoreValidationError> {
        let games_a = read_field(request.games_a.as_ref());
        let games_b = read_field(request.games_b.as_ref());
        let (games_a, games_b) = match (games_a, games_b) {
            (Field::Value(a), Field::Value(b)) => (a, b),
            _ => return Err(ScoreValidationError::GamesRequired),
        };

        let tiebreak = match (
            read_field(request.tiebreak_a.as_ref()),
            read_field(request.tiebreak_b.as_ref()),
        ) {
            (Field::Blank, Field::Blank) => None,
            (Field::Invalid, _) | (_, Field::Invalid) => {
                return Err(ScoreValidationError::TiebreakNotNonNegativeInteger)
            }
            (Field::Value(a), Field::Value(b)) => Some((a, b)),
            _ => return Err(ScoreValidationError::TiebreakIncomplete),
        };

        let super_tiebreak_present = [
            request.super_tiebreak_a.as_ref(),
            request.super_tiebreak_b.as_ref(),
        ]
        .into_iter()
        .any(|v| !matches!(read_field(v), Field::Blank));

        Ok(Self {
            games_a,
            games_b,
            tiebreak,
            super_tiebreak_present,
        })
    }
}

/// Completed-set rules for a single set played to 6 with a 7-point tiebreak at 6-6.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreValidator;

impl ScoreValidator {
    pub fn new() -> Self {
        Self
    }

    /// Parses and validates a raw request in one step.
    pub fn validate_request(
        &self,
        request: &ScoreUpdateRequest,
    ) -> Result<MatchScore, ScoreValidationError> {
        let input = ScoreInput::parse(request)?;
        self.validate(&input)
    }

    /// First failing rule wins. On success the tiebreak is kept only for 7-6.
    pub fn validate(&self, input: &ScoreInput) -> Result<MatchScore, ScoreValidationError> {
        let (a, b) = (input.games_a, input.games_b);

        if a == 6 && b == 6 {
            return Err(ScoreValidationError::SixAllNotFinal);
        }
        if input.super_tiebreak_present {
            return Err(ScoreValidationError::SuperTiebreakNotAllowed);
        }

        let winner = a.max(b);
        let loser = a.min(b);
        let diff = winner - loser;

        if let Some((tb_a, tb_b)) = input.tiebreak {
            if (winner, loser) != (7, 6) {
                return Err(ScoreValidationError::TiebreakRequiresSevenSix);
            }
            if tb_a.max(tb_b) < 7 || (tb_a - tb_b).abs() < 2 {
                return Err(ScoreValidationError::TiebreakInsufficient);
            }
            return Ok(MatchScore {
                games_a: a,
                games_b: b,
                tiebreak_a: Some(tb_a),
                tiebreak_b: Some(tb_b),
            });
        }

        match winner {
            6 if diff < 2 => Err(ScoreValidationError::SixGamesNeedsTwoMargin),
            6 => Ok(Self::without_tiebreak(a, b)),
            7 if loser != 5 => Err(ScoreValidationError::SevenGamesRequiresSevenFive),
            7 => Ok(Self::without_tiebreak(a, b)),
            _ => Err(ScoreValidationError::InvalidScore),
        }
    }

    fn without_tiebreak(games_a: i32, games_b: i32) -> MatchScore {
        MatchScore {
            games_a,
            games_b,
            tiebreak_a: None,
            tiebreak_b: None,
        }
    }
}
