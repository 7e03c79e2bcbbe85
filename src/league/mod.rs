pub mod head_to_head;
pub mod validation;

pub use head_to_head::{HeadToHeadEntry, HeadToHeadFinder, TeamPairing};
pub use validation::{ScoreInput, ScoreValidationError, ScoreValidator};
