pub mod athlete_queries;
pub mod helpers;
pub mod match_queries;
pub mod repository;
pub mod user_queries;

pub use athlete_queries::AthleteQueries;
pub use match_queries::MatchQueries;
pub use repository::MatchRepository;
pub use user_queries::UserQueries;
