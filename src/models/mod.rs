pub mod athlete;
pub mod common;
pub mod matches;
pub mod user;
