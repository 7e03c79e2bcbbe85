pub mod card;
pub mod jwt;
pub mod settings;
