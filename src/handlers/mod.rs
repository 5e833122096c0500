pub mod auth;
pub mod goals;
pub mod health;
pub mod insights;
pub mod moods;
pub mod profile;
pub mod sessions;
