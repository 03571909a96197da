pub mod auth;
pub mod friends;
pub mod health;
pub mod leaderboard;
pub mod players;
pub mod profile;
pub mod routes;
pub mod sessions;
