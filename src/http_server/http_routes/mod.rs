pub mod health;
pub mod playlists;
pub mod search;
pub mod video;
