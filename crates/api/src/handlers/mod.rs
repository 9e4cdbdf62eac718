pub mod admin;
pub mod auth;
pub mod categories;
pub mod images;
pub mod items;
pub mod swaps;
