pub mod admin;
pub mod custom;
pub mod health;
pub mod media;
pub mod order;
pub mod product;
pub mod profile;
