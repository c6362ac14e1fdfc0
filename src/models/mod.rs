// src/models/mod.rs

pub mod feed;
pub mod lenient;
pub mod quiz;
pub mod settings;
pub mod user;
