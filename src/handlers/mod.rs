// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod feed;
pub mod quiz;
pub mod settings;
