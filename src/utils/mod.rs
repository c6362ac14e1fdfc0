// src/utils/mod.rs

pub mod body;
pub mod gate;
pub mod hash;
pub mod html;
