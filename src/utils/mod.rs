// src/utils/mod.rs

pub mod hash;
pub mod identity;
pub mod jwt;
pub mod validate;
