// src/models/mod.rs

pub mod attempt;
pub mod quiz;
pub mod role;
pub mod student;
