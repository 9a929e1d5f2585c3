// src/lib.rs

//! vacancy-scout: hh.ru vacancy search, salary ranking and local storage.

pub mod console;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
