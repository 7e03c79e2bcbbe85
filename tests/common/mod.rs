#![allow(dead_code)]

pub mod avatar_server;
pub mod fixtures;
pub mod memory_repository;
pub mod utils;
