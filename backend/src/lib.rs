//! FitForm backend library
//!
//! Persistence for users, video uploads and their analysis, body
//! measurements and nutrition requirements, plus the pose-classifier
//! model loader.

pub mod auth;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod services;
pub mod storage;
