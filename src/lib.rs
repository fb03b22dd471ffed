pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod mail;
pub mod meeting_api;
pub mod models;
pub mod storage;
