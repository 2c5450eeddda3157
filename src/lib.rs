pub mod app;
pub mod auth;
pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod extension;
pub mod mail;
pub mod state;
pub mod storage;
pub mod uploads;
