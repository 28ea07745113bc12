pub mod app;
pub mod auth;
pub mod billing;
pub mod config;
pub mod db;
pub mod error;
pub mod keys;
pub mod models;
pub mod repos;
pub mod schema;
pub mod web;
