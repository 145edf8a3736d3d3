//! Chirpy 认证核心
//! 密码哈希、无状态访问令牌与可撤销的刷新令牌

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
