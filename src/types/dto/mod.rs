// DTO layer - request/response models for the HTTP API
pub mod auth;
pub mod common;
