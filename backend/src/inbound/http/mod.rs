//! HTTP inbound adapter exposing REST endpoints.

pub mod articles;
pub mod auth;
pub mod dto;
pub mod error;
pub mod events;
pub mod gateway;
pub mod gifts;
pub mod health;
pub mod profile;
pub mod regions;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod validation;

pub use error::ApiResult;
