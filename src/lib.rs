//! Fleet back-office client: typed access to the fleet management API plus
//! the fetch, filter and submit flows behind each back-office page.

pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod resource;
pub mod search;
pub mod services;
pub mod session;
pub mod stats;
