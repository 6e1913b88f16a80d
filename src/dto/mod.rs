//! DTO modules that bridge services with the rendering layer.

pub mod alert;
pub mod dashboard;
pub mod housing;
pub mod mutation;
pub mod reports;
pub mod riders;
pub mod shifts;
pub mod spare_parts;
pub mod vehicles;
