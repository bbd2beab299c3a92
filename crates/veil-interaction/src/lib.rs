//! Remote service access for the Veil client.

mod dto;
pub mod http_gateway;

pub use http_gateway::HttpGateway;
