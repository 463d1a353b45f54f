//! API resource trees and dashboard endpoint discovery

pub mod discoverer;
pub mod patterns;
pub mod resource;

pub use discoverer::{
    discover_all_endpoints, flatten, DiscoveredEndpoint, EndpointCategory, EndpointDiscoverer,
};
pub use patterns::icon_for;
pub use resource::{ApiOperation, ApiResource, OperationType};
