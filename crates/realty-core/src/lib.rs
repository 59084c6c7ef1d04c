pub mod chiller;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use chiller::{
    BuildingEstimate, ChillerComparison, ChillerEstimate, ChillerRate, CostWarning, RateTable,
};
pub use config::{GatewayConfig, UpstreamConfig};
pub use error::Error;
pub use types::{ListingQuery, ListingResults, ToolResponse};
