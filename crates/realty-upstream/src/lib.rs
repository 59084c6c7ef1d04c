mod http;
pub mod listings;
pub mod title_registry;

pub use listings::ListingsClient;
pub use title_registry::TitleRegistryClient;
