mod chiller;
mod health;
mod listings;
mod title;

pub use chiller::{calculate_chiller_cost, compare_chiller_costs, list_providers};
pub use health::{health, list_tools, not_found};
pub use listings::search_listings;
pub use title::verify_title;
