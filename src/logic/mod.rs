pub mod allocation;
pub mod calculations;
pub mod economics;
pub mod efficiency;
pub mod factors;
pub mod projections;
pub mod rotation;
pub mod rules;
pub mod seasonality;

pub use allocation::allocate_resources;
pub use economics::{cost_breakdown, return_on_investment, PriceTable};
pub use efficiency::analyze_efficiency;
pub use factors::{score_crops, SuitabilityScorer};
pub use projections::project_usage;
pub use rotation::suggest_rotation;
pub use rules::{AdvisoryContext, AdvisoryEngine};
pub use seasonality::analyze_seasonality;
