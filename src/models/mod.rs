pub mod crop_profile;
pub mod economics;
pub mod efficiency;
pub mod growing_context;
pub mod projection;
pub mod recommendation;
pub mod resource;
pub mod rotation;
pub mod seasonality;
pub mod suitability;

pub use crop_profile::*;
pub use economics::*;
pub use efficiency::*;
pub use growing_context::*;
pub use projection::*;
pub use recommendation::*;
pub use resource::*;
pub use rotation::*;
pub use seasonality::*;
pub use suitability::*;
