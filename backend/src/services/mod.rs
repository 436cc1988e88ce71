//! Business logic services
//!
//! Services validate input, coordinate repositories and media storage, and
//! map failures into `StoreError`.

pub mod measurements;
pub mod nutrition;
pub mod user;
pub mod video;

pub use measurements::MeasurementService;
pub use nutrition::NutritionService;
pub use user::{SuperuserFlags, UserFlags, UserService};
pub use video::VideoService;
