pub mod crop_table;

pub use crop_table::{CropTable, SkippedProfile};
