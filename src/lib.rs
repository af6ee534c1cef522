pub mod cli;
pub mod corners;
pub mod error;
pub mod geometry;
pub mod rectify;
pub mod report;
pub mod transform;

pub use cli::Cli;
pub use corners::{load_corners, parse_corners};
pub use error::RectifyError;
pub use geometry::{CornerSet, Homography, Point2D, TargetRectangle};
pub use rectify::{rectify, RectifyOptions};
pub use report::Report;
pub use transform::{warp_perspective, Interpolation};
