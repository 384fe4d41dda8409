pub mod ballistics;
pub mod color;
pub mod error;
pub mod sweep;
pub mod window;

pub use ballistics::{
    AnglePolicy, Landing, LaunchParameters, Parabola, Vertex, landing, landing_distance,
    sample_curve, vertex,
};
pub use color::{Rgb, rainbow_color};
pub use error::CoreError;
pub use sweep::{AngleSweep, SweepQuantity};
