pub mod measurement_frame;
pub mod series;
