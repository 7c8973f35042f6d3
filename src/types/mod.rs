pub mod measurement;
pub mod responses;
pub mod station;
