pub mod batch;
pub mod paths;
