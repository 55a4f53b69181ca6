pub mod browse;
pub mod seed;
