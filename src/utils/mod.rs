pub mod math;
pub mod pool;
