pub mod memory;
pub mod pipeline;
pub mod traits;
