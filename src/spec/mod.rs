mod load;
mod normalize;
mod types;

pub use load::*;
pub use normalize::*;
pub use types::*;
