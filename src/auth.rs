//! Token models, the injectable clock, and the token store that owns the bearer token.

pub mod clock;
pub mod metrics;
pub mod store;
pub mod token;

pub use clock::*;
pub use metrics::*;
pub use store::*;
pub use token::{secret::*, *};
