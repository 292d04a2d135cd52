pub mod body;
pub mod error;
pub mod http;
pub mod prober;

pub mod test_support;

pub use error::ProbeError;
pub use prober::{HttpProber, Prober};
