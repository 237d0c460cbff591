pub mod drift;
pub mod resolver;

pub use drift::{find_drift, Drift};
pub use resolver::UpdateContext;
