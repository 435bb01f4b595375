//! Domain resolution
//!
//! Maps an inbound request hostname to the tenant whose partition the rest
//! of the request must use, falling back to the shared public partition on
//! a miss. An inactive tenant's domain behaves as if unbound.

mod hostname;
mod resolver;

pub use hostname::normalize_hostname;
pub use resolver::{DomainResolver, Resolution};
