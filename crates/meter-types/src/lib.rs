pub mod billing;
pub mod editor;
pub mod pricing;
pub mod revenue;

pub use billing::*;
pub use editor::*;
pub use pricing::*;
pub use revenue::*;

/// Auth token wrapper for sharing via Leptos context.
#[derive(Clone, Debug)]
pub struct AuthToken(pub String);
