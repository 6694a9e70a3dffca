pub mod provider_call;

pub use provider_call::with_timeout;
