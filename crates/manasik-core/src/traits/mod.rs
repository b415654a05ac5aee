pub mod provider;

pub use provider::{GenerateParams, Provider};
