pub(crate) mod config;
pub mod credentials;
pub mod error;
pub(crate) mod state;
