pub mod audubon;
pub mod browser;
pub mod config;
pub mod extraction;
pub mod geocoding;
pub mod gmail;
pub mod output;
pub mod tracing;
