pub mod data;
pub mod io;
pub mod printing;

#[cfg(test)]
pub mod tests;

pub use data::{Config, ConnectionSettings};
pub use io::ConfigError;
