#[macro_use]
pub(crate) mod common;
pub mod scheduler;
pub mod server;

#[cfg(test)]
pub mod tests;
