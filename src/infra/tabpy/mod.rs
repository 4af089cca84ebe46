//! Client for a running TabPy analytics server.

mod client;

pub use client::TabPyClient;
