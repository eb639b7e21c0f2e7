pub mod client;

pub use client::OsrmClient;
