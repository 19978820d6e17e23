//! Outbound best-effort network helpers.

pub mod ip_lookup;

pub use ip_lookup::fetch_client_ip;
