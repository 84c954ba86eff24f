/// Backend HTTP contract module
///
/// This module handles:
/// - Typed wire models for every backend response (types.rs)
/// - The HTTP client for /last-settings, /select-image, /search
///   and /image/:path (client.rs)

pub mod client;
pub mod types;
