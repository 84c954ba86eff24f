/// State management module
///
/// This module handles all client-owned state:
/// - The per-session state and its named transitions (session.rs)
///
/// There are no ambient globals; every mutation goes through a
/// transition function on SessionState, driven from the update loop.

pub mod session;
