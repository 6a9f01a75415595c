//! Twitarr Server
//!
//! Shipboard microblog, user-profile, and moderation backend.
//! Posts ("twarrts"), profiles, and the barrel collections that back
//! blocking, muting, and keyword alerts.

pub mod api;
pub mod auth;
pub mod barrels;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod moderation;
pub mod permissions;
pub mod profiles;
pub mod twarrts;
pub mod users;
pub mod util;
