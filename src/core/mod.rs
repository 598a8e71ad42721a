//! # Core Module
//!
//! Fundamental resource containers shared throughout the crate.
//!
//! ## Key Components
//! - `StResource`: Single-threaded reference-counted resource with interior mutability
//!
//! Everything in this crate runs on the caller's frame-loop thread, so there is no
//! thread-safe counterpart here. Asynchronous work is cooperative (see
//! `engine_state::task_management`), never parallel.

pub mod st_resource;

pub use st_resource::StResource;
