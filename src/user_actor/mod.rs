//! User entity bindings for the in-memory resource actor.

pub mod entity;
