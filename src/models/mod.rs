//! Core data models for the image-hosting service.
//!
//! These entities describe objects as the listing and fetch endpoints see
//! them. They carry bucket metadata only; payload bytes always move as
//! streams through the store handle.

pub mod object;
