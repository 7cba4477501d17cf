//! Core library exports for the room tracker.
//!
//! This crate exposes the checklist parser, domain types, store
//! repositories and service layers used by the `room-tracker` binary.

pub mod checklist;
pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod models;
pub mod repository;
pub mod schema;
pub mod services;
