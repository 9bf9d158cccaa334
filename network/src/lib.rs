// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chess Client Network - everything that leaves the process
//!
//! This crate provides:
//! - The gateway to the rules server (trait plus an HTTP implementation)
//! - Durable key/value storage for resuming a session after a restart
//! - Client configuration loading and saving

#![deny(unsafe_code)]

pub mod config;
pub mod gateway;
pub mod storage;

pub use config::ClientConfig;
pub use gateway::{GatewayError, GlyphMap, HttpGateway, MoveRequest, ServerGateway};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SessionStore, StorageError};
