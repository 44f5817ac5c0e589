// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message ingestion pipeline for the Aula bridge.
//!
//! Wires the three pipeline stages together: the session controller receives
//! and produces messages, the relevance filter accepts or rejects them, and
//! the forwarder posts accepted records to the downstream ingestion API.

pub mod filter;
pub mod forwarder;
pub mod session;

pub use filter::is_relevant;
pub use forwarder::Forwarder;
pub use session::SessionController;
