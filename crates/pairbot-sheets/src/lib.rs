// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Sheets persistence for pairbot.
//!
//! [`SheetsRowStore`] talks to the Sheets v4 REST API with a service account
//! ([`ServiceAccountTokens`]) and maps each logical table onto one sheet.

pub mod auth;
pub mod credentials;
pub mod error;
pub mod store;

pub use auth::{ServiceAccountTokens, StaticToken, TokenSource};
pub use credentials::ServiceAccountKey;
pub use error::SheetsError;
pub use store::SheetsRowStore;
