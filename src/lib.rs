// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

//! Request-forwarding core for exploiting server-side request forgery.
//!
//! Given a vulnerable endpoint whose URL (or body) carries the literal
//! `xxURLxx` placeholder, [`http::SsrfHttp`] accepts client requests,
//! substitutes the attacker-chosen destination into the placeholder, runs
//! the configured rewrite rules, dispatches the request (optionally through
//! an upstream proxy), and reconstructs a well-formed response from
//! whatever bytes come back.
//!
//! The crate logs through the `log` facade; embedders pick the logger
//! implementation and verbosity. Listener and CLI layers live outside this
//! crate and drive it through [`http::SsrfHttp::send_request`] and
//! [`http::SsrfHttp::send_uri`].

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_inception)]
#![allow(clippy::bool_assert_comparison)]

pub mod config;
pub mod error;
pub mod http;
pub mod ip_encoder;
pub mod request;
pub mod response;
pub mod rules;
pub mod target;

pub use config::SsrfConfig;
pub use error::SsrfError;
pub use http::SsrfHttp;
pub use request::RequestOverrides;
pub use response::SsrfResponse;
pub use rules::{RulePhase, RuleSpec};
