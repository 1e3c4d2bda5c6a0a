// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use ssrforge::SsrfConfig;
use wiremock::MockServer;

/// Start a mock vulnerable endpoint.
pub async fn setup_vulnerable_endpoint() -> MockServer {
    MockServer::start().await
}

/// Config for a GET-style endpoint that injects the destination into the
/// `url` query parameter, e.g. `http://host/fetch?url=xxURLxx`.
pub fn fetch_config(server: &MockServer) -> SsrfConfig {
    SsrfConfig::with_url(&format!("{}/fetch?url=xxURLxx", server.uri()))
}
