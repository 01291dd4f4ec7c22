// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use async_trait::async_trait;
use nuthead_core::error::TransportError;
use nuthead_core::source::AssetSource;

use crate::error::SourceError;

/// Reads resources from an HTTP server with `GET` requests.
///
/// Any response outside the 2xx range is reported as a transport failure, so
/// a 404 page is never mistaken for resource content.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates an HTTP source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Creates an HTTP source around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetSource for HttpSource {
    async fn read(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        log::trace!("GET {path}");
        let response = self
            .client
            .get(path)
            .send()
            .await
            .map_err(|e| TransportError::new(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(path, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(path, e))?;
        Ok(body.to_vec())
    }
}
