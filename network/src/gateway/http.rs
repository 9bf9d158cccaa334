// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/JSON gateway to the rules server

use super::{GatewayError, GlyphMap, MoveRequest, ServerGateway};
use crate::config::ClientConfig;
use async_trait::async_trait;
use chess_client_core::{GameState, Piece};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Error body the server sends with a 4xx answer
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gateway talking to the server over HTTP
pub struct HttpGateway {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chess-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::from)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        Self::new(config.server_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<String, GatewayError> {
        tracing::debug!(path, "GET");
        let response = self.http_client.get(self.url(path)).send().await?;
        Self::read_body(response).await
    }

    async fn post_move(&self, path: &str, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        tracing::debug!(
            path,
            piece = %request.piece,
            target = %request.target,
            promotion = ?request.promotion_type,
            "POST move"
        );
        let response = self.http_client.post(self.url(path)).json(request).send().await?;
        let body = Self::read_body(response).await?;
        decode_state(&body)
    }

    /// Body of a successful answer, or the matching error
    async fn read_body(response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => {
                tracing::debug!(status = status.as_u16(), message = %err.message, "Server rejected request");
                Err(GatewayError::Rejected {
                    status: status.as_u16(),
                    message: err.message,
                })
            }
            Err(_) => Err(GatewayError::Status(status.as_u16())),
        }
    }
}

fn decode_state(body: &str) -> Result<GameState, GatewayError> {
    GameState::from_json(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ServerGateway for HttpGateway {
    async fn reset(&self) -> Result<GameState, GatewayError> {
        let body = self.get("reset").await?;
        decode_state(&body)
    }

    async fn load_piece_glyphs(&self) -> Result<GlyphMap, GatewayError> {
        let body = self.get("load_pieces").await?;
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;

        let mut glyphs = GlyphMap::new();
        for (code, glyph) in raw {
            match Piece::from_code(&code) {
                Ok(piece) => {
                    glyphs.insert(piece, glyph);
                }
                Err(e) => tracing::debug!("Skipping glyph: {}", e),
            }
        }
        Ok(glyphs)
    }

    async fn submit_move(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        self.post_move("move", request).await
    }

    async fn submit_move_vs_ai(&self, request: &MoveRequest<'_>) -> Result<GameState, GatewayError> {
        self.post_move("moveai", request).await
    }
}
