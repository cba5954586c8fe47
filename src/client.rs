// src/client.rs
// HTTP API client for the bingo server

use std::error::Error;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::game::Scoreboard;
use crate::server::{ToggleRequest, ToggleResponse};

/// Generic API error response structure
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug)]
pub struct BingoClient {
    server_url: String,
    http_client: reqwest::Client,
}

impl BingoClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Box<dyn Error>> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            server_url: config.server_url(),
            http_client,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{path}", self.server_url);
        let response = self.http_client.get(&url).send().await?;
        read_response(response).await
    }

    async fn post_json<T, U>(&self, path: &str, body: &T) -> Result<U, Box<dyn Error>>
    where
        T: Serialize,
        U: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{path}", self.server_url);
        let response = self.http_client.post(&url).json(body).send().await?;
        read_response(response).await
    }

    /// Server status as raw JSON
    pub async fn status(&self) -> Result<serde_json::Value, Box<dyn Error>> {
        self.get_json("/status").await
    }

    pub async fn scoreboard(&self) -> Result<Scoreboard, Box<dyn Error>> {
        self.get_json("/scoreboard").await
    }

    /// Send a caller submission (one or more comma-separated numbers)
    pub async fn toggle(&self, input: &str) -> Result<ToggleResponse, Box<dyn Error>> {
        let request = ToggleRequest { input: input.to_string() };
        self.post_json("/toggle", &request).await
    }

    pub async fn reset(&self) -> Result<String, Box<dyn Error>> {
        let response: MessageResponse = self.post_json("/reset", &()).await?;
        Ok(response.message)
    }

    pub async fn reload(&self) -> Result<String, Box<dyn Error>> {
        let response: MessageResponse = self.post_json("/reload", &()).await?;
        Ok(response.message)
    }
}

async fn read_response<T>(response: reqwest::Response) -> Result<T, Box<dyn Error>>
where
    T: for<'de> Deserialize<'de>,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    // Prefer the server's error message over the bare status
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(error) => Err(format!("Server returned {status}: {}", error.error).into()),
        Err(_) => Err(format!("HTTP request failed with status: {status}").into()),
    }
}
