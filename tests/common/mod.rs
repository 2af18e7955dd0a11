#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use roamance_api::app::{router, AppState, Assistant};
use roamance_api::auth::{generate_jwt, Claims};
use roamance_api::config::AppConfig;
use roamance_api::database::InMemoryStore;

/// The router served in-process on an ephemeral port over a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    config: AppConfig,
    client: reqwest::Client,
}

/// A user with a valid bearer token for this server
pub struct Caller {
    pub user_id: Uuid,
    pub token: String,
}

pub async fn spawn() -> Result<TestServer> {
    spawn_with(AppConfig::development()).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    let mut state = AppState::new(Arc::new(InMemoryStore::new()), config.clone());
    if let Some(assistant) = Assistant::from_settings(&config.gemini)? {
        state = state.with_assistant(assistant);
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let base_url = format!("http://{}", listener.local_addr()?);

    tokio::spawn(async move {
        let _ = axum::serve(listener, router(state)).await;
    });

    Ok(TestServer {
        base_url,
        config,
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn caller(&self, email: &str) -> Result<Caller> {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, email, self.config.security.jwt_expiry_hours);
        let token = generate_jwt(&claims, &self.config.security.jwt_secret)?;
        Ok(Caller { user_id, token })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, caller: &Caller, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).bearer_auth(&caller.token).send().await?;
        Self::parse(res).await
    }

    pub async fn post(&self, caller: &Caller, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .post(self.url(path))
            .bearer_auth(&caller.token)
            .json(body)
            .send()
            .await?;
        Self::parse(res).await
    }

    /// POST and return the raw body, for endpoints that do not answer with JSON
    pub async fn post_text(&self, caller: &Caller, path: &str, body: &Value) -> Result<(StatusCode, String, String)> {
        let res = self
            .client
            .post(self.url(path))
            .bearer_auth(&caller.token)
            .json(body)
            .send()
            .await?;
        let status = res.status();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok((status, content_type, res.text().await?))
    }

    pub async fn put(&self, caller: &Caller, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .put(self.url(path))
            .bearer_auth(&caller.token)
            .json(body)
            .send()
            .await?;
        Self::parse(res).await
    }

    pub async fn delete(&self, caller: &Caller, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).bearer_auth(&caller.token).send().await?;
        Self::parse(res).await
    }

    /// Create a journal and return its id
    pub async fn journal(&self, caller: &Caller, title: &str) -> Result<String> {
        let (status, body) = self
            .post(caller, "/api/journals", &serde_json::json!({ "title": title }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "journal create failed: {}", body);
        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .context("journal id missing")
    }

    async fn parse(res: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = res.status();
        let body = res.json::<Value>().await?;
        Ok((status, body))
    }
}
