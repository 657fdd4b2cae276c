// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the outbound translation API.
//!
//! Speaks the LibreTranslate wire shape: POST `{base}/translate` with
//! `q`/`source`/`target`, answer carries `translatedText`. Responses are
//! memoized in-process; repeated translations of the same snippet are
//! common when users reload a feed.

use crate::error::AppError;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;

/// Translation API client with an in-process response cache.
#[derive(Clone)]
pub struct Translator {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    cache: Arc<DashMap<CacheKey, String>>,
}

type CacheKey = (String, String, String);

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl Translator {
    /// `base_url == None` means the deployment has no translation service;
    /// every call then fails with a configuration message.
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Translate `text` from `source` to `dest` language.
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        dest: &str,
    ) -> Result<String, AppError> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::TranslationApi("translation service is not configured".to_string())
        })?;

        let key = (text.to_string(), source.to_string(), dest.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let mut body = serde_json::json!({
            "q": text,
            "source": source,
            "target": dest,
            "format": "text",
        });
        if let Some(api_key) = &self.api_key {
            body["api_key"] = serde_json::Value::String(api_key.clone());
        }

        let response = self
            .http
            .post(format!("{}/translate", base))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::TranslationApi(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::TranslationApi(format!(
                "translation service returned {}",
                response.status()
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| AppError::TranslationApi(format!("malformed response: {}", e)))?;

        self.cache.insert(key, parsed.translated_text.clone());
        Ok(parsed.translated_text)
    }
}
