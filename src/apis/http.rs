//! REST implementation of [`GameApi`] built on `reqwest`.
//!
//! Mirrors the game server's JSON envelope conventions: successful
//! responses wrap their record (`{"game": …}`, `{"round": …}`), rejections
//! carry `{"error": "...", "code": "SCREAMING_SNAKE"}`. The rejection
//! message is preserved verbatim in [`DecoyError::Server`] so the UI can
//! show exactly what the server said.
//!
//! Only available with the `api-http` feature (on by default).

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::GameApi;
use crate::error::{DecoyError, Result};
use crate::error_codes::ApiErrorCode;
use crate::model::{
    AnswerId, Game, GameId, GameSummary, QuestionFilter, QuestionId, QuestionPage, Round,
};

/// Bearer-token REST client for the Decoy game server.
///
/// The base URL and token come from the external session context (the
/// same credential the push channel uses).
///
/// # Example
///
/// ```rust,no_run
/// use decoy_client::HttpGameApi;
///
/// let api = HttpGameApi::new("https://play.decoy.gr/api", "token-from-login");
/// ```
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Deserialize)]
struct GameEnvelope {
    game: Game,
}

#[derive(Deserialize)]
struct GamesEnvelope {
    games: Vec<GameSummary>,
}

#[derive(Deserialize)]
struct RoundEnvelope {
    round: Round,
}

#[derive(Deserialize)]
struct CreatedGameEnvelope {
    game: CreatedGame,
}

#[derive(Deserialize)]
struct CreatedGame {
    id: GameId,
}

/// Decoded rejection body: `{"error": "...", "code": "..."}`.
///
/// Decoded field-by-field from a loose [`serde_json::Value`] so an
/// unrecognized `code` never costs us the verbatim message.
fn reject_error(status: reqwest::StatusCode, body: serde_json::Value) -> DecoyError {
    let message = body
        .get("error")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("request failed with status {status}"));
    let code: Option<ApiErrorCode> = body
        .get("code")
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    DecoyError::Server { message, code }
}

impl HttpGameApi {
    /// Create a client for the given base URL (no trailing slash needed)
    /// and bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::from_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a client from a preconfigured [`reqwest::Client`] (custom
    /// timeouts, proxies, TLS).
    pub fn from_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Decode a response, mapping non-2xx statuses to
    /// [`DecoyError::Server`] with the server's message intact.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<serde_json::Value>().await.unwrap_or_default();
        Err(reject_error(status, body))
    }

    /// Like [`decode`](Self::decode) for endpoints whose success body the
    /// engine deliberately ignores (fire-and-forget actions).
    async fn decode_unit(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.json::<serde_json::Value>().await.unwrap_or_default();
        Err(reject_error(status, body))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(endpoint))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<B: serde::Serialize>(&self, endpoint: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode_unit(response).await
    }

    async fn post_empty(&self, endpoint: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode_unit(response).await
    }
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn get_game(&self, game_id: GameId) -> Result<Game> {
        let envelope: GameEnvelope = self.get(&format!("/games/{game_id}")).await?;
        Ok(envelope.game)
    }

    async fn get_round(&self, game_id: GameId) -> Result<Round> {
        let envelope: RoundEnvelope = self.get(&format!("/games/{game_id}/round")).await?;
        Ok(envelope.round)
    }

    async fn available_questions(
        &self,
        game_id: GameId,
        filter: &QuestionFilter,
    ) -> Result<QuestionPage> {
        let mut request = self
            .client
            .get(self.url(&format!("/games/{game_id}/questions")))
            .bearer_auth(&self.token)
            .query(&[("page", filter.page.to_string())]);
        if let Some(category) = &filter.category {
            request = request.query(&[("category", category.as_str())]);
        }
        if let Some(per_page) = filter.per_page {
            request = request.query(&[("per_page", per_page.to_string())]);
        }
        if !filter.exclude_ids.is_empty() {
            let exclude = filter
                .exclude_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            request = request.query(&[("exclude", exclude)]);
        }
        Self::decode(request.send().await?).await
    }

    async fn list_games(&self) -> Result<Vec<GameSummary>> {
        let envelope: GamesEnvelope = self.get("/games").await?;
        Ok(envelope.games)
    }

    async fn create_game(&self) -> Result<GameId> {
        let response = self
            .client
            .post(self.url("/games"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let envelope: CreatedGameEnvelope = Self::decode(response).await?;
        Ok(envelope.game.id)
    }

    async fn join_game(&self, game_id: GameId) -> Result<()> {
        self.post_empty(&format!("/games/{game_id}/join")).await
    }

    async fn leave_game(&self, game_id: GameId) -> Result<()> {
        self.post_empty(&format!("/games/{game_id}/leave")).await
    }

    async fn start_game(&self, game_id: GameId) -> Result<()> {
        self.post_empty(&format!("/games/{game_id}/start")).await
    }

    async fn delete_game(&self, game_id: GameId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/games/{game_id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode_unit(response).await
    }

    async fn pick_question(&self, game_id: GameId, question_id: QuestionId) -> Result<()> {
        self.post(
            &format!("/games/{game_id}/round/pick"),
            &serde_json::json!({ "question_id": question_id }),
        )
        .await
    }

    async fn submit_answer(&self, game_id: GameId, text: &str) -> Result<()> {
        self.post(
            &format!("/games/{game_id}/round/answer"),
            &serde_json::json!({ "text": text }),
        )
        .await
    }

    async fn submit_vote(&self, game_id: GameId, answer_id: AnswerId) -> Result<()> {
        self.post(
            &format!("/games/{game_id}/round/vote"),
            &serde_json::json!({ "answer_id": answer_id }),
        )
        .await
    }

    async fn advance_round(&self, game_id: GameId) -> Result<()> {
        self.post_empty(&format!("/games/{game_id}/round/advance"))
            .await
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let api = HttpGameApi::new("https://play.decoy.gr/api///", "tok");
        assert_eq!(api.url("/games/1"), "https://play.decoy.gr/api/games/1");
    }

    #[test]
    fn rejection_decodes_message_and_code() {
        let body = serde_json::json!({
            "error": "only the question master can pick a question",
            "code": "NOT_QUESTION_MASTER",
        });
        let err = reject_error(reqwest::StatusCode::FORBIDDEN, body);
        match err {
            DecoyError::Server { message, code } => {
                assert_eq!(message, "only the question master can pick a question");
                assert_eq!(code, Some(ApiErrorCode::NotQuestionMaster));
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[test]
    fn rejection_keeps_message_when_code_is_unknown() {
        let body = serde_json::json!({ "error": "nope", "code": "BRAND_NEW_CODE" });
        let err = reject_error(reqwest::StatusCode::BAD_REQUEST, body);
        match err {
            DecoyError::Server { message, code } => {
                assert_eq!(message, "nope");
                assert!(code.is_none());
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[test]
    fn rejection_without_body_falls_back_to_status() {
        let err = reject_error(reqwest::StatusCode::BAD_GATEWAY, serde_json::Value::Null);
        match err {
            DecoyError::Server { message, code } => {
                assert!(message.contains("502"));
                assert!(code.is_none());
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }
}
