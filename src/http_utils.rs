use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::{ApiResponse, NamedPokemon, PokemonRecord, cli_utils};

/// An unsuccessful HTTP answer from the pokemon API.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl Error for HttpError {}

/// Client for the `/api/v1` pokemon endpoints.
pub struct PokemonClient {
    client: Client,
    base_url: String,
}

impl PokemonClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Constructs a full API URL from a path
    pub fn api_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/api/v1/{}", base, path)
    }

    /// Lists owned pokemon
    pub async fn list(&self) -> Result<ApiResponse<Vec<PokemonRecord>>, Box<dyn Error>> {
        let response = self.client.get(self.api_url("my-pokemon")).send().await?;
        self.handle_response(response).await
    }

    /// Attempts to catch a pokemon
    pub async fn catch(&self, request: &NamedPokemon) -> Result<ApiResponse<Value>, Box<dyn Error>> {
        let response = self
            .client
            .post(self.api_url("catch"))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Renames an owned pokemon
    pub async fn rename(
        &self,
        request: &NamedPokemon,
    ) -> Result<ApiResponse<Value>, Box<dyn Error>> {
        let response = self
            .client
            .put(self.api_url("rename"))
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Attempts to release an owned pokemon
    pub async fn release(&self, pokemon_id: i32) -> Result<ApiResponse<Value>, Box<dyn Error>> {
        let url = self.api_url(&format!("release/{}", pokemon_id));
        let response = self.client.delete(url).send().await?;
        self.handle_response(response).await
    }

    /// Deserializes the response envelope.
    ///
    /// Not-found answers still carry an envelope and are returned as such; any
    /// other unsuccessful status becomes an [`HttpError`].
    async fn handle_response<T>(&self, response: Response) -> Result<ApiResponse<T>, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(response.json().await?)
        } else {
            let error = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiResponse<Value>>(&error) {
                Ok(envelope) => envelope.message,
                Err(_) if error.is_empty() => "No error details".to_string(),
                Err(_) => error,
            };
            Err(Box::new(HttpError { status, message }))
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, Box<dyn Error>>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}
