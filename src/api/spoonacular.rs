use crate::api::RecipeApi;
use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::model::{InstructionBlock, RecipeInformation, RecipeSummary, SearchHit};
use crate::query::SearchRequest;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = "recipe-finder/0.1";

pub struct SpoonacularClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpoonacularClient {
    /// Create a client from configuration and an already resolved API key
    pub fn new(config: &FinderConfig, api_key: String) -> Result<Self, FinderError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(SpoonacularClient {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        SpoonacularClient {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, FinderError> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} answered {}: {}", url, status, body);
            return Err(FinderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FinderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    async fn find_by_ingredients(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<RecipeSummary>, FinderError> {
        debug!("{:?}", request);
        let hits: Vec<SearchHit> = self.get_json(request.url(), &request.params()).await?;
        Ok(hits.into_iter().map(RecipeSummary::from).collect())
    }

    async fn recipe_information(&self, id: u64) -> Result<RecipeInformation, FinderError> {
        let url = format!("{}/recipes/{}/information", self.base_url, id);
        self.get_json(&url, &[("apiKey", self.api_key.clone())])
            .await
    }

    async fn analyzed_instructions(&self, id: u64) -> Result<Vec<InstructionBlock>, FinderError> {
        let url = format!("{}/recipes/{}/analyzedInstructions", self.base_url, id);
        self.get_json(&url, &[("apiKey", self.api_key.clone())])
            .await
    }
}
