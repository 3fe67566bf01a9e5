use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use mealmetrics_model::api::AiEstimate;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant unreachable")]
    CommunicationError,
    #[error("assistant backend error: {0}")]
    BackendError(String),
    #[error("incorrect assistant reply")]
    ResponseError,
}

type Result<T> = std::result::Result<T, AssistantError>;

/// Language-model backed helper for meal estimates, nutrition chat and
/// shopping lists.
#[mockall::automock]
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Estimate macros and price of a meal from its name alone.
    async fn estimate_meal(&self, meal_name: &str) -> Result<AiEstimate>;

    /// Free-form nutrition question, answered in the context of the
    /// caller's profile and goals.
    async fn chat(&self, message: &str, context: &serde_json::Value) -> Result<String>;

    /// Ingredient lists for the given meals, keyed by meal name.
    async fn ingredient_lists(
        &self,
        meal_names: &[String],
    ) -> Result<HashMap<String, Vec<String>>>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<BackendError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct BackendError {
    message: String,
}

fn analyze_prompt(meal_name: &str) -> String {
    format!(
        "Estimate the nutrition for {}. Return ONLY a JSON object with keys: \
         calories (number), protein (number), carbs (number), fat (number), \
         price (estimated USD number). Ensure all fields are filled. No markdown.",
        meal_name
    )
}

fn chat_prompt(message: &str, context: &serde_json::Value) -> String {
    format!(
        "You are a Nutritionist. User context: {}. User asks: {}. Keep it short.",
        context, message
    )
}

fn ingredients_prompt(meal_names: &[String]) -> String {
    format!(
        "Generate a grocery shopping list for these meals: {}. Return ONLY a JSON \
         object where keys are meal names and values are arrays of ingredients. \
         No markdown.",
        meal_names.iter().join(",")
    )
}

/// Model replies regularly arrive wrapped in markdown code fences even
/// when asked not to.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_owned()
}

pub struct GeminiAssistant {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiAssistant {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_owned(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE_URL, self.model, self.api_key
        )
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        debug!("Sending prompt to {}", self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .json(&request)
            .send()
            .await
            .map_err(|_| AssistantError::CommunicationError)?;

        let status = response.status();
        let payload: GenerateResponse = response.json().await.map_err(|_| {
            if status.is_success() {
                AssistantError::ResponseError
            } else {
                AssistantError::BackendError(status.to_string())
            }
        })?;

        if let Some(error) = payload.error {
            return Err(AssistantError::BackendError(error.message));
        }

        first_text(payload).ok_or(AssistantError::ResponseError)
    }
}

fn first_text(payload: GenerateResponse) -> Option<String> {
    payload
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()
        .map(|part| part.text)
}

pub fn create(api_key: String) -> impl Assistant {
    GeminiAssistant::new(api_key)
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn estimate_meal(&self, meal_name: &str) -> Result<AiEstimate> {
        let reply = self.generate(analyze_prompt(meal_name)).await?;
        serde_json::from_str(&strip_fences(&reply)).map_err(|_| AssistantError::ResponseError)
    }

    async fn chat(&self, message: &str, context: &serde_json::Value) -> Result<String> {
        self.generate(chat_prompt(message, context)).await
    }

    async fn ingredient_lists(
        &self,
        meal_names: &[String],
    ) -> Result<HashMap<String, Vec<String>>> {
        let reply = self.generate(ingredients_prompt(meal_names)).await?;
        serde_json::from_str(&strip_fences(&reply)).map_err(|_| AssistantError::ResponseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences() {
        let test_data = [
            ("{\"calories\": 100}", "{\"calories\": 100}"),
            ("```json\n{\"calories\": 100}\n```", "{\"calories\": 100}"),
            ("```\n{\"calories\": 100}\n```", "{\"calories\": 100}"),
            ("  {\"calories\": 100}\n", "{\"calories\": 100}"),
        ];

        for (i, (input, expected)) in test_data.into_iter().enumerate() {
            assert_eq!(strip_fences(input), expected, "Test case #{}", i);
        }
    }

    #[test]
    fn analyze_prompt_names_the_meal_and_required_keys() {
        let prompt = analyze_prompt("chicken ramen");
        assert!(prompt.starts_with("Estimate the nutrition for chicken ramen."));
        assert!(prompt.contains("calories (number)"));
        assert!(prompt.contains("price (estimated USD number)"));
        assert!(prompt.ends_with("No markdown."));
    }

    #[test]
    fn chat_prompt_embeds_context_as_json() {
        let context = serde_json::json!({"goals": {"calories": 2594}});
        assert_eq!(
            chat_prompt("what should I eat?", &context),
            "You are a Nutritionist. User context: {\"goals\":{\"calories\":2594}}. \
             User asks: what should I eat?. Keep it short."
        );
    }

    #[test]
    fn ingredients_prompt_joins_meal_names() {
        let prompt = ingredients_prompt(&["Omelette".to_owned(), "Ramen".to_owned()]);
        assert!(prompt.contains("these meals: Omelette,Ramen."));
    }

    #[test]
    fn fenced_estimate_reply_parses() {
        let reply = "```json\n{\"calories\": 520, \"protein\": 31, \"carbs\": 62, \
                     \"fat\": 14, \"price\": 9.5}\n```";
        let estimate: AiEstimate = serde_json::from_str(&strip_fences(reply)).unwrap();
        assert_eq!(
            estimate,
            AiEstimate {
                calories: 520.0,
                protein: 31.0,
                carbs: 62.0,
                fat: 14.0,
                price: 9.5,
            }
        );
    }

    #[test]
    fn fenced_ingredients_reply_parses() {
        let reply = "```json\n{\"Omelette\": [\"eggs\", \"butter\"]}\n```";
        let lists: HashMap<String, Vec<String>> =
            serde_json::from_str(&strip_fences(reply)).unwrap();
        assert_eq!(lists["Omelette"], vec!["eggs", "butter"]);
    }
}
