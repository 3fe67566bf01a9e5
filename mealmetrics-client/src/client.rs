use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;

use mealmetrics_model::{
    api::{
        AiEstimate, AnalyzeRequest, ChatReply, ChatRequest, IngredientsRequest, LoginRequest,
        LoginResponse, MessageResponse, NewMeal, ProfileResponse, ProfileUpdate, RegisterRequest,
        Summary, TokenResponse,
    },
    meal::Meal,
};

const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server unreachable")]
    CommunicationError,
    #[error("internal server error")]
    InternalServerError,
    #[error("{0}")]
    RequestError(String),
    #[error("incorrect server response")]
    ResponseError,
}

type Result<T> = std::result::Result<T, Error>;

#[mockall::automock]
#[async_trait]
pub trait Client: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse>;
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse>;
    async fn meals(&self) -> Result<Vec<Meal>>;
    async fn add_meal(&self, meal: &NewMeal) -> Result<Meal>;
    async fn delete_meal(&self, id: &str) -> Result<()>;
    async fn summary(&self) -> Result<Summary>;
    async fn estimate_meal(&self, meal_name: &str) -> Result<AiEstimate>;
    async fn chat(&self, message: &str, context: &serde_json::Value) -> Result<String>;
    async fn ingredient_lists(&self, meals: &[String]) -> Result<HashMap<String, Vec<String>>>;
}

pub struct ClientImpl {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ClientImpl {
    fn new(url: String, token: Option<String>) -> Self {
        Self {
            url,
            token,
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.url, path));
        match &self.token {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder,
        }
    }
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_server_error() {
        return Err(Error::InternalServerError);
    }
    if status.is_client_error() {
        let msg = response
            .json::<MessageResponse>()
            .await
            .map(|body| body.msg)
            .unwrap_or_else(|_| status.to_string());
        return Err(Error::RequestError(msg));
    }
    response.json().await.map_err(|_| Error::ResponseError)
}

pub fn create(url: String) -> impl Client {
    ClientImpl::new(url, None)
}

/// Client for the routes that require the token issued at login.
pub fn create_with_token(url: String, token: String) -> impl Client {
    ClientImpl::new(url, Some(token))
}

#[async_trait]
impl Client for ClientImpl {
    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse> {
        let response = self
            .request(Method::POST, "/api/auth/register")
            .json(request)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        let response = self
            .request(Method::POST, "/api/auth/login")
            .json(&request)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse> {
        let response = self
            .request(Method::PUT, "/api/auth/profile")
            .json(update)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn meals(&self) -> Result<Vec<Meal>> {
        let response = self
            .request(Method::GET, "/api/meals")
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn add_meal(&self, meal: &NewMeal) -> Result<Meal> {
        let response = self
            .request(Method::POST, "/api/meals")
            .json(meal)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn delete_meal(&self, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/api/meals/{}", id))
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse::<MessageResponse>(response).await.map(|_| ())
    }

    async fn summary(&self) -> Result<Summary> {
        let response = self
            .request(Method::GET, "/api/meals/summary")
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn estimate_meal(&self, meal_name: &str) -> Result<AiEstimate> {
        let request = AnalyzeRequest {
            meal_name: meal_name.to_owned(),
        };
        let response = self
            .request(Method::POST, "/api/ai/analyze")
            .json(&request)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }

    async fn chat(&self, message: &str, context: &serde_json::Value) -> Result<String> {
        let request = ChatRequest {
            message: message.to_owned(),
            context: context.clone(),
        };
        let response = self
            .request(Method::POST, "/api/ai/chat")
            .json(&request)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse::<ChatReply>(response).await.map(|body| body.reply)
    }

    async fn ingredient_lists(&self, meals: &[String]) -> Result<HashMap<String, Vec<String>>> {
        let request = IngredientsRequest {
            meals: meals.to_vec(),
        };
        let response = self
            .request(Method::POST, "/api/ai/ingredients")
            .json(&request)
            .send()
            .await
            .map_err(|_| Error::CommunicationError)?;
        parse(response).await
    }
}
