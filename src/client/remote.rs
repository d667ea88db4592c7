//! HTTP account store
//!
//! Talks to the CloudApex API with `reqwest`. Failures to reach the server
//! surface as [`ClientError::Transport`]; error responses are decoded from
//! the API error body into the matching typed error.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

use super::{AccountStore, ClientError};
use crate::api::{ApiError, MessageResponse};
use crate::models::{
    AuthResponse, BlogPost, ContactSubmission, CreateBlogInput, EnrollmentSubmission, User,
    UserProfileUpdate,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RemoteStore {
    base_url: String,
    http: Client,
}

impl RemoteStore {
    /// Create a store for the API at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}/api{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(method, path, token).json(body)).await
    }

    /// GET /api/blogs
    pub async fn list_blogs(&self) -> Result<Vec<BlogPost>, ClientError> {
        self.send(self.request(Method::GET, "/blogs", None)).await
    }

    /// POST /api/blogs
    pub async fn create_blog(
        &self,
        token: &str,
        input: &CreateBlogInput,
    ) -> Result<BlogPost, ClientError> {
        self.send_json(Method::POST, "/blogs", Some(token), input).await
    }

    /// DELETE /api/blogs/{id}
    pub async fn delete_blog(&self, token: &str, id: &str) -> Result<(), ClientError> {
        let path = format!("/blogs/{}", urlencoding::encode(id));
        let _: MessageResponse = self
            .send(self.request(Method::DELETE, &path, Some(token)))
            .await?;
        Ok(())
    }

    /// POST /api/contact
    pub async fn submit_contact(&self, submission: &ContactSubmission) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send_json(Method::POST, "/contact", None, submission)
            .await?;
        Ok(())
    }

    /// POST /api/enrollments
    pub async fn submit_enrollment(
        &self,
        submission: &EnrollmentSubmission,
    ) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send_json(Method::POST, "/enrollments", None, submission)
            .await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let body = serde_json::from_str::<ApiError>(&text).unwrap_or_else(|_| {
        ApiError::new(
            "HTTP_ERROR",
            status.canonical_reason().unwrap_or("Request failed"),
        )
    });

    Err(ClientError::from_api(status.as_u16(), body))
}

#[async_trait]
impl AccountStore for RemoteStore {
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "name": name, "email": email, "password": password });
        self.send_json(Method::POST, "/auth/signup", None, &body).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        self.send_json(Method::POST, "/auth/login", None, &body).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/auth/me", Some(token))).await
    }

    async fn update_profile(&self, token: &str, update: &UserProfileUpdate) -> Result<User, ClientError> {
        self.send_json(Method::PUT, "/user/profile", Some(token), update).await
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let body = json!({ "currentPassword": current_password, "newPassword": new_password });
        let _: MessageResponse = self
            .send_json(Method::POST, "/user/change-password", Some(token), &body)
            .await?;
        Ok(())
    }

    /// Tokens are stateless; there is nothing to revoke server-side.
    async fn logout(&self, _token: &str) -> Result<(), ClientError> {
        Ok(())
    }
}
