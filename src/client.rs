// src/client.rs

//! Typed HTTP client for the quiz service.
//!
//! Student calls carry no credential. Teacher calls attach whatever the
//! [`CredentialCache`] currently holds; the server decides whether it is still valid.

use reqwest::{RequestBuilder, Response, StatusCode, header};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{
    auth::{Credential, credential::SECRET_HEADER},
    handlers::auth::{AdminCheckResponse, VerifySecretResponse},
    models::{
        attempt::{
            Answer, AttemptStatus, ResultStats, StudentAttempt, SubmitAttemptRequest,
            SubmitAttemptResponse,
        },
        quiz::{ActionResult, CreatedQuiz, Quiz, QuizPayload},
        role::{AssignRoleRequest, Role, RoleResponse},
        student::Student,
    },
    session::CredentialCache,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Not signed in")]
    NotSignedIn,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            ClientError::NotSignedIn => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct QuizClient {
    http: reqwest::Client,
    base_url: String,
    session: CredentialCache,
}

impl QuizClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_session(base_url, CredentialCache::default())
    }

    pub fn with_session(base_url: impl Into<String>, session: CredentialCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&mut self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        match self.session.current() {
            Some(Credential::Secret(secret)) => Ok(builder.header(SECRET_HEADER, secret.as_str())),
            Some(Credential::Bearer(token)) => {
                Ok(builder.header(header::AUTHORIZATION, format!("Bearer {}", token)))
            }
            Some(Credential::Anonymous) | None => Err(ClientError::NotSignedIn),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(ClientError::Api { status, message })
    }

    // --- session -------------------------------------------------------

    /// Checks the secret with the server and caches it only if it is valid.
    pub async fn login_with_secret(&mut self, secret: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/verify"))
            .json(&json!({ "secret": secret }))
            .send()
            .await?;
        let verdict: VerifySecretResponse = Self::decode(response).await?;
        if verdict.valid {
            self.session.store(Credential::Secret(secret.to_string()));
        }
        Ok(verdict.valid)
    }

    /// Caches an identity token issued by the identity provider.
    pub fn login_with_token(&mut self, token: &str) {
        self.session.store(Credential::Bearer(token.to_string()));
    }

    pub fn logout(&mut self) {
        self.session.clear();
    }

    pub fn is_signed_in(&mut self) -> bool {
        self.session.is_signed_in()
    }

    // --- student -------------------------------------------------------

    pub async fn resolve_student(&self, name: &str, course: &str) -> Result<Student, ClientError> {
        let response = self
            .http
            .post(self.url("/students/resolve"))
            .json(&json!({ "name": name, "course": course }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn published_quizzes(&self) -> Result<Vec<Quiz>, ClientError> {
        let response = self.http.get(self.url("/quizzes/published")).send().await?;
        Self::decode(response).await
    }

    pub async fn quiz(&self, quiz_id: &str) -> Result<Quiz, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/quizzes/{}", quiz_id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn has_attempted(&self, student_id: &str, quiz_id: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .get(self.url("/attempts/status"))
            .query(&[("studentId", student_id), ("quizId", quiz_id)])
            .send()
            .await?;
        let status: AttemptStatus = Self::decode(response).await?;
        Ok(status.has_attempted)
    }

    pub async fn submit_attempt(
        &self,
        request: &SubmitAttemptRequest,
    ) -> Result<SubmitAttemptResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/attempts"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    // --- teacher -------------------------------------------------------

    pub async fn create_quiz(&mut self, payload: &QuizPayload) -> Result<String, ClientError> {
        let builder = self.http.post(self.url("/teacher/quizzes")).json(payload);
        let response = self.authorized(builder)?.send().await?;
        let created: CreatedQuiz = Self::decode(response).await?;
        Ok(created.quiz_id)
    }

    pub async fn update_quiz(
        &mut self,
        quiz_id: &str,
        payload: &QuizPayload,
    ) -> Result<ActionResult, ClientError> {
        let builder = self
            .http
            .put(self.url(&format!("/teacher/quizzes/{}", quiz_id)))
            .json(payload);
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn publish_quiz(&mut self, quiz_id: &str) -> Result<ActionResult, ClientError> {
        let builder = self
            .http
            .post(self.url(&format!("/teacher/quizzes/{}/publish", quiz_id)));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn own_quizzes(&mut self) -> Result<Vec<Quiz>, ClientError> {
        let builder = self.http.get(self.url("/teacher/quizzes"));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn all_quizzes(&mut self) -> Result<Vec<Quiz>, ClientError> {
        let builder = self.http.get(self.url("/teacher/quizzes/all"));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn attempts(&mut self, quiz_id: &str) -> Result<Vec<StudentAttempt>, ClientError> {
        let builder = self
            .http
            .get(self.url(&format!("/teacher/quizzes/{}/attempts", quiz_id)));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn result_stats(&mut self, quiz_id: &str) -> Result<ResultStats, ClientError> {
        let builder = self
            .http
            .get(self.url(&format!("/teacher/quizzes/{}/stats", quiz_id)));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn answers_by_student(
        &mut self,
        quiz_id: &str,
    ) -> Result<Vec<(String, Vec<Answer>)>, ClientError> {
        let builder = self
            .http
            .get(self.url(&format!("/teacher/quizzes/{}/answers", quiz_id)));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn all_attempts(&mut self) -> Result<Vec<StudentAttempt>, ClientError> {
        let builder = self.http.get(self.url("/teacher/attempts"));
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    pub async fn attempts_for_student(
        &mut self,
        name: &str,
        course: &str,
    ) -> Result<Vec<StudentAttempt>, ClientError> {
        let builder = self
            .http
            .get(self.url("/teacher/attempts/student"))
            .query(&[("name", name), ("course", course)]);
        let response = self.authorized(builder)?.send().await?;
        Self::decode(response).await
    }

    /// On success the cached secret is replaced, since the old one is now dead everywhere.
    pub async fn change_secret(
        &mut self,
        old_secret: &str,
        new_secret: &str,
    ) -> Result<ActionResult, ClientError> {
        let builder = self
            .http
            .post(self.url("/auth/password"))
            .json(&json!({ "oldSecret": old_secret, "newSecret": new_secret }));
        let response = self.authorized(builder)?.send().await?;
        let result: ActionResult = Self::decode(response).await?;
        if result.success {
            self.session.replace_secret(new_secret);
        }
        Ok(result)
    }

    // --- roles ---------------------------------------------------------

    pub async fn role(&mut self) -> Result<Role, ClientError> {
        let builder = self.http.get(self.url("/auth/role"));
        let response = self.authorized(builder)?.send().await?;
        let role: RoleResponse = Self::decode(response).await?;
        Ok(role.role)
    }

    pub async fn is_admin(&mut self) -> Result<bool, ClientError> {
        let builder = self.http.get(self.url("/auth/admin"));
        let response = self.authorized(builder)?.send().await?;
        let check: AdminCheckResponse = Self::decode(response).await?;
        Ok(check.is_admin)
    }

    pub async fn register(&mut self) -> Result<Role, ClientError> {
        let builder = self.http.post(self.url("/auth/register"));
        let response = self.authorized(builder)?.send().await?;
        let role: RoleResponse = Self::decode(response).await?;
        Ok(role.role)
    }

    pub async fn assign_role(&mut self, identity: &str, role: Role) -> Result<(), ClientError> {
        let builder = self
            .http
            .put(self.url(&format!("/auth/roles/{}", identity)))
            .json(&AssignRoleRequest { role });
        let response = self.authorized(builder)?.send().await?;
        let _: RoleResponse = Self::decode(response).await?;
        Ok(())
    }
}
