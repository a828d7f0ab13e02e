use crate::{
    client::StudentSource,
    data::student::{Student, StudentForm},
    error::{ErrorBody, ErrorKind, RequestSnafu, RosterError, RosterResult},
    routes::api::{DeletedResponse, SavedResponse, StudentList, StudentResponse},
};
use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::time::Duration;
use uuid::Uuid;

/// Thin HTTP wrapper over the `/students` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub const TIMEOUT: Duration = Duration::from_secs(8);

    pub fn new(base_url: impl Into<String>) -> RosterResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Self::TIMEOUT)
            .default_headers(headers)
            .build()
            .context(RequestSnafu)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn students_url(&self) -> String {
        format!("{}/students", self.base_url)
    }

    fn student_url(&self, id: Uuid) -> String {
        format!("{}/students/{id}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> RosterResult<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.context(RequestSnafu);
        }

        let text = response.text().await.context(RequestSnafu)?;
        let (kind, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody { message, kind }) => (kind, message),
            Err(_) if text.trim().is_empty() => {
                (ErrorKind::from_status_code(status), status.to_string())
            }
            Err(_) => (ErrorKind::from_status_code(status), text),
        };
        warn!(%status, ?kind, %message, "student API returned an error");

        Err(RosterError::Api {
            status: status.as_u16(),
            kind,
            message,
        })
    }
}

#[async_trait]
impl StudentSource for ApiClient {
    async fn list_students(&self) -> RosterResult<Vec<Student>> {
        let response = self
            .http
            .get(self.students_url())
            .send()
            .await
            .context(RequestSnafu)?;
        let StudentList { students, .. } = Self::decode(response).await?;
        Ok(students)
    }

    async fn get_student(&self, id: Uuid) -> RosterResult<Student> {
        let response = self
            .http
            .get(self.student_url(id))
            .send()
            .await
            .context(RequestSnafu)?;
        let StudentResponse { student } = Self::decode(response).await?;
        Ok(student)
    }

    async fn create_student(&self, form: &StudentForm) -> RosterResult<Student> {
        let response = self
            .http
            .post(self.students_url())
            .json(form)
            .send()
            .await
            .context(RequestSnafu)?;
        let SavedResponse { student, .. } = Self::decode(response).await?;
        Ok(student)
    }

    async fn update_student(&self, id: Uuid, form: &StudentForm) -> RosterResult<Student> {
        let response = self
            .http
            .put(self.student_url(id))
            .json(form)
            .send()
            .await
            .context(RequestSnafu)?;
        let SavedResponse { student, .. } = Self::decode(response).await?;
        Ok(student)
    }

    async fn delete_student(&self, id: Uuid) -> RosterResult<()> {
        let response = self
            .http
            .delete(self.student_url(id))
            .send()
            .await
            .context(RequestSnafu)?;
        let DeletedResponse { .. } = Self::decode(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_the_base() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.students_url(), "http://localhost:8080/students");
        assert_eq!(
            client.student_url(Uuid::nil()),
            "http://localhost:8080/students/00000000-0000-0000-0000-000000000000"
        );
    }
}
