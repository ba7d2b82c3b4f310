use crate::{Credentials, HostingApi, PagesOutcome, RepoOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;

/// GitHub REST API client authenticated with HTTP basic auth
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    credentials: Credentials,
}

impl GitHubClient {
    /// Create new GitHub API client
    pub fn new(api_base: &str, credentials: Credentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        // GitHub rejects requests without a User-Agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("storefront-kit/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.api_base, path))
            .basic_auth(self.credentials.username(), Some(self.credentials.token()))
            .json(body)
    }
}

/// Map the "create repository" status: 201 created, 422 already exists
fn classify_create(status: StatusCode, body: String) -> RepoOutcome {
    match status.as_u16() {
        201 => RepoOutcome::Created,
        422 => RepoOutcome::AlreadyExists,
        other => RepoOutcome::Unexpected { status: other, body },
    }
}

/// Map the "configure Pages" status: 201 or 204 is success
fn classify_pages(status: StatusCode, body: String) -> PagesOutcome {
    match status.as_u16() {
        201 | 204 => PagesOutcome::Enabled,
        other => PagesOutcome::Unexpected { status: other, body },
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn create_repository(&self, name: &str) -> Result<RepoOutcome> {
        #[derive(Serialize)]
        struct CreateRepoRequest<'a> {
            name: &'a str,
            private: bool,
            has_pages: bool,
        }

        let request = CreateRepoRequest {
            name,
            private: false,
            has_pages: true,
        };

        let response = self
            .post("/user/repos", &request)
            .send()
            .await
            .context("Repository create request failed")?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(classify_create(status, body))
    }

    async fn enable_pages(&self, repository: &str, branch: &str, path: &str) -> Result<PagesOutcome> {
        #[derive(Serialize)]
        struct PagesSource<'a> {
            branch: &'a str,
            path: &'a str,
        }

        #[derive(Serialize)]
        struct PagesRequest<'a> {
            source: PagesSource<'a>,
        }

        let request = PagesRequest {
            source: PagesSource { branch, path },
        };
        let endpoint = format!(
            "/repos/{}/{}/pages",
            self.credentials.username(),
            repository
        );

        let response = self
            .post(&endpoint, &request)
            .send()
            .await
            .context("Pages configuration request failed")?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(classify_pages(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::HeaderMap as AxumHeaders;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorded {
        requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn auth_header(headers: &AxumHeaders) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn fake_github(create_status: u16, pages_status: u16, recorded: Recorded) -> Router {
        Router::new()
            .route(
                "/user/repos",
                post(
                    move |State(rec): State<Recorded>, headers: AxumHeaders, Json(body): Json<Value>| async move {
                        rec.requests.lock().unwrap().push((
                            "/user/repos".to_string(),
                            auth_header(&headers),
                            body,
                        ));
                        (
                            axum::http::StatusCode::from_u16(create_status).unwrap(),
                            r#"{"message":"from fake"}"#,
                        )
                    },
                ),
            )
            .route(
                "/repos/{owner}/{repo}/pages",
                post(
                    move |State(rec): State<Recorded>,
                          Path((owner, repo)): Path<(String, String)>,
                          headers: AxumHeaders,
                          Json(body): Json<Value>| async move {
                        rec.requests.lock().unwrap().push((
                            format!("/repos/{owner}/{repo}/pages"),
                            auth_header(&headers),
                            body,
                        ));
                        let body = if pages_status == 204 { "" } else { "pages said no" };
                        (axum::http::StatusCode::from_u16(pages_status).unwrap(), body)
                    },
                ),
            )
            .with_state(recorded)
    }

    fn creds() -> Credentials {
        Credentials::from_input("octocat", "ghp_secret").unwrap()
    }

    #[test]
    fn test_classify_create() {
        assert_eq!(classify_create(StatusCode::CREATED, String::new()), RepoOutcome::Created);
        assert_eq!(
            classify_create(StatusCode::UNPROCESSABLE_ENTITY, String::new()),
            RepoOutcome::AlreadyExists
        );
        assert_eq!(
            classify_create(StatusCode::UNAUTHORIZED, "Bad credentials".to_string()),
            RepoOutcome::Unexpected { status: 401, body: "Bad credentials".to_string() }
        );
    }

    #[test]
    fn test_classify_pages() {
        assert_eq!(classify_pages(StatusCode::CREATED, String::new()), PagesOutcome::Enabled);
        assert_eq!(classify_pages(StatusCode::NO_CONTENT, String::new()), PagesOutcome::Enabled);
        assert!(matches!(
            classify_pages(StatusCode::CONFLICT, String::new()),
            PagesOutcome::Unexpected { status: 409, .. }
        ));
    }

    #[tokio::test]
    async fn test_create_repository_sends_expected_request() {
        let recorded = Recorded::default();
        let base = spawn(fake_github(201, 201, recorded.clone())).await;
        let client = GitHubClient::new(&base, creds()).unwrap();

        let outcome = client.create_repository("alforsa").await.unwrap();
        assert_eq!(outcome, RepoOutcome::Created);

        let requests = recorded.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (path, auth, body) = &requests[0];
        assert_eq!(path, "/user/repos");
        assert!(auth.as_deref().unwrap().starts_with("Basic "));
        assert_eq!(body["name"], "alforsa");
        assert_eq!(body["private"], false);
        assert_eq!(body["has_pages"], true);
    }

    #[tokio::test]
    async fn test_create_repository_already_exists() {
        let base = spawn(fake_github(422, 201, Recorded::default())).await;
        let client = GitHubClient::new(&base, creds()).unwrap();
        assert_eq!(
            client.create_repository("alforsa").await.unwrap(),
            RepoOutcome::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_create_repository_unexpected_status_keeps_body() {
        let base = spawn(fake_github(500, 201, Recorded::default())).await;
        let client = GitHubClient::new(&base, creds()).unwrap();
        assert_eq!(
            client.create_repository("alforsa").await.unwrap(),
            RepoOutcome::Unexpected {
                status: 500,
                body: r#"{"message":"from fake"}"#.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_enable_pages_request_and_outcomes() {
        let recorded = Recorded::default();
        let base = spawn(fake_github(201, 204, recorded.clone())).await;
        let client = GitHubClient::new(&format!("{base}/"), creds()).unwrap();

        let outcome = client.enable_pages("alforsa", "master", "/").await.unwrap();
        assert_eq!(outcome, PagesOutcome::Enabled);

        let requests = recorded.requests.lock().unwrap();
        let (path, _, body) = &requests[0];
        assert_eq!(path, "/repos/octocat/alforsa/pages");
        assert_eq!(body["source"]["branch"], "master");
        assert_eq!(body["source"]["path"], "/");
        drop(requests);

        let base = spawn(fake_github(201, 409, Recorded::default())).await;
        let client = GitHubClient::new(&base, creds()).unwrap();
        assert_eq!(
            client.enable_pages("alforsa", "master", "/").await.unwrap(),
            PagesOutcome::Unexpected { status: 409, body: "pages said no".to_string() }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        // Bind then drop a listener so the port is closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GitHubClient::new(&format!("http://{}", addr), creds()).unwrap();
        assert!(client.create_repository("alforsa").await.is_err());
    }
}
