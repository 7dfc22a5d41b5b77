// YouTrack REST client. Blocking and synchronous: every command performs
// at most a couple of requests and waits for each of them.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::Serialize;

use crate::config::Config;
use crate::duration::presentation;
use crate::error::ServiceError;
use crate::issue::{Issue, IssueSchema, ISSUE_FIELDS};
use crate::submit::WorkItem;

/// Remote operations the commands need. `ApiClient` talks to YouTrack;
/// tests substitute an in-memory implementation.
pub trait IssueService {
    /// All issues visible to the token; issues without a state are skipped.
    fn list_issues(&self) -> Result<Vec<Issue>, ServiceError>;

    fn get_issue(&self, id: &str) -> Result<Issue, ServiceError>;

    fn submit_work_item(&self, item: &WorkItem) -> Result<(), ServiceError>;
}

/// Body of `POST /api/issues/{id}/timeTracking/workItems`.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct WorkItemRequest {
    /// Epoch milliseconds.
    pub date: i64,
    pub duration: DurationPresentation,
    pub text: String,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct DurationPresentation {
    pub presentation: String,
}

impl From<&WorkItem> for WorkItemRequest {
    fn from(item: &WorkItem) -> Self {
        WorkItemRequest {
            date: item.date.timestamp_millis(),
            duration: DurationPresentation {
                presentation: presentation(item.duration_secs),
            },
            text: item.description.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config
            .api_endpoint
            .as_deref()
            .context("YOUTRACK_API_ENDPOINT is not set")?;
        let base_url = Url::parse(endpoint)
            .with_context(|| format!("invalid YOUTRACK_API_ENDPOINT {endpoint:?}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("YOUTRACK_API_ENDPOINT {endpoint:?} cannot hold a path");
        }
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Appends path segments to the endpoint. Each segment is
    /// percent-encoded, so an id containing `/` or `?` stays one segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    fn fetch(&self, segments: &[&str]) -> Result<(StatusCode, String), ServiceError> {
        let url = self.url(segments);
        tracing::debug!(%url, "GET");
        let res = self
            .authorized(self.client.get(url))
            .query(&[("fields", ISSUE_FIELDS)])
            .send()?;
        let status = res.status();
        Ok((status, res.text()?))
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), ServiceError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ServiceError::Status {
        status,
        body: body.to_string(),
    })
}

fn issues_response(status: StatusCode, body: &str) -> Result<Vec<Issue>, ServiceError> {
    check_status(status, body)?;
    let raw: Vec<IssueSchema> = serde_json::from_str(body)?;
    let total = raw.len();
    let issues: Vec<Issue> = raw.into_iter().filter_map(IssueSchema::into_issue).collect();
    tracing::debug!(total, kept = issues.len(), "fetched issues");
    Ok(issues)
}

/// 404 and issues without a `State` field are both reported as not found.
fn issue_response(id: &str, status: StatusCode, body: &str) -> Result<Issue, ServiceError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound(id.to_string()));
    }
    check_status(status, body)?;
    let raw: IssueSchema = serde_json::from_str(body)?;
    raw.into_issue()
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
}

impl IssueService for ApiClient {
    fn list_issues(&self) -> Result<Vec<Issue>, ServiceError> {
        let (status, body) = self.fetch(&["api", "issues"])?;
        issues_response(status, &body)
    }

    fn get_issue(&self, id: &str) -> Result<Issue, ServiceError> {
        let (status, body) = self.fetch(&["api", "issues", id])?;
        issue_response(id, status, &body)
    }

    fn submit_work_item(&self, item: &WorkItem) -> Result<(), ServiceError> {
        let url = self.url(&["api", "issues", &item.issue_id, "timeTracking", "workItems"]);
        let body = WorkItemRequest::from(item);
        tracing::debug!(%url, ?body, "POST work item");
        let res = self.authorized(self.client.post(url)).json(&body).send()?;
        let status = res.status();
        check_status(status, &res.text()?)
    }
}
