// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backlog activity feed client.
//!
//! Translates the upstream wire shape (numeric type codes, RFC3339 strings)
//! into [`ActivityItem`]s. Also owns the fixed mock feed used when the
//! upstream is unavailable.

use crate::error::AppError;
use crate::models::{ActivityItem, CreatedUser};
use crate::services::read_json;
use crate::time_utils::parse_rfc3339_or_zero;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::borrow::Cow;

/// Labels for Backlog activity type codes 1..=26, indexed by `code - 1`.
const ACTIVITY_TYPE_LABELS: [&str; 26] = [
    "Issue Created",
    "Issue Updated",
    "Issue Commented",
    "Issue Deleted",
    "Wiki Created",
    "Wiki Updated",
    "Wiki Deleted",
    "File Added",
    "File Updated",
    "File Deleted",
    "SVN Committed",
    "Git Pushed",
    "Git Repository Created",
    "Issues Bulk Updated",
    "User Joined Project",
    "User Left Project",
    "Comment Notification Added",
    "Pull Request Added",
    "Pull Request Updated",
    "Pull Request Commented",
    "Pull Request Deleted",
    "Milestone Added",
    "Milestone Updated",
    "Milestone Deleted",
    "Group Joined Project",
    "Group Left Project",
];

/// Human-readable label for an activity type code.
///
/// Unknown codes render as `category(<code>)`.
pub fn activity_type_label(code: i64) -> Cow<'static, str> {
    usize::try_from(code)
        .ok()
        .and_then(|c| c.checked_sub(1))
        .and_then(|i| ACTIVITY_TYPE_LABELS.get(i))
        .map(|label| Cow::Borrowed(*label))
        .unwrap_or_else(|| Cow::Owned(format!("category({})", code)))
}

/// Backlog activity API client.
#[derive(Clone)]
pub struct ActivityClient {
    http: reqwest::Client,
    base_url: String,
}

impl ActivityClient {
    pub fn new(http: reqwest::Client, space_url: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/api/v2", space_url.trim_end_matches('/')),
        }
    }

    /// Fetch the most recent `limit` activities of the space, newest first.
    pub async fn fetch_activities(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<ActivityItem>, AppError> {
        let url = format!("{}/space/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("count", limit.to_string())])
            .send()
            .await
            .map_err(|e| AppError::BacklogApi(e.to_string()))?;

        let activities: Vec<BacklogActivity> = read_json(response, AppError::BacklogApi).await?;
        Ok(activities.into_iter().map(ActivityItem::from).collect())
    }

    /// Fetch activities and keep those matching `keyword`.
    ///
    /// An empty keyword returns the feed unfiltered.
    pub async fn search_activities(
        &self,
        access_token: &str,
        keyword: &str,
        limit: u32,
    ) -> Result<Vec<ActivityItem>, AppError> {
        let activities = self.fetch_activities(access_token, limit).await?;
        if keyword.is_empty() {
            return Ok(activities);
        }
        Ok(activities
            .into_iter()
            .filter(|a| a.matches_keyword(keyword))
            .collect())
    }
}

// ─── Wire Shapes ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BacklogActivity {
    id: u64,
    #[serde(default)]
    project: Option<BacklogProject>,
    #[serde(rename = "type")]
    kind: i64,
    #[serde(default)]
    content: Option<BacklogContent>,
    #[serde(default)]
    created_user: Option<BacklogUserRef>,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct BacklogProject {
    id: u64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BacklogContent {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct BacklogUserRef {
    id: u64,
    #[serde(default)]
    name: String,
}

impl From<BacklogActivity> for ActivityItem {
    fn from(a: BacklogActivity) -> Self {
        let (project_id, project_name) = a
            .project
            .map(|p| (p.id.to_string(), p.name))
            .unwrap_or_default();
        let created_user = a
            .created_user
            .map(|u| CreatedUser {
                id: u.id.to_string(),
                name: u.name,
            })
            .unwrap_or(CreatedUser {
                id: String::new(),
                name: String::new(),
            });

        Self {
            id: a.id.to_string(),
            project_id,
            project_name,
            kind: activity_type_label(a.kind).into_owned(),
            content_summary: a.content.and_then(|c| c.summary).unwrap_or_default(),
            created_user,
            created: parse_rfc3339_or_zero(a.created.as_deref()),
        }
    }
}

// ─── Mock Feed ───────────────────────────────────────────────

// 2025-01-06T09:00:00Z; each mock item is one day after the previous one.
const MOCK_BASE_TIMESTAMP: i64 = 1_736_154_000;
const SECS_PER_DAY: i64 = 86_400;

fn mock_entry(
    id: u8,
    project: (&str, &str),
    kind: &str,
    summary: &str,
    user: (&str, &str),
) -> ActivityItem {
    let offset = SECS_PER_DAY * i64::from(id.saturating_sub(1));
    ActivityItem {
        id: id.to_string(),
        project_id: project.0.to_string(),
        project_name: project.1.to_string(),
        kind: kind.to_string(),
        content_summary: summary.to_string(),
        created_user: CreatedUser {
            id: user.0.to_string(),
            name: user.1.to_string(),
        },
        created: DateTime::<Utc>::from_timestamp(MOCK_BASE_TIMESTAMP + offset, 0)
            .unwrap_or_default(),
    }
}

/// The fixed feed served when the upstream cannot be reached.
pub fn mock_activity_items() -> Vec<ActivityItem> {
    vec![
        mock_entry(1, ("1", "Project A"), "Issue Created", "Implement login", ("1", "Taro Yamada")),
        mock_entry(2, ("1", "Project A"), "Issue Updated", "Add search", ("2", "Hanako Sato")),
        mock_entry(3, ("2", "Project B"), "Wiki Updated", "Design document", ("3", "Ichiro Suzuki")),
        mock_entry(4, ("2", "Project B"), "Git Pushed", "Bug fix commit", ("4", "Jiro Tanaka")),
        mock_entry(
            5,
            ("3", "Project C"),
            "Issue Created",
            "Improve UI design",
            ("5", "Saburo Takahashi"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed() -> serde_json::Value {
        serde_json::json!([
            {
                "id": 3001,
                "project": { "id": 10, "projectKey": "WEB", "name": "Website" },
                "type": 1,
                "content": { "id": 1, "key_id": 5, "summary": "Fix login redirect" },
                "createdUser": { "id": 7, "userId": "hanako", "name": "Hanako" },
                "created": "2025-02-01T10:00:00Z"
            },
            {
                "id": 3000,
                "project": { "id": 11, "name": "Mobile" },
                "type": 99,
                "content": {},
                "createdUser": { "id": 8, "name": "Taro" },
                "created": "01/02/2025"
            }
        ])
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(activity_type_label(1), "Issue Created");
        assert_eq!(activity_type_label(12), "Git Pushed");
        assert_eq!(activity_type_label(26), "Group Left Project");
        assert_eq!(activity_type_label(0), "category(0)");
        assert_eq!(activity_type_label(27), "category(27)");
        assert_eq!(activity_type_label(-3), "category(-3)");
    }

    #[test]
    fn test_mock_feed_is_fixed() {
        let items = mock_activity_items();
        assert_eq!(items.len(), 5);
        assert_eq!(items, mock_activity_items());
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert!(items.windows(2).all(|w| w[0].created < w[1].created));
    }

    #[tokio::test]
    async fn test_fetch_decodes_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/space/activities"))
            .and(query_param("count", "20"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ActivityClient::new(reqwest::Client::new(), &server.uri());
        let items = client.fetch_activities("tok", 20).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "3001");
        assert_eq!(items[0].project_id, "10");
        assert_eq!(items[0].kind, "Issue Created");
        assert_eq!(items[0].content_summary, "Fix login redirect");
        assert_eq!(items[0].created_user.name, "Hanako");

        // Unknown type and bad timestamp degrade per field
        assert_eq!(items[1].kind, "category(99)");
        assert_eq!(items[1].content_summary, "");
        assert_eq!(items[1].created, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn test_search_filters_by_keyword() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(feed()))
            .mount(&server)
            .await;

        let client = ActivityClient::new(reqwest::Client::new(), &server.uri());

        let all = client.search_activities("tok", "", 100).await.unwrap();
        assert_eq!(all.len(), 2);

        let taro = client.search_activities("tok", "Taro", 100).await.unwrap();
        assert_eq!(taro.len(), 1);
        assert_eq!(taro[0].id, "3000");

        let labels = client.search_activities("tok", "category", 100).await.unwrap();
        assert_eq!(labels.len(), 1);

        let none = client.search_activities("tok", "taro", 100).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ActivityClient::new(reqwest::Client::new(), &server.uri());
        let err = client.fetch_activities("tok", 10).await.unwrap_err();
        assert!(matches!(err, AppError::BacklogApi(_)));
    }
}
