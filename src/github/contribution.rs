use crate::model::{ContributionTotals, DateRange, Member, MetricsError, ReportMode, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const GITHUB_API_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("contribution-metrics/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SUMMARY_QUERY: &str = "\
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
      }
    }
  }
}";

const DETAILED_QUERY: &str = "\
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      totalIssueContributions
      totalPullRequestContributions
      totalPullRequestReviewContributions
      totalRepositoryContributions
      restrictedContributionsCount
    }
  }
}";

pub fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("http client")
}

pub type WindowProgress<'a> = Box<dyn FnMut(usize, usize) + Send + 'a>;

pub trait ContributionFetcher {
    async fn fetch_contributions<'a>(
        &self,
        client: &Client,
        token: &str,
        range: &DateRange,
        mode: ReportMode,
        cb: WindowProgress<'a>,
    ) -> Result<ContributionTotals>;
}

impl ContributionFetcher for Member {
    async fn fetch_contributions<'a>(
        &self,
        client: &Client,
        token: &str,
        range: &DateRange,
        mode: ReportMode,
        mut cb: WindowProgress<'a>,
    ) -> Result<ContributionTotals> {
        let windows = range.windows();
        let mut totals = ContributionTotals::default();
        for (index, (since, until)) in windows.iter().enumerate() {
            cb(index + 1, windows.len());
            let collection =
                query_window(client, token, &self.login, mode, since, until).await?;
            totals = totals.merge(collection.into_totals(&self.login, mode)?);
        }
        Ok(totals)
    }
}

async fn query_window(
    client: &Client,
    token: &str,
    login: &str,
    mode: ReportMode,
    since: &DateTime<Utc>,
    until: &DateTime<Utc>,
) -> Result<ContributionsCollection> {
    let query = match mode {
        ReportMode::Summary => SUMMARY_QUERY,
        ReportMode::Detailed => DETAILED_QUERY,
    };
    let body = json!({
        "query": query,
        "variables": {
            "login": login,
            "from": since.to_rfc3339_opts(SecondsFormat::Secs, true),
            "to": until.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
    });

    let response = client
        .post(GITHUB_API_URL)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .map_err(|err| MetricsError::remote(login, None, err))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(MetricsError::Authorization {
            login: login.to_string(),
        });
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = match text.trim() {
            "" => status.canonical_reason().unwrap_or("request failed").to_string(),
            body => body.to_string(),
        };
        return Err(MetricsError::remote(login, Some(status.as_u16()), message));
    }

    let payload = response
        .json::<GraphqlResponse>()
        .await
        .map_err(|err| MetricsError::remote(login, None, err))?;
    collection_from_response(login, payload)
}

// GraphQL reports query-level failures with HTTP 200 and an `errors` array.
fn collection_from_response(
    login: &str,
    response: GraphqlResponse,
) -> Result<ContributionsCollection> {
    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        return Err(graphql_error(login, &errors));
    }
    let Some(data) = response.data else {
        return Err(MetricsError::remote(login, None, "response carried no data"));
    };
    let Some(user) = data.user else {
        return Err(MetricsError::UserNotFound {
            login: login.to_string(),
        });
    };
    Ok(user.contributions_collection)
}

fn graphql_error(login: &str, errors: &[GraphqlError]) -> MetricsError {
    for error in errors {
        match error.kind.as_deref() {
            Some("NOT_FOUND") => {
                return MetricsError::UserNotFound {
                    login: login.to_string(),
                }
            }
            Some("FORBIDDEN") | Some("INSUFFICIENT_SCOPES") => {
                return MetricsError::Authorization {
                    login: login.to_string(),
                }
            }
            _ => {}
        }
    }
    let message = errors.iter().map(|error| error.message.as_str()).join("; ");
    MetricsError::remote(login, None, message)
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    total_commit_contributions: Option<u64>,
    total_issue_contributions: Option<u64>,
    total_pull_request_contributions: Option<u64>,
    total_pull_request_review_contributions: Option<u64>,
    total_repository_contributions: Option<u64>,
    restricted_contributions_count: Option<u64>,
    contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionCalendar {
    total_contributions: u64,
}

impl ContributionsCollection {
    fn into_totals(self, login: &str, mode: ReportMode) -> Result<ContributionTotals> {
        let missing =
            |field: &str| MetricsError::remote(login, None, format!("response misses `{field}`"));
        match mode {
            ReportMode::Summary => {
                let Some(calendar) = self.contribution_calendar else {
                    return Err(missing("contributionCalendar"));
                };
                Ok(ContributionTotals::summary(calendar.total_contributions))
            }
            ReportMode::Detailed => {
                let (
                    Some(commits),
                    Some(issues),
                    Some(pull_requests),
                    Some(pull_request_reviews),
                    Some(repositories),
                    Some(restricted),
                ) = (
                    self.total_commit_contributions,
                    self.total_issue_contributions,
                    self.total_pull_request_contributions,
                    self.total_pull_request_review_contributions,
                    self.total_repository_contributions,
                    self.restricted_contributions_count,
                )
                else {
                    return Err(missing("contribution category counts"));
                };
                Ok(ContributionTotals::detailed(
                    commits,
                    issues,
                    pull_requests,
                    pull_request_reviews,
                    repositories,
                    restricted,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json};

    fn response(value: serde_json::Value) -> GraphqlResponse {
        from_value(value).unwrap()
    }

    #[test]
    fn test_summary_response_decodes_calendar_total() {
        let payload = response(json!({
            "data": {
                "user": {
                    "contributionsCollection": {
                        "contributionCalendar": { "totalContributions": 232 }
                    }
                }
            }
        }));
        let totals = collection_from_response("abc", payload)
            .unwrap()
            .into_totals("abc", ReportMode::Summary)
            .unwrap();
        assert_eq!(totals, ContributionTotals::summary(232));
    }

    #[test]
    fn test_detailed_response_decodes_categories() {
        let payload = response(json!({
            "data": {
                "user": {
                    "contributionsCollection": {
                        "totalCommitContributions": 101,
                        "totalIssueContributions": 0,
                        "totalPullRequestContributions": 83,
                        "totalPullRequestReviewContributions": 48,
                        "totalRepositoryContributions": 0,
                        "restrictedContributionsCount": 0
                    }
                }
            }
        }));
        let totals = collection_from_response("abc", payload)
            .unwrap()
            .into_totals("abc", ReportMode::Detailed)
            .unwrap();
        assert_eq!(totals.total, 232);
        assert_eq!(totals.commits, 101);
        assert_eq!(totals.pull_requests, 83);
        assert_eq!(totals.pull_request_reviews, 48);
    }

    #[test]
    fn test_zero_activity_user_yields_zero_totals() {
        let payload = response(json!({
            "data": {
                "user": {
                    "contributionsCollection": {
                        "contributionCalendar": { "totalContributions": 0 }
                    }
                }
            }
        }));
        let totals = collection_from_response("idle", payload)
            .unwrap()
            .into_totals("idle", ReportMode::Summary)
            .unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn test_null_user_is_user_not_found() {
        let payload = response(json!({ "data": { "user": null } }));
        let result = collection_from_response("ghost", payload);
        assert!(matches!(
            result,
            Err(MetricsError::UserNotFound { login }) if login == "ghost"
        ));
    }

    #[test]
    fn test_not_found_error_is_user_not_found() {
        let payload = response(json!({
            "data": null,
            "errors": [{
                "message": "Could not resolve to a User with the login of 'ghost'.",
                "type": "NOT_FOUND"
            }]
        }));
        let result = collection_from_response("ghost", payload);
        assert!(matches!(result, Err(MetricsError::UserNotFound { .. })));
    }

    #[test]
    fn test_forbidden_error_is_authorization() {
        for kind in ["FORBIDDEN", "INSUFFICIENT_SCOPES"] {
            let payload = response(json!({
                "data": null,
                "errors": [{ "message": "says no", "type": kind }]
            }));
            let result = collection_from_response("abc", payload);
            assert!(matches!(
                result,
                Err(MetricsError::Authorization { login }) if login == "abc"
            ));
        }
    }

    #[test]
    fn test_other_graphql_errors_join_into_remote() {
        let payload = response(json!({
            "data": null,
            "errors": [
                { "message": "first" },
                { "message": "second", "type": "SOMETHING_ELSE" }
            ]
        }));
        let error = collection_from_response("abc", payload).unwrap_err();
        assert!(matches!(error, MetricsError::Remote { .. }));
        assert!(error.to_string().contains("first; second"));
    }

    #[test]
    fn test_missing_data_is_remote() {
        let payload = response(json!({}));
        let result = collection_from_response("abc", payload);
        assert!(matches!(result, Err(MetricsError::Remote { .. })));
    }

    #[test]
    fn test_summary_collection_rejected_in_detailed_mode() {
        let payload = response(json!({
            "data": {
                "user": {
                    "contributionsCollection": {
                        "contributionCalendar": { "totalContributions": 7 }
                    }
                }
            }
        }));
        let result = collection_from_response("abc", payload)
            .unwrap()
            .into_totals("abc", ReportMode::Detailed);
        assert!(matches!(result, Err(MetricsError::Remote { .. })));
    }
}
