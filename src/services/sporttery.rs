//! China Sports Lottery (sporttery.cn) public match list.
//!
//! No credentials and no rate limit; requests carry browser headers and their own timeout.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::SourceError;
use crate::models::sporttery::SportteryMatchRecord;

const MATCH_LIST_PATH: &str = "/gateway/uniform/football/getMatchListV1.qry";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const SITE_ORIGIN: &str = "https://www.sporttery.cn";

#[derive(Clone)]
pub struct SportteryService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SportteryItem {
    pub match_num_str: Option<String>,
    pub week: Option<Value>,
    pub num: Option<Value>,
    pub match_id: Option<Value>,
    pub match_date: Option<String>,
    pub match_time: Option<String>,
    pub home_team_abb_name: Option<String>,
    pub away_team_abb_name: Option<String>,
    pub league_abb_name: Option<String>,
    pub home_score: Option<Value>,
    pub away_score: Option<Value>,
    pub half_score: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MatchGroup {
    business_date: Option<String>,
    sub_match_list: Option<Vec<SportteryItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MatchListValue {
    match_info_list: Option<Vec<MatchGroup>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MatchListResponse {
    success: bool,
    error_code: Option<Value>,
    error_message: Option<String>,
    value: Option<MatchListValue>,
}

impl MatchListResponse {
    fn accepted(&self) -> bool {
        if self.success {
            return true;
        }
        match &self.error_code {
            Some(Value::String(code)) => code == "0",
            Some(Value::Number(code)) => code.as_i64() == Some(0),
            _ => false,
        }
    }
}

impl SportteryService {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the current list of lottery fixtures, flattened across date groups.
    pub async fn get_matches(&self) -> Result<Vec<SportteryMatchRecord>, SourceError> {
        let url = format!("{}{}", self.base_url, MATCH_LIST_PATH);
        tracing::info!("Requesting sporttery match list");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json, text/plain, */*")
            .header("Referer", format!("{}/", SITE_ORIGIN))
            .header("Origin", SITE_ORIGIN)
            .query(&[("clientCode", "3001")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Sporttery returned {}: {}", status, body);
            return Err(SourceError::Status { status, body });
        }

        let body = response.bytes().await?;
        let payload: MatchListResponse = serde_json::from_slice(&body)?;

        if !payload.accepted() {
            let reason = payload
                .error_message
                .clone()
                .unwrap_or_else(|| format!("errorCode {:?}", payload.error_code));
            tracing::error!("Sporttery rejected request: {}", reason);
            return Err(SourceError::Rejected(reason));
        }

        let mut matches = Vec::new();
        for group in payload
            .value
            .and_then(|v| v.match_info_list)
            .unwrap_or_default()
        {
            for item in group.sub_match_list.unwrap_or_default() {
                match SportteryMatchRecord::from_api(&item, group.business_date.as_deref()) {
                    Some(record) => matches.push(record),
                    None => tracing::warn!("Skipping unparseable sporttery entry: {:?}", item),
                }
            }
        }

        tracing::info!("Fetched {} sporttery matches", matches.len());
        Ok(matches)
    }
}
