//! Asynchronous client for the WealthSync budgeting service.
//!
//! - Three endpoints: city list, budget submission, budget history.
//! - Every call goes through [`retry::attempt`] with its own policy; the
//!   request timeout applies to each attempt, not to the whole sequence.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{BudgetRequest, BudgetResult, City, ExpenseCategories, HistoryEntry};
use crate::infra::retry::{self, CallOutcome, RetryPolicy};
use crate::util::config::AppConfig;

pub const DEFAULT_BASE_URL: &str = "https://wealthsync-backend2.onrender.com/api/";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// The city list is fetched while the backend may still be cold, so it
/// gets more attempts and a longer pause than the other calls.
pub const CITY_RETRY: RetryPolicy = RetryPolicy::new(5, Duration::from_secs(10));
const USER_AGENT: &str = concat!("wealthsync-planner/", env!("CARGO_PKG_VERSION"));

pub const LIST_CITIES: &str = "list_cities";
pub const SUBMIT_BUDGET: &str = "submit_budget";
pub const FETCH_HISTORY: &str = "fetch_history";

/// Failure of a single attempt. Never leaves this module on its own.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    ExhaustedRetries {
        operation: &'static str,
        attempts: u32,
        source: TransportError,
    },
    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },
}

impl RemoteCallError {
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteCallError::ExhaustedRetries { operation, .. }
            | RemoteCallError::Cancelled { operation } => operation,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RemoteCallError::Cancelled { .. })
    }
}

/// Remote operations the session controller depends on.
#[async_trait]
pub trait BudgetService: Send + Sync {
    async fn list_cities(&self, cancel: &CancellationToken) -> Result<Vec<City>, RemoteCallError>;

    async fn submit_budget(
        &self,
        request: &BudgetRequest,
        cancel: &CancellationToken,
    ) -> Result<BudgetResult, RemoteCallError>;

    async fn fetch_history(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<HistoryEntry>, RemoteCallError>;
}

#[derive(Clone, Debug)]
struct Endpoints {
    cities: Url,
    budget: Url,
    history: Url,
}

impl Endpoints {
    fn resolve(base: &str) -> Result<Self, url::ParseError> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;
        Ok(Self {
            cities: base.join("cities")?,
            budget: base.join("budget")?,
            history: base.join("budget/history")?,
        })
    }
}

#[derive(Clone)]
pub struct BudgetServiceClient {
    http: Client,
    endpoints: Endpoints,
    timeout: Duration,
    city_policy: RetryPolicy,
    default_policy: RetryPolicy,
}

impl BudgetServiceClient {
    pub fn with_base_url(base: &str) -> Result<Self, TransportError> {
        let endpoints = Endpoints::resolve(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            endpoints,
            timeout: REQUEST_TIMEOUT,
            city_policy: CITY_RETRY,
            default_policy: RetryPolicy::default(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        Ok(Self::with_base_url(&config.api_base_url)?
            .with_timeout(config.request_timeout())
            .with_policies(config.city_retry.policy(), config.default_retry.policy()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_policies(mut self, city_policy: RetryPolicy, default_policy: RetryPolicy) -> Self {
        self.city_policy = city_policy;
        self.default_policy = default_policy;
        self
    }

    async fn call<T, F, Fut>(
        &self,
        operation: &'static str,
        policy: RetryPolicy,
        cancel: &CancellationToken,
        request: F,
    ) -> Result<T, RemoteCallError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        match retry::attempt(operation, policy, cancel, request).await {
            CallOutcome::Success(value) => Ok(value),
            CallOutcome::Failure { attempts, error } => Err(RemoteCallError::ExhaustedRetries {
                operation,
                attempts,
                source: error,
            }),
            CallOutcome::Cancelled => Err(RemoteCallError::Cancelled { operation }),
        }
    }

    async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let response = builder
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl BudgetService for BudgetServiceClient {
    async fn list_cities(&self, cancel: &CancellationToken) -> Result<Vec<City>, RemoteCallError> {
        debug!(url = %self.endpoints.cities, "Requesting city list");
        let cities = self
            .call(LIST_CITIES, self.city_policy, cancel, move || {
                self.send_json::<Vec<CityDto>>(self.http.get(self.endpoints.cities.clone()))
            })
            .await?;
        info!(count = cities.len(), "Loaded city list");
        Ok(cities.into_iter().map(City::from).collect())
    }

    async fn submit_budget(
        &self,
        request: &BudgetRequest,
        cancel: &CancellationToken,
    ) -> Result<BudgetResult, RemoteCallError> {
        debug!(url = %self.endpoints.budget, location = %request.location, "Submitting budget");
        let result = self
            .call(SUBMIT_BUDGET, self.default_policy, cancel, move || {
                self.send_json::<BudgetResultDto>(
                    self.http.post(self.endpoints.budget.clone()).json(request),
                )
            })
            .await?;
        Ok(result.into())
    }

    async fn fetch_history(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<HistoryEntry>, RemoteCallError> {
        let body = &HistoryQuery { email };
        let entries = self
            .call(FETCH_HISTORY, self.default_policy, cancel, move || {
                self.send_json::<Vec<HistoryEntryDto>>(
                    self.http.post(self.endpoints.history.clone()).json(body),
                )
            })
            .await?;
        info!(count = entries.len(), "Loaded budget history");
        Ok(entries.into_iter().map(HistoryEntry::from).collect())
    }
}

#[derive(Serialize)]
struct HistoryQuery<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct CityDto {
    name: String,
    #[serde(default, deserialize_with = "string_from_json")]
    state: String,
}

impl From<CityDto> for City {
    fn from(dto: CityDto) -> Self {
        Self {
            name: dto.name,
            state: dto.state,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExpenseCategoriesDto {
    #[serde(default, deserialize_with = "lenient_f64")]
    physiological: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    safety: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    social: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    esteem: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    self_actualization: f64,
}

impl From<ExpenseCategoriesDto> for ExpenseCategories {
    fn from(dto: ExpenseCategoriesDto) -> Self {
        Self {
            physiological: dto.physiological,
            safety: dto.safety,
            social: dto.social,
            esteem: dto.esteem,
            self_actualization: dto.self_actualization,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BudgetResultDto {
    #[serde(default, deserialize_with = "lenient_f64")]
    savings: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    adjusted_savings: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    recommended_savings: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    inflation: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    cost_of_living_index: f64,
    #[serde(default, deserialize_with = "string_from_json")]
    message: String,
    #[serde(default)]
    recommendations: Option<Vec<String>>,
    #[serde(default)]
    expense_categories: Option<ExpenseCategoriesDto>,
}

impl From<BudgetResultDto> for BudgetResult {
    fn from(dto: BudgetResultDto) -> Self {
        Self {
            savings: dto.savings,
            adjusted_savings: dto.adjusted_savings,
            recommended_savings: dto.recommended_savings,
            inflation: dto.inflation,
            cost_of_living_index: dto.cost_of_living_index,
            message: dto.message,
            recommendations: dto.recommendations.unwrap_or_default(),
            expense_categories: dto.expense_categories.unwrap_or_default().into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryEntryDto {
    #[serde(default, deserialize_with = "string_from_json")]
    id: String,
    #[serde(default, rename = "_id", deserialize_with = "string_from_json")]
    document_id: String,
    #[serde(default, deserialize_with = "string_from_json")]
    timestamp: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    income: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    expenses: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    savings: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    recommended_savings: f64,
    #[serde(default, deserialize_with = "string_from_json")]
    message: String,
}

impl From<HistoryEntryDto> for HistoryEntry {
    fn from(dto: HistoryEntryDto) -> Self {
        let id = if dto.id.is_empty() { dto.document_id } else { dto.id };
        Self {
            id,
            timestamp: dto.timestamp,
            income: dto.income,
            expenses: dto.expenses,
            savings: dto.savings,
            recommended_savings: dto.recommended_savings,
            message: dto.message,
        }
    }
}

/// Numbers may arrive as JSON numbers, numeric strings or null. Anything
/// unreadable becomes zero.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct LenientNumber;

    impl<'de> serde::de::Visitor<'de> for LenientNumber {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a number, numeric string or null")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0.0)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(LenientNumber)
}

fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
