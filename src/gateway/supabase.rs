use super::{Collection, DataGateway, Failure, Filter, GatewayResult, Query, Row, value_text};
use crate::{
    http_client::{backend_client, handle_http_response, transport_failure},
    types::{AuthSession, User, unix_now},
};
use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Gateway backed by a hosted Supabase project (PostgREST + GoTrue).
#[derive(Clone)]
pub struct SupabaseGateway {
    client: Client,
    url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    expires_at: Option<u64>,
    user: User,
}

impl SupabaseGateway {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!url.trim().is_empty(), "failed to create gateway: empty url");
        anyhow::ensure!(
            !anon_key.trim().is_empty(),
            "failed to create gateway: empty anon key"
        );

        Ok(Self {
            client: backend_client(timeout).context("failed to create supabase gateway")?,
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
        })
    }

    fn rest_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.url, collection.as_str())
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str, access_token: Option<&str>) -> RequestBuilder {
        debug!("{method} {url}");

        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    async fn send(&self, request: RequestBuilder, context_msg: &str) -> GatewayResult<String> {
        let res = request
            .send()
            .await
            .map_err(|e| transport_failure(context_msg, e))?;

        handle_http_response(res, context_msg).await
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str, context_msg: &str) -> GatewayResult<T> {
        serde_json::from_str(body)
            .map_err(|e| Failure::new(format!("{context_msg} returned unexpected data: {e}")))
    }

    /// Translate filters into PostgREST query parameters
    fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|filter| match filter {
                Filter::Eq { column, value } => (column.clone(), format!("eq.{}", value_text(value))),
                Filter::In { column, values } => {
                    let values = values
                        .iter()
                        .map(|value| quote_list_item(&value_text(value)))
                        .collect::<Vec<_>>()
                        .join(",");
                    (column.clone(), format!("in.({values})"))
                }
            })
            .collect()
    }

    fn ensure_matcher(matcher: &[Filter], context_msg: &str) -> GatewayResult<()> {
        if matcher.is_empty() {
            return Err(Failure::new(format!(
                "{context_msg} refused: no filter given"
            )));
        }

        Ok(())
    }
}

/// Quote a value for a PostgREST `in.(...)` list when it contains reserved characters
fn quote_list_item(value: &str) -> String {
    if value
        .chars()
        .any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\') || c.is_whitespace())
    {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

impl DataGateway for SupabaseGateway {
    async fn select(&self, access_token: Option<String>, query: Query) -> GatewayResult<Vec<Row>> {
        let context_msg = format!("select {}", query.collection.as_str());

        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(Self::filter_params(&query.filters));
        if let Some(ordering) = &query.ordering {
            let direction = if ordering.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{direction}", ordering.column)));
        }

        let request = self
            .request(
                Method::GET,
                &self.rest_url(query.collection),
                access_token.as_deref(),
            )
            .query(&params);

        let body = self.send(request, &context_msg).await?;
        Self::parse(&body, &context_msg)
    }

    async fn insert(
        &self,
        access_token: Option<String>,
        collection: Collection,
        record: Row,
    ) -> GatewayResult<Row> {
        let context_msg = format!("insert into {}", collection.as_str());

        let request = self
            .request(
                Method::POST,
                &self.rest_url(collection),
                access_token.as_deref(),
            )
            .header("Prefer", "return=representation")
            .json(&[record]);

        let body = self.send(request, &context_msg).await?;
        let rows: Vec<Row> = Self::parse(&body, &context_msg)?;

        rows.into_iter()
            .next()
            .ok_or_else(|| Failure::new(format!("{context_msg} returned no row")))
    }

    async fn update(
        &self,
        access_token: Option<String>,
        collection: Collection,
        matcher: Vec<Filter>,
        patch: Row,
    ) -> GatewayResult<()> {
        let context_msg = format!("update {}", collection.as_str());
        Self::ensure_matcher(&matcher, &context_msg)?;

        let request = self
            .request(
                Method::PATCH,
                &self.rest_url(collection),
                access_token.as_deref(),
            )
            .header("Prefer", "return=minimal")
            .query(&Self::filter_params(&matcher))
            .json(&patch);

        self.send(request, &context_msg).await.map(|_| ())
    }

    async fn delete(
        &self,
        access_token: Option<String>,
        collection: Collection,
        matcher: Vec<Filter>,
    ) -> GatewayResult<()> {
        let context_msg = format!("delete from {}", collection.as_str());
        Self::ensure_matcher(&matcher, &context_msg)?;

        let request = self
            .request(
                Method::DELETE,
                &self.rest_url(collection),
                access_token.as_deref(),
            )
            .query(&Self::filter_params(&matcher));

        self.send(request, &context_msg).await.map(|_| ())
    }

    async fn sign_in(&self, email: String, password: String) -> GatewayResult<AuthSession> {
        let context_msg = "sign in";

        let request = self
            .request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let body = self.send(request, context_msg).await?;
        let token: TokenResponse = Self::parse(&body, context_msg)?;

        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|expires_in| unix_now() + expires_in));

        Ok(AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user,
        })
    }

    async fn sign_up(&self, email: String, password: String) -> GatewayResult<User> {
        let context_msg = "sign up";

        let request = self
            .request(Method::POST, &self.auth_url("signup"), None)
            .json(&json!({ "email": email, "password": password }));

        let body = self.send(request, context_msg).await?;
        let value: Value = Self::parse(&body, context_msg)?;

        // with auto-confirm the service answers with a whole session
        let user = match value {
            Value::Object(mut object) if object.get("user").is_some_and(Value::is_object) => {
                object.remove("user").unwrap_or(Value::Null)
            }
            other => other,
        };

        serde_json::from_value(user)
            .map_err(|e| Failure::new(format!("{context_msg} returned unexpected data: {e}")))
    }

    async fn sign_out(&self, access_token: String) -> GatewayResult<()> {
        let request = self.request(Method::POST, &self.auth_url("logout"), Some(&access_token));

        self.send(request, "sign out").await.map(|_| ())
    }

    async fn get_session(&self, access_token: String) -> GatewayResult<User> {
        let context_msg = "get session";
        let request = self.request(Method::GET, &self.auth_url("user"), Some(&access_token));

        let body = self.send(request, context_msg).await?;
        Self::parse(&body, context_msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_use_postgrest_syntax() {
        let params = SupabaseGateway::filter_params(&[
            Filter::eq("user_id", "8d1f"),
            Filter::any_of("id", [3, 5]),
            Filter::any_of("name", ["Sunday AM Service", "Plain"]),
        ]);

        assert_eq!(
            params,
            vec![
                ("user_id".to_string(), "eq.8d1f".to_string()),
                ("id".to_string(), "in.(3,5)".to_string()),
                (
                    "name".to_string(),
                    "in.(\"Sunday AM Service\",Plain)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn urls_are_normalised() {
        let gateway =
            SupabaseGateway::new("https://example.supabase.co/", "anon", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            gateway.rest_url(Collection::PlaylistSongs),
            "https://example.supabase.co/rest/v1/playlist_songs"
        );
        assert_eq!(
            gateway.auth_url("/token"),
            "https://example.supabase.co/auth/v1/token"
        );
    }

    #[test]
    fn empty_configuration_is_rejected() {
        assert!(SupabaseGateway::new("", "anon", Duration::from_secs(5)).is_err());
        assert!(SupabaseGateway::new("https://x.supabase.co", " ", Duration::from_secs(5)).is_err());
    }
}
