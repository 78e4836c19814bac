use super::{
    Collection, DataGateway, Failure, Filter, GatewayResult, PERMISSION_DENIED, Query, Row,
    UNIQUE_VIOLATION, value_text,
};
use crate::types::{AuthSession, Id, SundayNames, User, unix_now};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// In-process stand-in for the hosted backend.
///
/// Keeps the same observable contract as the hosted service: integer ids
/// assigned on insert, unique membership pairs, mutations only with a valid
/// access token. Used for local development and tests.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryStore>>,
}

#[derive(Default)]
struct MemoryStore {
    tables: HashMap<Collection, Vec<Row>>,
    next_id: i64,
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, User>,
}

struct Account {
    password: String,
    user: User,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already contains the two Sunday playlists
    pub fn with_sunday_playlists(names: &SundayNames) -> Self {
        let gateway = Self::new();
        if let Ok(mut store) = gateway.inner.lock() {
            for name in [&names.morning, &names.evening] {
                let mut row = Row::new();
                row.insert("name".to_string(), Value::from(name.clone()));
                store.insert_row(Collection::SundayPlaylists, row);
            }
        }
        gateway
    }

    fn store(&self) -> GatewayResult<std::sync::MutexGuard<'_, MemoryStore>> {
        self.inner
            .lock()
            .map_err(|_| Failure::new("memory store is unavailable"))
    }
}

impl MemoryStore {
    fn table(&mut self, collection: Collection) -> &mut Vec<Row> {
        self.tables.entry(collection).or_default()
    }

    fn insert_row(&mut self, collection: Collection, mut row: Row) -> Row {
        if !row.contains_key("id") && collection.unique_pair().is_none() {
            self.next_id += 1;
            row.insert("id".to_string(), Value::from(self.next_id));
        }
        self.table(collection).push(row.clone());
        row
    }

    fn authorize(&self, access_token: Option<&str>) -> GatewayResult<&User> {
        access_token
            .and_then(|token| self.tokens.get(token))
            .ok_or_else(|| {
                Failure::with_code(
                    "permission denied: sign in required",
                    PERMISSION_DENIED,
                )
            })
    }

    fn violates_unique_pair(&self, collection: Collection, row: &Row) -> bool {
        let Some((first, second)) = collection.unique_pair() else {
            return false;
        };
        let (Some(a), Some(b)) = (row.get(first), row.get(second)) else {
            return false;
        };

        self.tables.get(&collection).is_some_and(|rows| {
            rows.iter().any(|existing| {
                existing.get(first).map(value_text) == Some(value_text(a))
                    && existing.get(second).map(value_text) == Some(value_text(b))
            })
        })
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| filter.matches(row))
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> std::cmp::Ordering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(a), Some(b)) => value_text(a).to_lowercase().cmp(&value_text(b).to_lowercase()),
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

impl DataGateway for MemoryGateway {
    async fn select(&self, _access_token: Option<String>, query: Query) -> GatewayResult<Vec<Row>> {
        let store = self.store()?;

        let mut rows: Vec<Row> = store
            .tables
            .get(&query.collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(ordering) = &query.ordering {
            rows.sort_by(|a, b| {
                let order = compare_values(a.get(&ordering.column), b.get(&ordering.column));
                if ordering.ascending { order } else { order.reverse() }
            });
        }

        Ok(rows)
    }

    async fn insert(
        &self,
        access_token: Option<String>,
        collection: Collection,
        record: Row,
    ) -> GatewayResult<Row> {
        let mut store = self.store()?;
        store.authorize(access_token.as_deref())?;

        if store.violates_unique_pair(collection, &record) {
            return Err(Failure::with_code(
                format!(
                    "duplicate key value violates unique constraint on {}",
                    collection.as_str()
                ),
                UNIQUE_VIOLATION,
            ));
        }

        Ok(store.insert_row(collection, record))
    }

    async fn update(
        &self,
        access_token: Option<String>,
        collection: Collection,
        matcher: Vec<Filter>,
        patch: Row,
    ) -> GatewayResult<()> {
        let mut store = self.store()?;
        store.authorize(access_token.as_deref())?;

        store
            .table(collection)
            .iter_mut()
            .filter(|row| matches_all(row, &matcher))
            .for_each(|row| {
                row.extend(patch.clone());
            });

        Ok(())
    }

    async fn delete(
        &self,
        access_token: Option<String>,
        collection: Collection,
        matcher: Vec<Filter>,
    ) -> GatewayResult<()> {
        let mut store = self.store()?;
        store.authorize(access_token.as_deref())?;

        if matcher.is_empty() {
            return Err(Failure::new("delete refused: no filter given"));
        }

        store
            .table(collection)
            .retain(|row| !matches_all(row, &matcher));

        Ok(())
    }

    async fn sign_in(&self, email: String, password: String) -> GatewayResult<AuthSession> {
        let mut store = self.store()?;

        let user = match store.accounts.get(&email.trim().to_lowercase()) {
            Some(account) if account.password == password => account.user.clone(),
            _ => {
                return Err(Failure::with_code(
                    "Invalid login credentials",
                    "invalid_credentials",
                ));
            }
        };

        let access_token = Uuid::new_v4().to_string();
        store.tokens.insert(access_token.clone(), user.clone());

        Ok(AuthSession {
            access_token,
            refresh_token: Some(Uuid::new_v4().to_string()),
            expires_at: Some(unix_now() + TOKEN_LIFETIME_SECS),
            user,
        })
    }

    async fn sign_up(&self, email: String, password: String) -> GatewayResult<User> {
        let mut store = self.store()?;
        let email = email.trim().to_lowercase();

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Failure::with_code(
                format!("Password should be at least {MIN_PASSWORD_LEN} characters."),
                "weak_password",
            ));
        }
        if store.accounts.contains_key(&email) {
            return Err(Failure::with_code(
                "User already registered",
                "user_already_exists",
            ));
        }

        let user = User {
            id: Id::new(Uuid::new_v4().to_string()),
            email: Some(email.clone()),
        };
        store.accounts.insert(
            email,
            Account {
                password,
                user: user.clone(),
            },
        );

        Ok(user)
    }

    async fn sign_out(&self, access_token: String) -> GatewayResult<()> {
        let mut store = self.store()?;

        store
            .tokens
            .remove(&access_token)
            .map(|_| ())
            .ok_or_else(|| Failure::with_code("Invalid token", "bad_jwt"))
    }

    async fn get_session(&self, access_token: String) -> GatewayResult<User> {
        let store = self.store()?;

        store
            .tokens
            .get(&access_token)
            .cloned()
            .ok_or_else(|| Failure::with_code("Invalid token", "bad_jwt"))
    }
}
