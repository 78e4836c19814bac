use crate::{
    model::{AppState, Settings},
    router::Router,
    sync::Synchronizer,
};
use log::{debug, info};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
    time::{Duration, Instant},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("client registry lock poisoned")]
    Poisoned,
}

/// Everything the server keeps for one browser session
#[derive(Debug)]
pub struct Client {
    pub state: AppState,
    pub router: Router,
    pub sync: Synchronizer,
    last_seen: Instant,
}

impl Client {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
            router: Router::default(),
            sync: Synchronizer::default(),
            last_seen: Instant::now(),
        }
    }

    /// Re-render the current route into the content region
    pub fn synchronize(&mut self) {
        let route = self.router.current();
        self.sync
            .synchronize(route, &self.state, self.state.session.as_ref());
    }

    /// The most recently synchronized page
    pub fn page(&self) -> String {
        self.sync.content().to_string()
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// Live clients by id. Idle clients are dropped when new ones arrive.
pub struct ClientRegistry {
    clients: RwLock<HashMap<Uuid, Arc<Mutex<Client>>>>,
    idle_timeout: Duration,
    settings: Settings,
}

impl ClientRegistry {
    pub fn new(settings: Settings, idle_timeout: Duration) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            idle_timeout,
            settings,
        }
    }

    /// Look up the client of `id`, creating a fresh one when unknown.
    /// The returned flag tells whether the client was created.
    pub fn get_or_create(
        &self,
        id: Option<Uuid>,
    ) -> Result<(Uuid, Arc<Mutex<Client>>, bool), ClientError> {
        if let Some(id) = id {
            let clients = self.clients.read().map_err(|_| ClientError::Poisoned)?;
            if let Some(client) = clients.get(&id) {
                if let Ok(mut guard) = client.lock() {
                    guard.touch();
                }
                return Ok((id, client.clone(), false));
            }
        }

        let mut clients = self.clients.write().map_err(|_| ClientError::Poisoned)?;
        self.purge_idle(&mut clients);

        let id = Uuid::new_v4();
        let client = Arc::new(Mutex::new(Client::new(self.settings.clone())));
        clients.insert(id, client.clone());
        debug!("created client {id}, {} live", clients.len());

        Ok((id, client, true))
    }

    fn purge_idle(&self, clients: &mut HashMap<Uuid, Arc<Mutex<Client>>>) {
        let before = clients.len();
        clients.retain(|_, client| match client.lock() {
            Ok(client) => client.last_seen.elapsed() < self.idle_timeout,
            Err(_) => false,
        });

        let purged = before - clients.len();
        if purged > 0 {
            info!("dropped {purged} idle clients");
        }
    }

    pub fn len(&self) -> usize {
        self.clients.read().map(|clients| clients.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
