use crate::{
    action::Fields,
    clients::Client,
    command::Command,
    events::Event,
    gateway::DataGateway,
    router::{Route, Transition},
    services,
    update::update,
};
use log::debug;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("client state lock poisoned")]
    Poisoned,
}

/// Outcome of opening a path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Visit {
    /// The path is unknown; the browser has to go to the route instead
    Redirect(Route),
    /// The synchronized page of the route
    Page(String),
}

/// Drives events through `update` and carries out the returned commands.
///
/// The client lock is only taken for synchronous sections and is never held
/// while a gateway call is awaited.
#[derive(Clone)]
pub struct Runtime<G: DataGateway> {
    gateway: G,
}

fn lock(client: &Mutex<Client>) -> Result<MutexGuard<'_, Client>, RuntimeError> {
    client.lock().map_err(|_| RuntimeError::Poisoned)
}

impl<G: DataGateway> Runtime<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Move the client to `fragment` and return the page to show
    pub async fn visit(
        &self,
        client: &Arc<Mutex<Client>>,
        fragment: &str,
    ) -> Result<Visit, RuntimeError> {
        let transition = lock(client)?.router.navigate(fragment);

        match transition {
            Transition::Redirect(route) => {
                debug!("unknown path {fragment:?}, redirecting to {route}");
                return Ok(Visit::Redirect(route));
            }
            Transition::Enter { route, changed } => {
                self.dispatch(
                    client,
                    Event::Enter {
                        route,
                        changed,
                        by_user: true,
                    },
                )
                .await?;
            }
        }

        let mut client = lock(client)?;
        if client.sync.passes() == 0 {
            client.synchronize();
        }
        Ok(Visit::Page(client.page()))
    }

    /// Run the action bound to `key` and return the route to show afterwards.
    /// Keys that the last render did not bind are rejected as stale.
    pub async fn act(
        &self,
        client: &Arc<Mutex<Client>>,
        key: &str,
        fields: &Fields,
    ) -> Result<Route, RuntimeError> {
        let action = lock(client)?.sync.resolve(key);

        let event = match action {
            Some(action) => {
                debug!("action {key}");
                action.into_event(fields)
            }
            None => {
                debug!("stale action {key}");
                Event::StaleAction
            }
        };
        self.dispatch(client, event).await?;

        Ok(lock(client)?.router.current())
    }

    /// Process `event` and every event that follows from it
    pub async fn dispatch(
        &self,
        client: &Arc<Mutex<Client>>,
        event: Event,
    ) -> Result<(), RuntimeError> {
        let mut events = VecDeque::from([event]);

        while let Some(event) = events.pop_front() {
            let commands = {
                let mut client = lock(client)?;
                update(event, &mut client.state).flatten()
            };

            for command in commands {
                match command {
                    Command::Done | Command::All(_) => {}

                    Command::Render => lock(client)?.synchronize(),

                    Command::Refresh => {
                        let route = lock(client)?.router.current();
                        events.push_back(Event::Enter {
                            route,
                            changed: false,
                            by_user: false,
                        });
                    }

                    Command::Navigate(route) => {
                        let transition = lock(client)?.router.redirect(route);
                        if let Transition::Enter { route, changed } = transition {
                            events.push_back(Event::Enter {
                                route,
                                changed,
                                by_user: false,
                            });
                        }
                    }

                    Command::Request(token, request) => {
                        debug!("performing {request:?}");
                        let response = services::perform(&self.gateway, request).await;
                        events.push_back(Event::Response(token, response));
                    }
                }
            }
        }

        Ok(())
    }
}
