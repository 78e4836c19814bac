use crate::{
    action::Fields,
    clients::{Client, ClientRegistry},
    events::Event,
    gateway::DataGateway,
    model::Settings,
    runtime::{Runtime, Visit},
    types::AuthSession,
};
use actix_session::Session;
use actix_web::{
    HttpResponse, Responder,
    http::header::{self, ContentType},
    web,
};
use log::{debug, error, warn};
use serde_json::json;
use std::{
    fmt::Display,
    sync::{Arc, Mutex},
    time::Duration,
};
use uuid::Uuid;

const CLIENT_ID: &str = "client_id";
const AUTH: &str = "auth";

/// HTTP surface: pages are GETs by path, every control posts to `/action`
#[derive(Clone)]
pub struct Api<Gateway>
where
    Gateway: DataGateway,
{
    pub runtime: Runtime<Gateway>,
    pub clients: Arc<ClientRegistry>,
}

fn internal<E: Display>(context: &'static str) -> impl FnOnce(E) -> actix_web::Error {
    move |e| {
        error!("{context} failed: {e:#}");
        actix_web::error::ErrorInternalServerError(format!("{context} failed"))
    }
}

fn redirect(status: actix_web::http::StatusCode, location: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::LOCATION, location))
        .finish()
}

impl<Gateway> Api<Gateway>
where
    Gateway: DataGateway + Clone + 'static,
{
    pub fn new(gateway: Gateway, settings: Settings, idle_timeout: Duration) -> Self {
        Api {
            runtime: Runtime::new(gateway),
            clients: Arc::new(ClientRegistry::new(settings, idle_timeout)),
        }
    }

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(Self::index))
            .route("/action", web::post().to(Self::action))
            .route("/healthcheck", web::get().to(Self::healthcheck))
            .route("/version", web::get().to(Self::version))
            .route("/{fragment}", web::get().to(Self::page));
    }

    pub async fn index(api: web::Data<Self>, session: Session) -> actix_web::Result<HttpResponse> {
        debug!("index() called");
        api.show(&session, "").await
    }

    pub async fn page(
        api: web::Data<Self>,
        session: Session,
        fragment: web::Path<String>,
    ) -> actix_web::Result<HttpResponse> {
        debug!("page() called: {fragment}");
        api.show(&session, &fragment).await
    }

    pub async fn action(
        api: web::Data<Self>,
        session: Session,
        form: web::Form<Fields>,
    ) -> actix_web::Result<HttpResponse> {
        debug!("action() called");

        let mut fields = form.into_inner();
        let key = fields.remove("action").unwrap_or_default();

        let client = api.client(&session).await?;
        let route = api
            .runtime
            .act(&client, &key, &fields)
            .await
            .map_err(internal("action"))?;
        Self::store_session(&session, &client)?;

        Ok(redirect(
            actix_web::http::StatusCode::SEE_OTHER,
            route.path(),
        ))
    }

    pub async fn healthcheck(api: web::Data<Self>) -> impl Responder {
        debug!("healthcheck() called");

        HttpResponse::Ok().json(json!({
            "version": env!("CARGO_PKG_VERSION"),
            "clients": api.clients.len(),
        }))
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok().body(env!("CARGO_PKG_VERSION"))
    }

    async fn show(&self, session: &Session, fragment: &str) -> actix_web::Result<HttpResponse> {
        let client = self.client(session).await?;
        let visit = self
            .runtime
            .visit(&client, fragment)
            .await
            .map_err(internal("visit"))?;
        Self::store_session(session, &client)?;

        Ok(match visit {
            Visit::Redirect(route) => redirect(actix_web::http::StatusCode::FOUND, route.path()),
            Visit::Page(html) => HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(html),
        })
    }

    /// The client of this browser session. A new client picks up the
    /// identity cached in the session cookie.
    async fn client(&self, session: &Session) -> actix_web::Result<Arc<Mutex<Client>>> {
        let id = session.get::<Uuid>(CLIENT_ID).unwrap_or_else(|e| {
            warn!("ignoring unreadable client id: {e:#}");
            None
        });

        let (id, client, created) = self
            .clients
            .get_or_create(id)
            .map_err(internal("get client"))?;

        if created {
            session
                .insert(CLIENT_ID, id)
                .map_err(internal("store client id"))?;

            if let Ok(Some(auth)) = session.get::<AuthSession>(AUTH) {
                self.runtime
                    .dispatch(&client, Event::Restore(auth))
                    .await
                    .map_err(internal("restore session"))?;
            }
        }

        Ok(client)
    }

    /// Mirror the client's identity into the session cookie
    fn store_session(session: &Session, client: &Mutex<Client>) -> actix_web::Result<()> {
        let auth = client
            .lock()
            .map_err(|_| internal("lock client")("client state lock poisoned"))?
            .state
            .session
            .clone();

        match auth {
            Some(auth) => session
                .insert(AUTH, auth)
                .map_err(internal("store session"))?,
            None => {
                session.remove(AUTH);
            }
        }

        Ok(())
    }
}
