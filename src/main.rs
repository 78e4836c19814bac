use actix_files::Files;
use actix_server::ServerHandle;
use actix_session::{
    SessionMiddleware,
    config::{BrowserSession, CookieContentSecurity},
    storage::CookieSessionStore,
};
use actix_web::{
    App, HttpServer,
    cookie::{Key, SameSite},
    web::Data,
};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info, warn};
use rustls::crypto::{CryptoProvider, ring::default_provider};
use songbook::{
    api::Api,
    config::{AppConfig, BackendKind},
    gateway::{DataGateway, MemoryGateway, SupabaseGateway},
};
use std::io::Write;
use tokio::signal::unix::{SignalKind, signal};

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();
    info!("songbook version: {}", env!("CARGO_PKG_VERSION"));

    CryptoProvider::install_default(default_provider())
        .map_err(|_| anyhow::anyhow!("crypto provider already installed"))?;

    let config = AppConfig::load().context("failed to load configuration")?;

    match config.backend.kind.clone() {
        BackendKind::Supabase { url, anon_key } => {
            let gateway = SupabaseGateway::new(&url, &anon_key, config.backend.request_timeout)
                .context("failed to create backend gateway")?;
            info!("using supabase backend at {url}");
            serve(gateway, &config).await
        }
        BackendKind::Memory => {
            warn!("using in-memory backend, data is lost on shutdown");
            serve(
                MemoryGateway::with_sunday_playlists(&config.site.sunday),
                &config,
            )
            .await
        }
    }
}

fn init_logging() {
    log_panics::init();

    let default_filter = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    // errors go to stderr, everything else to stdout, both without decoration
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|f, record| {
            if record.level() == log::Level::Error {
                eprintln!("{}", record.args());
                return Ok(());
            }
            writeln!(f, "{}", record.args())
        })
        .target(Target::Stdout)
        .init();
}

async fn serve<G>(gateway: G, config: &AppConfig) -> Result<()>
where
    G: DataGateway + Clone + Send + Sync + 'static,
{
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let (server_handle, server_task) = run_server(gateway, config)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            debug!("ctrl-c received");
        },
        _ = sigterm.recv() => {
            debug!("SIGTERM received");
        },
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    };

    info!("shutting down");
    server_handle.stop(true).await;
    info!("shutdown complete");

    Ok(())
}

fn run_server<G>(
    gateway: G,
    config: &AppConfig,
) -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)>
where
    G: DataGateway + Clone + Send + Sync + 'static,
{
    let api = Api::new(gateway, config.settings(), config.clients.idle_timeout);
    let session_key = match config.ui.session_key.as_deref() {
        Some(key) => Key::try_from(key).context("failed to create session key")?,
        None => Key::generate(),
    };
    let tls = config.certificate.is_some();
    let static_dir = config.ui.static_dir.clone();
    let address = format!("0.0.0.0:{}", config.ui.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_name(String::from("songbook-session"))
                    .cookie_secure(tls)
                    .session_lifecycle(BrowserSession::default())
                    .cookie_same_site(SameSite::Strict)
                    .cookie_content_security(CookieContentSecurity::Private)
                    .cookie_http_only(true)
                    .build(),
            )
            .app_data(Data::new(api.clone()))
            .service(Files::new("/static", static_dir.clone()))
            .configure(Api::<G>::configure)
    });

    let server = match config.certificate.as_ref() {
        Some(certificate) => {
            server
                .bind_rustls_0_23(&address, certificate.tls_config()?)
                .context("failed to bind server")?
        }
        None => server.bind(&address).context("failed to bind server")?,
    }
    .disable_signals()
    .run();

    info!("listening on {address}");

    Ok((server.handle(), tokio::spawn(server)))
}
