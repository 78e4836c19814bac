use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{
    App,
    body::MessageBody,
    cookie::{Cookie, Key},
    dev::ServiceResponse,
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use songbook::{api::Api, gateway::MemoryGateway, model::Settings, types::SundayNames};
use std::time::Duration;

const COOKIE: &str = "songbook-session";

macro_rules! service {
    ($api:expr, $key:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), $key.clone())
                        .cookie_name(COOKIE.to_string())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($api.clone()))
                .configure(Api::<MemoryGateway>::configure),
        )
        .await
    };
}

fn api(gateway: MemoryGateway) -> Api<MemoryGateway> {
    Api::new(gateway, Settings::default(), Duration::from_secs(60))
}

fn gateway() -> MemoryGateway {
    MemoryGateway::with_sunday_playlists(&SundayNames::default())
}

/// Cookie jar of a single browser
#[derive(Default)]
struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    fn get(&self, uri: &str) -> TestRequest {
        self.with_cookie(TestRequest::get().uri(uri))
    }

    fn act(&self, action: &str, fields: &[(&str, &str)]) -> TestRequest {
        let mut form = vec![("action", action)];
        form.extend_from_slice(fields);
        self.with_cookie(TestRequest::post().uri("/action").set_form(form))
    }

    fn with_cookie(&self, request: TestRequest) -> TestRequest {
        match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        }
    }

    fn remember<B>(&mut self, response: &ServiceResponse<B>) {
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == COOKIE)
        {
            self.cookie = Some(cookie.into_owned());
        }
    }
}

fn location<B>(response: &ServiceResponse<B>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

async fn body<B: MessageBody>(response: ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(response).await.to_vec()).unwrap()
}

#[tokio::test]
async fn unknown_path_redirects_to_songs() {
    let key = Key::generate();
    let api = api(gateway());
    let app = service!(api, key);

    let response = test::call_service(&app, TestRequest::get().uri("/hymns").to_request()).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/songs");
}

#[tokio::test]
async fn signed_out_visitors_are_asked_to_login() {
    let key = Key::generate();
    let api = api(gateway());
    let app = service!(api, key);

    let response = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body(response).await;
    assert!(page.contains("Please login to view this page"));
    assert!(page.contains(r#"href="/login""#));
}

#[tokio::test]
async fn public_pages_render_without_session() {
    let key = Key::generate();
    let api = api(gateway());
    let app = service!(api, key);

    let response = test::call_service(&app, TestRequest::get().uri("/about").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body(response).await.contains("About Our Music Ministry"));
}

#[tokio::test]
async fn healthcheck_and_version() {
    let key = Key::generate();
    let api = api(gateway());
    let app = service!(api, key);

    let response =
        test::call_service(&app, TestRequest::get().uri("/healthcheck").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let health: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(health["clients"], 0);

    let response = test::call_service(&app, TestRequest::get().uri("/version").to_request()).await;
    assert_eq!(body(response).await, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn stale_controls_are_reported() {
    let key = Key::generate();
    let api = api(gateway());
    let app = service!(api, key);
    let mut browser = Browser::default();

    let response = test::call_service(&app, browser.get("/about").to_request()).await;
    browser.remember(&response);

    let response = test::call_service(&app, browser.act("delete-song:1", &[]).to_request()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/about");
    browser.remember(&response);

    let response = test::call_service(&app, browser.get("/about").to_request()).await;
    assert!(
        body(response)
            .await
            .contains("That control is no longer available. Please try again.")
    );
}

#[tokio::test]
async fn sign_up_sign_in_and_add_a_song() {
    let key = Key::generate();
    let api = api(gateway());
    let app = service!(api, key);
    let mut browser = Browser::default();
    let credentials = [("email", "choir@example.org"), ("password", "hymnal1")];

    let response = test::call_service(&app, browser.get("/signup").to_request()).await;
    browser.remember(&response);
    assert!(browser.cookie.is_some());

    let response = test::call_service(&app, browser.act("sign-up", &credentials).to_request()).await;
    assert_eq!(location(&response), "/login");
    browser.remember(&response);

    let response = test::call_service(&app, browser.get("/login").to_request()).await;
    browser.remember(&response);
    assert!(
        body(response)
            .await
            .contains("Please check your email for verification link")
    );

    let response = test::call_service(&app, browser.act("sign-in", &credentials).to_request()).await;
    assert_eq!(location(&response), "/songs");
    browser.remember(&response);

    let response = test::call_service(&app, browser.get("/songs").to_request()).await;
    browser.remember(&response);
    let page = body(response).await;
    assert!(page.contains("Worship Songs"));
    assert!(page.contains("choir@example.org"));
    assert!(page.contains("Sunday AM Service (0 songs)"));

    let response = test::call_service(&app, browser.get("/add-song").to_request()).await;
    browser.remember(&response);

    let response = test::call_service(
        &app,
        browser
            .act(
                "submit-song:page",
                &[
                    ("title", "Amazing Grace"),
                    ("author", "J. Newton"),
                    ("youtube_url", "https://youtu.be/abc12345678"),
                    ("lyrics", "**Amazing** grace"),
                ],
            )
            .to_request(),
    )
    .await;
    assert_eq!(location(&response), "/songs");
    browser.remember(&response);

    let response = test::call_service(&app, browser.get("/songs").to_request()).await;
    let page = body(response).await;
    assert!(page.contains("Song added successfully!"));
    assert!(page.contains("Amazing Grace"));
    assert!(page.contains("play-video:abc12345678"));
}

#[tokio::test]
async fn identity_is_restored_from_the_cookie() {
    let key = Key::generate();
    let gateway = gateway();
    let first = api(gateway.clone());
    let app = service!(first, key);
    let mut browser = Browser::default();
    let credentials = [("email", "warden@example.org"), ("password", "vestry1")];

    let response = test::call_service(&app, browser.get("/signup").to_request()).await;
    browser.remember(&response);
    let response = test::call_service(&app, browser.act("sign-up", &credentials).to_request()).await;
    browser.remember(&response);
    let response = test::call_service(&app, browser.act("sign-in", &credentials).to_request()).await;
    browser.remember(&response);

    // a fresh client registry knows nothing about this browser
    let second = api(gateway);
    let app = service!(second, key);

    let response = test::call_service(&app, browser.get("/songs").to_request()).await;
    let page = body(response).await;
    assert!(page.contains("Worship Songs"));
    assert!(!page.contains("Please login to view this page"));
}
