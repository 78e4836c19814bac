//! Wire format of the hosted backend, checked against a mock server.

use serde_json::json;
use songbook::{
    gateway::{Collection, DataGateway, Filter, SupabaseGateway},
    model::Credentials,
    services::{playlists, songs},
    types::Id,
};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANON_KEY: &str = "anon-key";

fn gateway(server: &MockServer) -> SupabaseGateway {
    SupabaseGateway::new(&server.uri(), ANON_KEY, Duration::from_secs(5)).unwrap()
}

fn credentials() -> Credentials {
    Credentials {
        access_token: "user-token".to_string(),
        user_id: Id::from("8d1f"),
    }
}

mod rest {
    use super::*;

    #[tokio::test]
    async fn anonymous_select_uses_the_anon_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/songs"))
            .and(query_param("select", "*"))
            .and(query_param("order", "title.asc"))
            .and(header("apikey", ANON_KEY))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "title": "Amazing Grace", "author": "J. Newton", "lyrics": null },
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = songs::load(&gateway(&server), None).await.unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, Id::from(1));
        assert_eq!(catalog[0].author.as_deref(), Some("J. Newton"));
    }

    #[tokio::test]
    async fn membership_insert_checks_first_and_sends_position() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/playlist_songs"))
            .and(query_param("playlist_id", "eq.3"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "playlist_id": 3, "song_id": 1, "position": 1 },
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/playlist_songs"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!([
                { "playlist_id": 3, "song_id": 7, "position": 2 },
            ])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                { "playlist_id": 3, "song_id": 7, "position": 2 },
            ])))
            .expect(1)
            .mount(&server)
            .await;

        playlists::add_song(&gateway(&server), &credentials(), &Id::from(3), &Id::from(7))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn conflict_keeps_the_store_error_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/playlist_songs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/playlist_songs"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "details": "Key (playlist_id, song_id)=(3, 7) already exists.",
                "hint": null,
                "message": "duplicate key value violates unique constraint \"playlist_songs_pkey\"",
            })))
            .mount(&server)
            .await;

        let failure =
            playlists::add_song(&gateway(&server), &credentials(), &Id::from(3), &Id::from(7))
                .await
                .unwrap_err();

        assert!(failure.is_unique_violation());
        assert!(failure.message.starts_with("duplicate key value"));
    }

    #[tokio::test]
    async fn comment_is_a_filtered_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/songs"))
            .and(query_param("id", "eq.5"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(json!({ "comments": "Key of G", "updated_by": "8d1f" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        songs::save_comment(&gateway(&server), &credentials(), &Id::from(5), " Key of G ")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn playlist_delete_removes_memberships_first() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/playlist_songs"))
            .and(query_param("playlist_id", "eq.9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/playlists"))
            .and(query_param("id", "eq.9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        playlists::delete(&gateway(&server), &credentials(), &Id::from(9))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let paths: Vec<&str> = requests.iter().map(|request| request.url.path()).collect();
        assert_eq!(paths, ["/rest/v1/playlist_songs", "/rest/v1/playlists"]);
    }

    #[tokio::test]
    async fn unfiltered_delete_never_leaves_the_process() {
        let server = MockServer::start().await;

        let failure = gateway(&server)
            .delete(Some("user-token".to_string()), Collection::Songs, Vec::new())
            .await
            .unwrap_err();

        assert!(failure.message.contains("no filter"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_failure() {
        let server = MockServer::start().await;
        let gateway = gateway(&server);
        drop(server);

        let failure = gateway
            .update(
                Some("user-token".to_string()),
                Collection::Songs,
                vec![Filter::eq("id", 1)],
                serde_json::Map::new(),
            )
            .await
            .unwrap_err();

        assert!(failure.message.starts_with("update songs"));
    }
}

mod auth {
    use super::*;

    #[tokio::test]
    async fn password_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(body_json(json!({ "email": "choir@example.org", "password": "hymnal1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": { "id": "8d1f", "email": "choir@example.org", "role": "authenticated" },
            })))
            .mount(&server)
            .await;

        let session = gateway(&server)
            .sign_in("choir@example.org".to_string(), "hymnal1".to_string())
            .await
            .unwrap();

        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(session.user.id, Id::from("8d1f"));
        assert!(session.expires_at.is_some());
    }

    #[tokio::test]
    async fn rejected_credentials_keep_the_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 400,
                "error_code": "invalid_credentials",
                "msg": "Invalid login credentials",
            })))
            .mount(&server)
            .await;

        let failure = gateway(&server)
            .sign_in("choir@example.org".to_string(), "wrong".to_string())
            .await
            .unwrap_err();

        assert_eq!(failure.message, "Invalid login credentials");
        assert_eq!(failure.code.as_deref(), Some("invalid_credentials"));
    }

    #[tokio::test]
    async fn sign_up_accepts_user_and_session_replies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(body_json(json!({ "email": "new@example.org", "password": "hymnal1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt",
                "user": { "id": "u2", "email": "new@example.org" },
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(body_json(json!({ "email": "confirm@example.org", "password": "hymnal1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u3",
                "email": "confirm@example.org",
                "confirmation_sent_at": "2026-10-17T09:00:00Z",
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let confirmed = gateway
            .sign_up("new@example.org".to_string(), "hymnal1".to_string())
            .await
            .unwrap();
        let pending = gateway
            .sign_up("confirm@example.org".to_string(), "hymnal1".to_string())
            .await
            .unwrap();

        assert_eq!(confirmed.id, Id::from("u2"));
        assert_eq!(pending.id, Id::from("u3"));
    }

    #[tokio::test]
    async fn session_check_and_logout_use_the_user_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "8d1f", "email": "choir@example.org" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let user = gateway.get_session("jwt".to_string()).await.unwrap();
        gateway.sign_out("jwt".to_string()).await.unwrap();

        assert_eq!(user.email.as_deref(), Some("choir@example.org"));
    }
}
