use songbook::{
    command::Request,
    events::Response,
    gateway::{DataGateway, MemoryGateway, PERMISSION_DENIED},
    model::Credentials,
    services::{self, ALREADY_IN_PLAYLIST, playlists, songs, sunday},
    types::{Id, PlaylistDraft, Service, SongDraft, SundayNames},
};

async fn signed_in(gateway: &MemoryGateway) -> Credentials {
    gateway
        .sign_up("organist@example.org".to_string(), "psalter".to_string())
        .await
        .unwrap();
    let session = gateway
        .sign_in("organist@example.org".to_string(), "psalter".to_string())
        .await
        .unwrap();

    Credentials {
        access_token: session.access_token,
        user_id: session.user.id,
    }
}

fn draft(title: &str, youtube_url: &str) -> SongDraft {
    SongDraft {
        title: title.to_string(),
        author: "Traditional".to_string(),
        youtube_url: youtube_url.to_string(),
        lyrics: String::new(),
    }
}

async fn playlist(gateway: &MemoryGateway, credentials: &Credentials, name: &str) -> Id {
    playlists::create(
        gateway,
        credentials,
        &PlaylistDraft {
            name: name.to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    playlists::owned_by(gateway, credentials)
        .await
        .unwrap()
        .into_iter()
        .find(|playlist| playlist.name == name)
        .map(|playlist| playlist.id)
        .unwrap()
}

#[tokio::test]
async fn added_song_gets_an_id_and_a_playable_link() {
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;

    let song = songs::add(
        &gateway,
        &credentials,
        &draft("Amazing Grace", "https://youtu.be/abc12345678"),
    )
    .await
    .unwrap();

    assert!(song.id.as_str().parse::<i64>().is_ok());
    assert_eq!(song.created_by, Some(credentials.user_id.clone()));
    assert_eq!(
        song.video_id().map(|id| id.as_str().to_string()),
        Some("abc12345678".to_string())
    );

    let catalog = songs::load(&gateway, None).await.unwrap();
    assert_eq!(catalog, vec![song]);
}

#[tokio::test]
async fn songs_are_listed_by_title() {
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;

    for title in ["O Worship the King", "Abide with Me", "Be Still My Soul"] {
        songs::add(&gateway, &credentials, &draft(title, ""))
            .await
            .unwrap();
    }

    let titles: Vec<String> = songs::load(&gateway, None)
        .await
        .unwrap()
        .into_iter()
        .map(|song| song.title)
        .collect();
    assert_eq!(titles, ["Abide with Me", "Be Still My Soul", "O Worship the King"]);
}

#[tokio::test]
async fn duplicate_membership_is_rejected() {
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;
    let song = songs::add(&gateway, &credentials, &draft("Amazing Grace", ""))
        .await
        .unwrap();
    let playlist_id = playlist(&gateway, &credentials, "Advent").await;

    playlists::add_song(&gateway, &credentials, &playlist_id, &song.id)
        .await
        .unwrap();
    let failure = playlists::add_song(&gateway, &credentials, &playlist_id, &song.id)
        .await
        .unwrap_err();

    assert!(failure.is_unique_violation());
    assert_eq!(failure.message, ALREADY_IN_PLAYLIST);
    assert_eq!(
        playlists::songs_of(&gateway, None, &playlist_id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn playlist_songs_keep_insertion_order() {
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;
    let playlist_id = playlist(&gateway, &credentials, "Lent").await;

    for title in ["When I Survey", "Abide with Me"] {
        let song = songs::add(&gateway, &credentials, &draft(title, ""))
            .await
            .unwrap();
        playlists::add_song(&gateway, &credentials, &playlist_id, &song.id)
            .await
            .unwrap();
    }

    let titles: Vec<String> = playlists::songs_of(&gateway, None, &playlist_id)
        .await
        .unwrap()
        .into_iter()
        .map(|song| song.title)
        .collect();
    assert_eq!(titles, ["When I Survey", "Abide with Me"]);
}

#[tokio::test]
async fn deleting_a_playlist_removes_its_memberships() {
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;
    let song = songs::add(&gateway, &credentials, &draft("Amazing Grace", ""))
        .await
        .unwrap();
    let playlist_id = playlist(&gateway, &credentials, "Harvest").await;
    playlists::add_song(&gateway, &credentials, &playlist_id, &song.id)
        .await
        .unwrap();

    playlists::delete(&gateway, &credentials, &playlist_id)
        .await
        .unwrap();

    assert!(
        playlists::songs_of(&gateway, None, &playlist_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        playlists::owned_by(&gateway, &credentials)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(songs::load(&gateway, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_song_removes_it_everywhere() {
    let names = SundayNames::default();
    let gateway = MemoryGateway::with_sunday_playlists(&names);
    let credentials = signed_in(&gateway).await;
    let song = songs::add(&gateway, &credentials, &draft("Amazing Grace", ""))
        .await
        .unwrap();
    let playlist_id = playlist(&gateway, &credentials, "Easter").await;
    playlists::add_song(&gateway, &credentials, &playlist_id, &song.id)
        .await
        .unwrap();
    sunday::add_song(&gateway, &credentials, &names, Service::Morning, &song.id)
        .await
        .unwrap();

    songs::delete(&gateway, &credentials, &song.id).await.unwrap();

    assert!(songs::load(&gateway, None).await.unwrap().is_empty());
    assert!(
        playlists::songs_of(&gateway, None, &playlist_id)
            .await
            .unwrap()
            .is_empty()
    );
    let services = sunday::load(&gateway, None, &names).await.unwrap();
    assert!(services.iter().all(|set| set.songs.is_empty()));
}

#[tokio::test]
async fn sunday_services_are_found_by_name() {
    let names = SundayNames::default();
    let gateway = MemoryGateway::with_sunday_playlists(&names);
    let credentials = signed_in(&gateway).await;
    let song = songs::add(&gateway, &credentials, &draft("Be Thou My Vision", ""))
        .await
        .unwrap();

    sunday::add_song(&gateway, &credentials, &names, Service::Evening, &song.id)
        .await
        .unwrap();
    let failure = sunday::add_song(&gateway, &credentials, &names, Service::Evening, &song.id)
        .await
        .unwrap_err();
    assert!(failure.is_unique_violation());

    let services = sunday::load(&gateway, None, &names).await.unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0].service, Service::Morning);
    assert!(services[0].songs.is_empty());
    assert_eq!(services[1].playlist.name, "Sunday PM Service");
    assert_eq!(services[1].songs, vec![song.clone()]);

    sunday::remove_song(&gateway, &credentials, &names, Service::Evening, &song.id)
        .await
        .unwrap();
    let services = sunday::load(&gateway, None, &names).await.unwrap();
    assert!(services[1].songs.is_empty());
}

#[tokio::test]
async fn missing_sunday_playlist_is_reported() {
    let names = SundayNames::default();
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;

    assert!(sunday::load(&gateway, None, &names).await.unwrap().is_empty());

    let failure = sunday::add_song(&gateway, &credentials, &names, Service::Morning, &Id::from(1))
        .await
        .unwrap_err();
    assert!(failure.message.contains("Sunday AM Service"));
}

#[tokio::test]
async fn comments_replace_the_previous_one() {
    let gateway = MemoryGateway::new();
    let credentials = signed_in(&gateway).await;
    let song = songs::add(&gateway, &credentials, &draft("Amazing Grace", ""))
        .await
        .unwrap();

    songs::save_comment(&gateway, &credentials, &song.id, "Key of G")
        .await
        .unwrap();
    songs::save_comment(&gateway, &credentials, &song.id, "  Key of A  ")
        .await
        .unwrap();

    let catalog = songs::load(&gateway, None).await.unwrap();
    assert_eq!(catalog[0].comments.as_deref(), Some("Key of A"));
    assert_eq!(catalog[0].updated_by, Some(credentials.user_id));
}

#[tokio::test]
async fn mutations_without_a_session_are_denied() {
    let gateway = MemoryGateway::new();
    let credentials = Credentials {
        access_token: "forged".to_string(),
        user_id: Id::from("nobody"),
    };

    let failure = songs::add(&gateway, &credentials, &draft("Amazing Grace", ""))
        .await
        .unwrap_err();

    assert_eq!(failure.code.as_deref(), Some(PERMISSION_DENIED));

    let response = services::perform(
        &gateway,
        Request::LoadSunday {
            credentials: None,
            names: SundayNames::default(),
        },
    )
    .await;
    assert_eq!(response, Response::SundayLoaded(Ok(Vec::new())));
}
