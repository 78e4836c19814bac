//! Pure renderers from (route, state, session) to markup.
//!
//! Every page is rendered as a whole document. Controls register their
//! [`Action`](crate::action::Action) with the [`Markup`] they are written
//! into, keyed by action and entity so that equal inputs give equal output.

mod auth;
mod layout;
pub mod markup;
mod pages;
mod playlists;
mod songs;
mod sunday;

pub use markup::{Binding, Markup};

use crate::{model::AppState, router::Route, types::AuthSession};
use pulldown_cmark::{Event as MdEvent, Parser, Tag, TagEnd, html};

const PREVIEW_CHARS: usize = 100;

/// Render the complete page for `route`
pub fn render(route: Route, state: &AppState, session: Option<&AuthSession>) -> Markup {
    let mut markup = Markup::new();

    layout::open(&mut markup, route, session);
    layout::flash(&mut markup, state.flash.as_ref());

    if route.requires_session() && session.is_none() {
        auth::login_prompt(&mut markup);
    } else {
        match route {
            Route::Login => auth::login(&mut markup, &state.auth),
            Route::Signup => auth::signup(&mut markup, &state.auth),
            Route::About => pages::about(&mut markup),
            Route::Events => pages::events(&mut markup),
            Route::Songs => songs::page(&mut markup, &state.songs, &state.settings),
            Route::Playlists => playlists::page(&mut markup, &state.playlists),
            Route::AddSong => pages::add_song(&mut markup, &state.add_song),
            Route::SundayServices => sunday::page(&mut markup, &state.sunday, &state.settings),
        }
    }

    layout::confirm(&mut markup, state.confirm.as_ref());
    layout::close(&mut markup, &state.settings);
    markup
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Markdown preview of the first characters of `lyrics`.
///
/// Raw HTML in the source is shown as text, links and images lose their
/// targets and keep only their text.
pub fn lyrics_preview(lyrics: &str) -> String {
    let mut source: String = lyrics.chars().take(PREVIEW_CHARS).collect();
    source.push_str("...");

    let events = Parser::new(&source).filter_map(|event| match event {
        MdEvent::Html(raw) | MdEvent::InlineHtml(raw) => Some(MdEvent::Text(raw)),
        MdEvent::Start(Tag::Link { .. } | Tag::Image { .. }) => None,
        MdEvent::End(TagEnd::Link | TagEnd::Image) => None,
        event => Some(event),
    });

    let mut preview = String::new();
    html::push_html(&mut preview, events);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        action::Action,
        model::PageStatus,
        types::{Id, Song, User},
    };

    fn session() -> AuthSession {
        AuthSession {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
            user: User {
                id: Id::from("u1"),
                email: Some("choir@example.org".to_string()),
            },
        }
    }

    fn song(id: i64, title: &str, url: Option<&str>) -> Song {
        Song {
            id: Id::from(id),
            title: title.to_string(),
            author: Some("J. Newton".to_string()),
            lyrics: None,
            youtube_url: url.map(str::to_string),
            comments: None,
            created_by: None,
            updated_by: None,
        }
    }

    fn loaded(songs: Vec<Song>) -> AppState {
        let mut state = AppState::default();
        state.songs.filtered = songs.clone();
        state.songs.all = songs;
        state.songs.status = PageStatus {
            initialized: true,
            ..Default::default()
        };
        state
    }

    #[test]
    fn rendering_is_idempotent() {
        let state = loaded(vec![
            song(1, "Amazing Grace", Some("https://youtu.be/abc12345678")),
            song(2, "Be Thou My Vision", None),
        ]);
        let session = session();

        let first = render(Route::Songs, &state, Some(&session));
        let second = render(Route::Songs, &state, Some(&session));

        assert_eq!(first, second);
    }

    #[test]
    fn protected_routes_prompt_for_login() {
        let state = loaded(vec![song(1, "Amazing Grace", None)]);

        for route in [
            Route::Songs,
            Route::Playlists,
            Route::AddSong,
            Route::SundayServices,
        ] {
            let markup = render(route, &state, None);
            assert!(markup.html().contains("Please login to view this page"));
            assert!(!markup.html().contains("Amazing Grace"));
        }
    }

    #[test]
    fn public_routes_render_without_session() {
        let markup = render(Route::About, &AppState::default(), None);
        assert!(markup.html().contains("About Our Music Ministry"));
        assert!(!markup.html().contains("Please login to view this page"));
    }

    #[test]
    fn empty_search_result_differs_from_empty_catalog() {
        let session = session();

        let empty = render(Route::Songs, &loaded(vec![]), Some(&session));
        assert!(empty.html().contains("No songs available."));

        let mut searched = loaded(vec![song(1, "Amazing Grace", None)]);
        searched.songs.query = "zzz".to_string();
        searched.songs.filtered.clear();
        let markup = render(Route::Songs, &searched, Some(&session));
        assert!(markup.html().contains("No songs found matching your search."));
    }

    #[test]
    fn play_button_only_for_parseable_video_urls() {
        let state = loaded(vec![
            song(1, "With Video", Some("https://youtu.be/abc12345678")),
            song(2, "Broken Link", Some("https://youtu.be/nope")),
        ]);
        let markup = render(Route::Songs, &state, Some(&session()));

        let plays: Vec<_> = markup
            .bindings()
            .iter()
            .filter(|binding| matches!(binding.action, Action::PlayVideo(_)))
            .collect();
        assert_eq!(plays.len(), 1);
        assert_eq!(plays[0].key, "play-video:abc12345678");
    }

    #[test]
    fn loading_skeleton_before_first_load() {
        let mut state = AppState::default();
        state.songs.status.start_loading();

        let markup = render(Route::Songs, &state, Some(&session()));
        assert!(markup.html().contains("animate-pulse"));
    }

    #[test]
    fn error_banner_offers_retry() {
        let mut state = AppState::default();
        state
            .songs
            .status
            .set_error("Error loading songs: offline".to_string());

        let markup = render(Route::Songs, &state, Some(&session()));
        assert!(markup.html().contains("Error loading songs: offline"));
        assert!(
            markup
                .bindings()
                .iter()
                .any(|binding| binding.action == Action::Reload)
        );
    }

    #[test]
    fn user_text_is_escaped() {
        let state = loaded(vec![song(1, "<script>alert(1)</script>", None)]);
        let markup = render(Route::Songs, &state, Some(&session()));

        assert!(!markup.html().contains("<script>alert(1)"));
        assert!(markup.html().contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn nav_marks_current_route() {
        let markup = render(Route::Playlists, &AppState::default(), Some(&session()));
        assert!(
            markup
                .html()
                .contains(r#"href="/playlists" class="nav-link" aria-label="View your playlists" aria-current="page""#)
        );
    }

    mod preview {
        use super::*;

        #[test]
        fn truncates_to_a_hundred_characters() {
            let lyrics = "a".repeat(150);
            let preview = lyrics_preview(&lyrics);

            assert!(preview.contains(&format!("{}...", "a".repeat(100))));
            assert!(!preview.contains(&"a".repeat(101)));
        }

        #[test]
        fn renders_markdown_emphasis() {
            assert_eq!(
                lyrics_preview("**Amazing** grace"),
                "<p><strong>Amazing</strong> grace...</p>\n"
            );
        }

        #[test]
        fn neutralizes_raw_html_and_links() {
            let preview = lyrics_preview("<img src=x onerror=alert(1)> [sweet](javascript:alert(1))");

            assert!(!preview.contains("<img"));
            assert!(!preview.contains("href"));
            assert!(preview.contains("&lt;img"));
            assert!(preview.contains("sweet"));
        }
    }
}
