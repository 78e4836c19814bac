use super::{Markup, layout, lyrics_preview, markup::Input};
use crate::{
    action::Action,
    model::{DraftOrigin, Settings, SongsView},
    types::{Service, Song, SongDraft, VideoId},
};

pub(super) fn page(markup: &mut Markup, view: &SongsView, settings: &Settings) {
    markup.raw(concat!(
        r#"<section class="container mx-auto p-4" aria-labelledby="songs-page-heading">"#,
        r#"<div class="flex justify-between items-center mb-8">"#,
        r#"<h1 id="songs-page-heading" class="text-3xl font-bold">Worship Songs</h1>"#,
    ));
    if !view.show_add_form {
        markup.button(Action::ShowAddSong, "Add New Song", "button", "Add new song");
    }
    markup.raw("</div>");

    if layout::ready(markup, &view.status) {
        services(markup, view, settings);
        if view.show_add_form {
            add_form(markup, &view.draft);
        }
        catalog(markup, view);
    }

    markup.raw("</section>");

    if let Some(video) = view.active_video.as_ref() {
        video_modal(markup, video);
    }
}

fn services(markup: &mut Markup, view: &SongsView, settings: &Settings) {
    markup.raw(concat!(
        r#"<section id="sunday-playlists" class="mb-12">"#,
        r#"<h2 class="text-2xl font-bold mb-6 border-b pb-2">Sunday Services</h2>"#,
        r#"<div class="grid grid-cols-1 md:grid-cols-2 gap-8">"#,
    ));

    for service in Service::ALL {
        let name = settings.sunday.name(service);
        markup.raw("<div>");

        match view.service(service) {
            None => {
                markup
                    .raw(r#"<div class="text-gray-500">Could not load "#)
                    .text(name)
                    .raw(".</div>");
            }
            Some(set) => {
                markup
                    .raw(r#"<h3 class="text-xl font-semibold mb-4">"#)
                    .text(name)
                    .raw(&format!(" ({} songs)</h3>", set.songs.len()));

                if set.songs.is_empty() {
                    markup.raw(r#"<p class="text-gray-500">No songs added yet.</p>"#);
                } else {
                    markup.raw(r#"<div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">"#);
                    for song in &set.songs {
                        service_card(markup, song, service);
                    }
                    markup.raw("</div>");
                }
            }
        }

        markup.raw("</div>");
    }

    markup.raw("</div></section>");
}

fn service_card(markup: &mut Markup, song: &Song, service: Service) {
    markup
        .raw(r#"<article class="song-card bg-white rounded-lg shadow p-4 flex flex-col justify-between"><div>"#)
        .raw(r#"<h3 class="text-lg font-semibold mb-1">"#)
        .text(&song.title)
        .raw(r#"</h3><p class="text-sm text-gray-600 mb-2">By "#)
        .text(song.author_or_unknown())
        .raw(r#"</p></div><div class="flex items-center justify-between mt-3">"#);

    play_button(markup, song);
    markup
        .button(
            Action::RemoveFromService(service, song.id.clone()),
            "Remove",
            "button-icon text-red-600 hover:text-red-800",
            &format!("Remove {} from this Sunday playlist", song.title),
        )
        .raw("</div></article>");
}

fn add_form(markup: &mut Markup, draft: &SongDraft) {
    markup
        .raw(r#"<section id="add-song-section" class="mt-12 pt-8 border-t">"#)
        .raw(r#"<h2 class="text-2xl font-bold mb-6">Add New Song</h2>"#)
        .raw(r#"<div class="max-w-2xl mx-auto p-6 bg-white rounded-lg shadow-md">"#)
        .form_start("space-y-4");
    song_fields(markup, "add", draft);
    markup
        .raw(r#"<div class="flex justify-end space-x-3">"#)
        .cancel(Action::HideAddSong, "Cancel", "button button-secondary")
        .submit(
            Action::SubmitSong(DraftOrigin::Inline),
            "Save Song",
            "button",
            "Save new song",
        )
        .raw("</div>")
        .form_end()
        .raw("</div></section>");
}

/// Title, author, URL and lyrics inputs shared by the add and edit forms
pub(super) fn song_fields(markup: &mut Markup, prefix: &str, draft: &SongDraft) {
    let title = format!("{prefix}-title");
    let author = format!("{prefix}-author");
    let url = format!("{prefix}-youtube-url");
    let lyrics = format!("{prefix}-lyrics");

    markup
        .input(Input::text(&title, "title", "Title", &draft.title).required())
        .input(Input::text(&author, "author", "Author", &draft.author).required())
        .input(
            Input::text(&url, "youtube_url", "YouTube URL (Optional)", &draft.youtube_url)
                .kind("url")
                .extra(r#" pattern="https?://.*" title="Please enter a valid URL starting with http:// or https://""#),
        )
        .textarea(Input::text(&lyrics, "lyrics", "Lyrics", &draft.lyrics).extra(r#" rows="6""#))
        .raw(r#"<p class="mt-1 text-sm text-gray-500">You can use markdown for formatting</p>"#);
}

fn catalog(markup: &mut Markup, view: &SongsView) {
    markup
        .raw(r#"<section id="all-songs" class="mt-12 pt-8 border-t">"#)
        .raw(r#"<h2 id="all-songs-heading" class="text-2xl font-bold mb-6">All Songs</h2>"#)
        .raw(r#"<div class="search-container-wrapper mb-6">"#);
    search_bar(markup, &view.query);
    markup.raw("</div>");

    if view.filtered.is_empty() {
        let message = if view.query.trim().is_empty() {
            "No songs available."
        } else {
            "No songs found matching your search."
        };
        markup.raw(&format!(
            r#"<div class="text-center py-8 text-gray-500">{message}</div>"#
        ));
    } else {
        markup.raw(r#"<div class="song-list grid gap-6 md:grid-cols-2 lg:grid-cols-3">"#);
        for song in &view.filtered {
            match view.editing.as_ref() {
                Some(edit) if edit.id == song.id => edit_card(markup, song, &edit.draft),
                _ => song_card(markup, song, view),
            }
        }
        markup.raw("</div>");
    }

    markup.raw("</section>");
}

fn search_bar(markup: &mut Markup, query: &str) {
    markup
        .form_start("search-container flex items-center space-x-2")
        .raw(r#"<input type="search" name="query" class="search-input flex-grow" placeholder="Search by title, author, or lyrics..." aria-label="Search all songs" value=""#)
        .text(query)
        .raw(r#""/>"#)
        .submit(Action::Search, "Search", "button", "Submit search");
    if !query.is_empty() {
        markup.cancel(Action::ClearSearch, "Clear", "clear-search");
    }
    markup.form_end();
}

fn song_card(markup: &mut Markup, song: &Song, view: &SongsView) {
    markup
        .raw(r#"<article class="song-card bg-white rounded-lg shadow p-4 flex flex-col justify-between"><div>"#)
        .raw(r#"<h3 class="text-lg font-semibold mb-1">"#)
        .text(&song.title)
        .raw(r#"</h3><p class="text-sm text-gray-600 mb-2">By "#)
        .text(song.author_or_unknown())
        .raw("</p>");

    if let Some(lyrics) = song.lyrics.as_deref().filter(|lyrics| !lyrics.is_empty()) {
        markup
            .raw(r#"<div class="text-xs text-gray-500 mb-2 lyrics-preview">"#)
            .raw(&lyrics_preview(lyrics))
            .raw("</div>");
    }
    if let Some(comments) = song.comments.as_deref().filter(|text| !text.is_empty()) {
        markup
            .raw(r#"<div class="comments text-sm bg-gray-50 rounded p-2 mb-2"><h4 class="font-semibold">Comments</h4><p>"#)
            .text(comments)
            .raw("</p></div>");
    }
    markup.raw(r#"</div><div class="flex items-center justify-between mt-3">"#);

    play_button(markup, song);

    markup.raw(r#"<div class="flex space-x-1">"#);
    for service in Service::ALL {
        let label = service.short_label();
        markup.button(
            Action::AddToService(service, song.id.clone()),
            &format!("Add {label}"),
            "button-icon text-green-600 hover:text-green-800",
            &format!("Add {} to Sunday {label} playlist", song.title),
        );
    }
    markup
        .button(
            Action::PickPlaylist(song.id.clone()),
            "+ Playlist",
            "button-icon text-purple-600 hover:text-purple-800",
            &format!("Add {} to one of your playlists", song.title),
        )
        .button(
            Action::EditSong(song.id.clone()),
            "Edit",
            "button-icon",
            &format!("Edit {}", song.title),
        )
        .button(
            Action::DeleteSong(song.id.clone()),
            "Delete",
            "button-icon text-red-600 hover:text-red-800",
            &format!("Delete {}", song.title),
        )
        .raw("</div></div>");

    if view.picking_for.as_ref() == Some(&song.id) {
        playlist_picker(markup, song, view);
    }

    markup
        .form_start("comment-form mt-3")
        .textarea(
            Input::text(
                &format!("comment-{}", song.id),
                "comment",
                "Add a comment",
                "",
            )
            .extra(r#" rows="2""#),
        )
        .submit(
            Action::Comment(song.id.clone()),
            "Post Comment",
            "button button-secondary",
            &format!("Post comment on {}", song.title),
        )
        .form_end()
        .raw("</article>");
}

fn play_button(markup: &mut Markup, song: &Song) {
    match song.video_id() {
        Some(video) => {
            markup.button(
                Action::PlayVideo(video),
                "Play",
                "button-icon text-blue-600 hover:text-blue-800",
                &format!("Play video for {}", song.title),
            );
        }
        None => {
            markup.raw("<span></span>");
        }
    }
}

fn playlist_picker(markup: &mut Markup, song: &Song, view: &SongsView) {
    markup.raw(r#"<div class="playlist-picker border rounded p-2 mt-2"><h4 class="font-semibold mb-1">Add to playlist</h4>"#);

    if view.my_playlists.is_empty() {
        markup.raw(r#"<p class="text-gray-500">You haven't created any playlists yet.</p>"#);
    } else {
        markup.raw(r#"<ul class="space-y-1">"#);
        for playlist in &view.my_playlists {
            markup.raw("<li>").button(
                Action::AddToPlaylist {
                    playlist_id: playlist.id.clone(),
                    song_id: song.id.clone(),
                },
                &super::escape_html(&playlist.name),
                "button-link",
                &format!("Add {} to {}", song.title, playlist.name),
            );
            markup.raw("</li>");
        }
        markup.raw("</ul>");
    }

    markup
        .button(Action::ClosePicker, "Close", "button-icon", "Close playlist picker")
        .raw("</div>");
}

fn edit_card(markup: &mut Markup, song: &Song, draft: &SongDraft) {
    markup
        .raw(r#"<article class="song-card bg-white rounded-lg shadow p-4">"#)
        .form_start("space-y-4");
    song_fields(markup, &format!("edit-{}", song.id), draft);
    markup
        .raw(r#"<div class="flex justify-end space-x-3">"#)
        .cancel(Action::CancelEdit, "Cancel", "button button-secondary")
        .submit(
            Action::SaveSong(song.id.clone()),
            "Save Changes",
            "button",
            &format!("Save changes to {}", song.title),
        )
        .raw("</div>")
        .form_end()
        .raw("</article>");
}

fn video_modal(markup: &mut Markup, video: &VideoId) {
    markup
        .raw(r#"<div class="modal video-modal" role="dialog" aria-modal="true" aria-label="Video player">"#)
        .raw(r#"<div class="modal-body bg-black rounded-lg p-2">"#)
        .raw(&format!(
            r#"<iframe src="{}" width="560" height="315" title="YouTube video player" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#,
            super::escape_html(&video.embed_url())
        ))
        .button(Action::CloseVideo, "Close", "button", "Close video")
        .raw("</div></div>");
}
