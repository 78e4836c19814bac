use super::{Markup, layout, markup::Input};
use crate::{
    action::Action,
    model::{PlaylistForm, PlaylistsView},
    types::LoadedPlaylist,
};

pub(super) fn page(markup: &mut Markup, view: &PlaylistsView) {
    markup.raw(concat!(
        r#"<section class="container mx-auto p-4" aria-labelledby="playlists-heading">"#,
        r#"<div class="flex justify-between items-center mb-6">"#,
        r#"<h2 id="playlists-heading" class="text-3xl font-bold">My Playlists</h2>"#,
    ));
    if view.form.is_none() {
        markup.button(
            Action::NewPlaylist,
            "Create New Playlist",
            "button",
            "Create a new playlist",
        );
    }
    markup.raw("</div>");

    if let Some(form) = view.form.as_ref() {
        playlist_form(markup, form);
    }

    if layout::ready(markup, &view.status) {
        if view.playlists.is_empty() {
            markup.raw(
                r#"<p class="text-gray-500" role="status">You haven't created any playlists yet.</p>"#,
            );
        } else {
            markup.raw(r#"<div class="grid gap-6 md:grid-cols-2">"#);
            for loaded in &view.playlists {
                playlist(markup, loaded);
            }
            markup.raw("</div>");
        }
    }

    markup.raw("</section>");
}

fn playlist_form(markup: &mut Markup, form: &PlaylistForm) {
    let heading = if form.editing.is_some() {
        "Edit Playlist"
    } else {
        "New Playlist"
    };

    markup
        .raw(r#"<div class="max-w-2xl mx-auto p-6 mb-8 bg-white rounded-lg shadow-md">"#)
        .raw(&format!(
            r#"<h3 class="text-xl font-semibold mb-4">{heading}</h3>"#
        ))
        .form_start("space-y-4")
        .input(Input::text("playlist-name", "name", "Name", &form.draft.name).required())
        .textarea(
            Input::text(
                "playlist-description",
                "description",
                "Description (Optional)",
                &form.draft.description,
            )
            .extra(r#" rows="3""#),
        )
        .raw(r#"<div class="flex justify-end space-x-3">"#)
        .cancel(Action::CancelPlaylist, "Cancel", "button button-secondary")
        .submit(Action::SavePlaylist, "Save Playlist", "button", "Save playlist")
        .raw("</div>")
        .form_end()
        .raw("</div>");
}

fn playlist(markup: &mut Markup, loaded: &LoadedPlaylist) {
    let playlist = &loaded.playlist;

    markup
        .raw(&format!(
            r#"<article class="bg-white rounded-lg shadow p-6" aria-labelledby="playlist-title-{}">"#,
            super::escape_html(playlist.id.as_str())
        ))
        .raw(r#"<div class="flex justify-between items-start mb-4">"#)
        .raw(&format!(
            r#"<h3 id="playlist-title-{}" class="text-xl font-semibold">"#,
            super::escape_html(playlist.id.as_str())
        ))
        .text(&playlist.name)
        .raw(r#"</h3><div class="flex space-x-2">"#)
        .button(
            Action::EditPlaylist(playlist.id.clone()),
            "Edit",
            "button-icon",
            &format!("Edit {}", playlist.name),
        )
        .button(
            Action::DeletePlaylist(playlist.id.clone()),
            "Delete",
            "button-icon text-red-600",
            &format!("Delete {}", playlist.name),
        )
        .raw("</div></div>");

    if let Some(description) = playlist.description.as_deref().filter(|text| !text.is_empty()) {
        markup
            .raw(r#"<p class="text-gray-600 mb-4">"#)
            .text(description)
            .raw("</p>");
    }

    markup.raw(r#"<h4 class="font-semibold mb-2">Songs</h4>"#);
    if loaded.songs.is_empty() {
        markup.raw(r#"<p class="text-gray-500" role="status">No songs added yet</p>"#);
    } else {
        markup.raw(r#"<ul class="space-y-2">"#);
        for song in &loaded.songs {
            markup
                .raw(r#"<li class="flex justify-between items-center"><span>"#)
                .text(&song.title)
                .raw(r#" <span class="text-gray-500">by "#)
                .text(song.author_or_unknown())
                .raw("</span></span>")
                .button(
                    Action::RemoveFromPlaylist {
                        playlist_id: playlist.id.clone(),
                        song_id: song.id.clone(),
                    },
                    "Remove",
                    "button-icon text-red-600",
                    &format!("Remove {} from {}", song.title, playlist.name),
                )
                .raw("</li>");
        }
        markup.raw("</ul>");
    }

    markup.raw("</article>");
}
