use super::{Markup, layout};
use crate::{
    model::{Settings, SundayView},
    types::Service,
};

/// Read-only morning and evening lists
pub(super) fn page(markup: &mut Markup, view: &SundayView, settings: &Settings) {
    markup.raw(concat!(
        r#"<section class="container mx-auto p-4">"#,
        r#"<h2 class="text-2xl font-bold mb-4">Sunday Services</h2>"#,
        "<p>Here you can view the playlists for the Sunday morning and evening services.</p>",
    ));

    if layout::ready(markup, &view.status) {
        for service in Service::ALL {
            let name = settings.sunday.name(service);
            markup
                .raw(r#"<div class="mt-6"><h3 class="text-xl font-semibold">"#)
                .text(name)
                .raw("</h3>");

            match view.services.iter().find(|set| set.service == service) {
                None => {
                    markup
                        .raw(r#"<p class="text-gray-500">Could not load "#)
                        .text(name)
                        .raw(".</p>");
                }
                Some(set) if set.songs.is_empty() => {
                    markup.raw(r#"<p class="text-gray-500">No songs added yet.</p>"#);
                }
                Some(set) => {
                    markup.raw(r#"<ul class="list-disc pl-6">"#);
                    for song in &set.songs {
                        markup
                            .raw("<li>")
                            .text(&song.title)
                            .raw(" by ")
                            .text(song.author_or_unknown())
                            .raw("</li>");
                    }
                    markup.raw("</ul>");
                }
            }

            markup.raw("</div>");
        }
    }

    markup.raw("</section>");
}
