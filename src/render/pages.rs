use super::{Markup, songs::song_fields};
use crate::{
    action::Action,
    model::{AddSongView, DraftOrigin},
};

pub(super) fn about(markup: &mut Markup) {
    markup.raw(concat!(
        r#"<section class="container mx-auto p-4">"#,
        r#"<h1 class="text-3xl font-bold mb-4">About Our Music Ministry</h1>"#,
        "<p>At St. Tim's, our worship services feature a diverse range of musical styles. ",
        "We blend traditional hymns with contemporary pieces so that music resonates with all age groups.</p>",
        r#"<h2 class="text-2xl font-semibold mt-6 mb-2">Our Services</h2>"#,
        r#"<div class="mb-4"><h3 class="text-xl font-semibold mb-1">Morning Service (10:30 AM)</h3>"#,
        "<p>Our main service brings together a variety of people, with a blend of musical styles suitable for all ages.</p></div>",
        r#"<div><h3 class="text-xl font-semibold mb-1">Harbour (Evening Service)</h3>"#,
        "<p>The Harbour is our informal evening service with extended worship and teaching on Christian living today.</p></div>",
        "</section>",
    ));
}

pub(super) fn events(markup: &mut Markup) {
    markup.raw(concat!(
        r#"<section class="container mx-auto p-4">"#,
        r#"<h1 class="text-3xl font-bold mb-4">Events</h1>"#,
        r#"<ul class="space-y-4">"#,
        r#"<li><h3 class="text-xl font-semibold">Sunday Morning Service</h3>"#,
        "<p>Every Sunday at 10:30 AM.</p></li>",
        r#"<li><h3 class="text-xl font-semibold">Harbour</h3>"#,
        "<p>Our informal evening service, every Sunday evening.</p></li>",
        "</ul></section>",
    ));
}

/// Stand-alone add-song page
pub(super) fn add_song(markup: &mut Markup, view: &AddSongView) {
    markup
        .raw(r#"<section class="max-w-2xl mx-auto p-6 bg-white rounded-lg shadow-md">"#)
        .raw(r#"<h2 class="text-2xl font-bold mb-6">Add New Song</h2>"#)
        .form_start("space-y-4");
    song_fields(markup, "page", &view.draft);
    markup
        .raw(r#"<div class="flex justify-end space-x-3">"#)
        .raw(r#"<a href="/songs" class="button button-secondary">Cancel</a>"#)
        .submit(
            Action::SubmitSong(DraftOrigin::Page),
            "Add Song",
            "button",
            "Save new song",
        )
        .raw("</div>")
        .form_end()
        .raw("</section>");
}
