use super::Markup;
use crate::{
    action::Action,
    model::{Confirmation, Flash, FlashKind, PageStatus, Settings},
    router::Route,
    types::AuthSession,
};

const NAV: [(Route, &str, &str); 4] = [
    (Route::Songs, "Songs", "View all songs"),
    (Route::Playlists, "My Playlists", "View your playlists"),
    (Route::AddSong, "Add Song", "Add a new song"),
    (
        Route::SundayServices,
        "Sunday Services",
        "View Sunday Services playlists",
    ),
];

/// Document head, header and the opening of the content region
pub(super) fn open(markup: &mut Markup, route: Route, session: Option<&AuthSession>) {
    markup.raw(concat!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"/>"#,
        r#"<meta name="viewport" content="width=device-width, initial-scale=1"/>"#,
        r#"<title>St Timothy's Church Music</title>"#,
        r#"<link rel="stylesheet" href="/static/style.css"/></head>"#,
        r#"<body><div class="min-h-screen flex flex-col">"#,
        r#"<header class="header" role="banner"><div class="container flex items-center justify-between py-4">"#,
        r#"<div class="flex items-center space-x-4">"#,
        r#"<img src="/static/logo.svg" alt="St Timothy's Church Logo" class="h-12 w-auto" width="48" height="48"/>"#,
        r#"<h1 class="text-2xl font-bold">St Timothy's Church Music</h1></div>"#,
        r#"<div class="flex items-center">"#,
    ));

    match session {
        Some(session) => {
            if let Some(email) = session.user.email.as_deref() {
                markup
                    .raw(r#"<span class="user-email">"#)
                    .text(email)
                    .raw("</span>");
            }
            markup.button(
                Action::SignOut,
                "Sign Out",
                "button",
                "Sign out of your account",
            );
        }
        None => {
            markup.raw(concat!(
                r#"<div class="space-x-4">"#,
                r#"<a href="/login" class="button" aria-label="Log in to your account">Login</a>"#,
                r#"<a href="/signup" class="button" aria-label="Create a new account">Sign Up</a>"#,
                "</div>",
            ));
        }
    }
    markup.raw("</div></div>");

    if session.is_some() {
        markup.raw(
            r#"<nav class="bg-blue-700" role="navigation" aria-label="Main navigation"><div class="container py-2"><ul class="flex space-x-6">"#,
        );
        for (target, label, aria_label) in NAV {
            let current = if target == route { "page" } else { "false" };
            markup.raw(&format!(
                r#"<li><a href="{}" class="nav-link" aria-label="{aria_label}" aria-current="{current}">{label}</a></li>"#,
                target.path()
            ));
        }
        markup.raw("</ul></div></nav>");
    }

    markup.raw(r#"</header><main id="content" class="container mx-auto px-4 py-8 flex-grow">"#);
}

/// Close the content region, then footer and document
pub(super) fn close(markup: &mut Markup, settings: &Settings) {
    markup.raw(concat!(
        "</main>",
        r#"<footer class="bg-gray-800 text-white mt-auto"><div class="container mx-auto py-8 px-4">"#,
        r#"<div class="grid md:grid-cols-2 gap-8"><div>"#,
        r#"<h3 class="text-xl font-semibold mb-4">Contact Us</h3>"#,
        r#"<p class="mb-2">Have questions or suggestions? We'd love to hear from you!</p>"#,
        r#"<a href="https://www.sttims.org.uk/" target="_blank" rel="noopener noreferrer" class="text-blue-300" "#,
        r#"aria-label="Visit St Timothy's Church Sheffield website (opens in new tab)">Visit St Timothy's Church Website</a>"#,
        "</div><div>",
        r#"<h3 class="text-xl font-semibold mb-4">About</h3>"#,
        "<p>This website helps manage and organize church music for St Timothy's Church. ",
        "It's designed to make song management and playlist creation simple and efficient.</p>",
        "</div></div>",
        r#"<div class="border-t border-gray-700 mt-8 pt-4 text-center text-gray-400">"#,
    ));
    markup.raw(&format!(
        "<p>&copy; {} St Timothy's Church. All rights reserved.</p>",
        settings.copyright_year
    ));
    markup.raw("</div></div></footer></div></body></html>");
}

pub(super) fn flash(markup: &mut Markup, flash: Option<&Flash>) {
    let Some(flash) = flash else {
        return;
    };

    let class = match flash.kind {
        FlashKind::Error => "flash bg-red-100 text-red-700",
        FlashKind::Success => "flash bg-green-100 text-green-700",
    };
    markup
        .raw(&format!(r#"<div class="{class} p-4 rounded mb-4" role="alert">"#))
        .raw("<span>")
        .text(&flash.message)
        .raw("</span>")
        .button(
            Action::DismissFlash,
            "Dismiss",
            "button-icon",
            "Dismiss message",
        )
        .raw("</div>");
}

pub(super) fn confirm(markup: &mut Markup, confirmation: Option<&Confirmation>) {
    let Some(confirmation) = confirmation else {
        return;
    };

    markup
        .raw(r#"<div class="modal" role="dialog" aria-modal="true" aria-labelledby="confirm-question">"#)
        .raw(r#"<div class="modal-body bg-white rounded-lg shadow p-6">"#)
        .raw(r#"<p id="confirm-question" class="mb-4">"#)
        .text(confirmation.question())
        .raw(r#"</p><div class="flex justify-end space-x-3">"#)
        .button(
            Action::CancelConfirm,
            "Cancel",
            "button button-secondary",
            "Cancel",
        )
        .button(Action::Confirm, "Confirm", "button button-danger", "Confirm")
        .raw("</div></div></div>");
}

/// Banner shown instead of a page whose load failed
fn error_banner(markup: &mut Markup, message: &str) {
    markup
        .raw(r#"<div class="bg-red-100 text-red-700 p-4 rounded" role="alert">"#)
        .raw(r#"<h2 class="font-bold">Error</h2><p>"#)
        .text(message)
        .raw("</p>")
        .button(Action::Reload, "Retry", "button", "Retry loading")
        .raw("</div>");
}

/// Placeholder cards shown while a page loads for the first time
fn skeleton(markup: &mut Markup) {
    markup.raw(r#"<div class="song-list grid gap-6 md:grid-cols-2 lg:grid-cols-3" aria-busy="true">"#);
    for _ in 0..6 {
        markup.raw(concat!(
            r#"<div class="song-card bg-white rounded-lg shadow p-4 animate-pulse">"#,
            r#"<div class="h-4 bg-gray-300 rounded w-3/4 mb-2"></div>"#,
            r#"<div class="h-3 bg-gray-300 rounded w-1/2 mb-4"></div>"#,
            r#"<div class="h-3 bg-gray-300 rounded w-full mb-1"></div>"#,
            r#"<div class="h-3 bg-gray-300 rounded w-5/6 mb-4"></div>"#,
            "</div>",
        ));
    }
    markup.raw("</div>");
}

/// Render the loading or error view of `status`. Returns `true` when the
/// page has data to show instead.
pub(super) fn ready(markup: &mut Markup, status: &PageStatus) -> bool {
    if let Some(error) = status.error.as_deref() {
        error_banner(markup, error);
        return false;
    }
    if !status.initialized {
        skeleton(markup);
        return false;
    }
    true
}
