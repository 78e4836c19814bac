use super::{Markup, markup::Input};
use crate::{action::Action, model::AuthView};

pub(super) fn login_prompt(markup: &mut Markup) {
    markup.raw(concat!(
        r#"<div class="text-center py-8">"#,
        r#"<h2 class="text-2xl font-bold mb-4">Please login to view this page</h2>"#,
        r#"<a href="/login" class="button">Login</a>"#,
        "</div>",
    ));
}

pub(super) fn login(markup: &mut Markup, view: &AuthView) {
    credentials_form(markup, view, "login", "Login", Action::SignIn);
    markup.raw(concat!(
        r#"<p class="mt-4 text-center">Don't have an account? "#,
        r#"<a href="/signup" class="text-blue-600 hover:underline">Sign up</a></p></div>"#,
    ));
}

pub(super) fn signup(markup: &mut Markup, view: &AuthView) {
    credentials_form(markup, view, "signup", "Sign Up", Action::SignUp);
    markup.raw(concat!(
        r#"<p class="mt-4 text-center">Already have an account? "#,
        r#"<a href="/login" class="text-blue-600 hover:underline">Login</a></p></div>"#,
    ));
}

/// Email and password form, left open for the caller's footer line
fn credentials_form(markup: &mut Markup, view: &AuthView, id: &str, title: &str, action: Action) {
    let email_id = format!("{id}-email");
    let password_id = format!("{id}-password");

    markup
        .raw(r#"<div class="max-w-md mx-auto bg-white p-6 rounded-lg shadow-md">"#)
        .raw(&format!(r#"<h2 class="text-2xl font-bold mb-4">{title}</h2>"#))
        .form_start("space-y-4")
        .input(
            Input::text(&email_id, "email", "Email", &view.email)
                .kind("email")
                .required(),
        )
        .input(
            Input::text(&password_id, "password", "Password", "")
                .kind("password")
                .required(),
        )
        .submit(action, title, "button w-full", title)
        .form_end();
}
