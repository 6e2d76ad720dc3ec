//! Built-in HTML pages for the account views

use super::ViewRenderer;
use crate::domain::account::{
    FormEcho, FormField, View, ViewName, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH,
};
use crate::domain::session::SessionUser;

/// Renders views as self-contained HTML documents
#[derive(Debug, Clone, Default)]
pub struct HtmlViewRenderer;

impl HtmlViewRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ViewRenderer for HtmlViewRenderer {
    fn render(&self, view: &View) -> String {
        let body = match view.name {
            ViewName::Register => registration_form(view),
            ViewName::Login => login_form(view),
            ViewName::Home => home(view.current_user.as_ref()),
            ViewName::Dashboard => dashboard(view.current_user.as_ref()),
        };

        layout(title(view.name), view.current_user.as_ref(), &body)
    }
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

fn title(name: ViewName) -> &'static str {
    match name {
        ViewName::Register => "Create an account",
        ViewName::Login => "Log in",
        ViewName::Home => "Home",
        ViewName::Dashboard => "Dashboard",
    }
}

fn layout(title: &str, current_user: Option<&SessionUser>, body: &str) -> String {
    let nav = match current_user {
        Some(user) => format!(
            "<span>Signed in as {}</span> <a href=\"/dashboard\">Dashboard</a> \
             <form method=\"post\" action=\"{}\" style=\"display:inline\">\
             <button type=\"submit\">Log out</button></form>",
            escape_html(user.display_name()),
            LOGOUT_PATH,
        ),
        None => format!(
            "<a href=\"{}\">Log in</a> <a href=\"{}\">Register</a>",
            LOGIN_PATH, REGISTER_PATH
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>.error{{color:#b00020}} label{{display:block;margin-top:.5em}}</style>\n\
         </head>\n<body>\n<nav><a href=\"/\">Home</a> {nav}</nav>\n<main>\n<h1>{title}</h1>\n{body}</main>\n</body>\n</html>\n",
        title = escape_html(title),
        nav = nav,
        body = body,
    )
}

fn error_summary(view: &View) -> String {
    let Some(errors) = view.errors.as_ref().filter(|errors| !errors.is_empty()) else {
        return String::new();
    };

    let mut html = String::from("<ul class=\"error\">\n");
    for (field, message) in errors.iter() {
        html.push_str(&format!(
            "<li data-field=\"{}\">{}</li>\n",
            field,
            escape_html(message)
        ));
    }
    html.push_str("</ul>\n");
    html
}

/// Text input pre-filled from the echoed submission
fn text_input(
    view: &View,
    field: FormField,
    label: &str,
    input_type: &str,
    value: Option<&str>,
) -> String {
    let mut html = format!(
        "<label for=\"{name}\">{label}</label>\n<input id=\"{name}\" name=\"{name}\" type=\"{input_type}\" value=\"{value}\">\n",
        name = field,
        label = escape_html(label),
        input_type = input_type,
        value = escape_html(value.unwrap_or_default()),
    );

    if let Some(message) = view.error(field) {
        html.push_str(&format!(
            "<span class=\"error\">{}</span>\n",
            escape_html(message)
        ));
    }

    html
}

/// Password inputs are always rendered empty
fn password_input(view: &View, field: FormField, label: &str) -> String {
    text_input(view, field, label, "password", None)
}

fn registration_form(view: &View) -> String {
    let echo = view.user.clone().unwrap_or_default();
    let FormEcho {
        given_name,
        family_name,
        nickname,
        email,
        city,
        state,
    } = &echo;

    let mut html = error_summary(view);
    html.push_str(&format!("<form method=\"post\" action=\"{}\">\n", REGISTER_PATH));
    html.push_str(&text_input(view, FormField::GivenName, "Given Name", "text", given_name.as_deref()));
    html.push_str(&text_input(view, FormField::FamilyName, "Family Name", "text", family_name.as_deref()));
    html.push_str(&text_input(view, FormField::Nickname, "Nickname", "text", nickname.as_deref()));
    html.push_str(&text_input(view, FormField::Email, "Email", "email", email.as_deref()));
    html.push_str(&text_input(view, FormField::City, "City", "text", city.as_deref()));
    html.push_str(&text_input(view, FormField::State, "State", "text", state.as_deref()));
    html.push_str(&password_input(view, FormField::Password, "Password"));
    html.push_str(&password_input(view, FormField::PasswordConfirmation, "Confirm Password"));
    html.push_str("<button type=\"submit\">Register</button>\n</form>\n");
    html.push_str(&format!(
        "<p>Already registered? <a href=\"{}\">Log in</a></p>\n",
        LOGIN_PATH
    ));

    html
}

fn login_form(view: &View) -> String {
    let email = view.user.as_ref().and_then(|echo| echo.email.as_deref());

    let mut html = error_summary(view);
    html.push_str(&format!("<form method=\"post\" action=\"{}\">\n", LOGIN_PATH));
    html.push_str(&text_input(view, FormField::Email, "Email", "email", email));
    html.push_str(&password_input(view, FormField::Password, "Password"));
    html.push_str("<button type=\"submit\">Log in</button>\n</form>\n");
    html.push_str(&format!(
        "<p>No account yet? <a href=\"{}\">Register</a></p>\n",
        REGISTER_PATH
    ));

    html
}

fn home(current_user: Option<&SessionUser>) -> String {
    match current_user {
        Some(user) => format!(
            "<p>Welcome back, {}.</p>\n",
            escape_html(user.display_name())
        ),
        None => format!(
            "<p>Welcome. <a href=\"{}\">Log in</a> or <a href=\"{}\">create an account</a>.</p>\n",
            LOGIN_PATH, REGISTER_PATH
        ),
    }
}

fn dashboard(current_user: Option<&SessionUser>) -> String {
    let Some(user) = current_user else {
        return home(None);
    };

    let mut html = String::from("<dl>\n");
    let mut row = |label: &str, value: Option<&str>| {
        if let Some(value) = value {
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                label,
                escape_html(value)
            ));
        }
    };

    row("Name", Some(user.given_name.as_str()));
    row("Family Name", user.family_name.as_deref());
    row("Nickname", user.nickname.as_deref());
    row("Email", Some(user.email.as_str()));
    row("City", user.city.as_deref());
    row("State", user.state.as_deref());

    html.push_str("</dl>\n");
    html
}
