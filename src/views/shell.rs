//! Document shell: head, top navigation, client payload, and footer.

use leptos::prelude::*;
use serde::Serialize;
use tracing::error;

use crate::store::{EventWithGroup, Group, User};

/// Configuration exposed to client-side code as `window.ENV`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientEnv {
    #[serde(rename = "PUBLIC_GOOGLE_CLIENT_ID")]
    pub public_google_client_id: Option<String>,
}

/// Everything the root loader resolves for a page.
#[derive(Debug, Clone, Serialize)]
pub struct RootData {
    #[serde(rename = "ENV")]
    pub env: ClientEnv,
    #[serde(rename = "currentUser")]
    pub current_user: Option<User>,
    pub events: Vec<EventWithGroup>,
    pub groups: Vec<Group>,
}

/// Serialize for embedding inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        // `<` is the only character that can end a script element early.
        Ok(json) => json.replace('<', "\\u003c"),
        Err(err) => {
            error!("Failed to serialize page data: {err}");
            "null".to_string()
        }
    }
}

/// Wraps a page with the document head, top navigation, and footer.
///
/// Without `data` the page carries no client payload, which is how error
/// pages render when the loader itself failed.
#[component]
pub fn Shell(
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional)] data: Option<RootData>,
    children: Children,
) -> impl IntoView {
    let email = data
        .as_ref()
        .and_then(|data| data.current_user.as_ref())
        .map(|user| user.email.clone());
    let scripts = data.map(|data| {
        let env = format!("window.ENV = {};", script_json(&data.env));
        let payload = script_json(&data);
        view! {
            <script inner_html=env></script>
            <script id="root-data" type="application/json" inner_html=payload></script>
        }
    });

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width,initial-scale=1" />
                {title.map(|title| view! { <title>{title}</title> })}
            </head>
            <body class="min-h-screen w-full flex flex-col">
                <TopNav email=email />
                {children()}
                {scripts}
                <Footer />
            </body>
        </html>
    }
}

#[component]
fn TopNav(email: Option<String>) -> impl IntoView {
    let items = match email {
        Some(email) => view! {
            <li>
                <span class="font-medium">{email}</span>
            </li>
            <li>
                <form method="post" action="/logout">
                    <button type="submit" class="hover:underline">
                        "Log Out"
                    </button>
                </form>
            </li>
        }
        .into_any(),
        None => view! {
            <li>
                <a href="/login" class="hover:underline">
                    "Log In"
                </a>
            </li>
        }
        .into_any(),
    };

    view! {
        <header class="w-full border-b border-gray-200">
            <nav class="mx-auto flex max-w-screen-xl items-center justify-between p-4">
                <a href="/" class="text-xl font-semibold">
                    "Plan It Social"
                </a>
                <ul class="flex items-center gap-6">{items}</ul>
            </nav>
        </header>
    }
}

#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="mt-auto w-full border-t border-gray-200 p-4 text-center text-sm text-gray-500">
            <p>"Plan It Social · find your people, plan your plans."</p>
        </footer>
    }
}
