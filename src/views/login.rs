use leptos::prelude::*;

use super::{RootData, Shell, render_document};

/// Login card. `message` is the failure from the previous submission, if any.
#[component]
pub fn LoginForm(message: Option<String>) -> impl IntoView {
    view! {
        <main class="flex w-full flex-1 items-center justify-center">
            <div class="w-full max-w-[400px]">
                <div class="rounded-lg border border-gray-200 p-6 shadow">
                    <form
                        method="post"
                        action="/login"
                        class="flex w-full flex-col items-center justify-center gap-5"
                    >
                        <h1 class="text-4xl">"Log In"</h1>
                        <label class="flex w-full flex-col gap-1">
                            "Email"
                            <input
                                name="email"
                                type="email"
                                autocomplete="email"
                                placeholder="Email"
                                required
                            />
                        </label>
                        <label class="flex w-full flex-col gap-1">
                            "Password"
                            <input name="password" type="password" placeholder="Password" required />
                        </label>
                        <button type="submit">"Log In"</button>
                        {message.map(|message| view! { <p class="text-red-500">{message}</p> })}
                        <p>"New here? " <a href="/signup">"Sign up"</a></p>
                    </form>
                </div>
            </div>
        </main>
    }
}

/// Full document for `/login`.
#[must_use]
pub fn login_document(data: &RootData, message: Option<&str>) -> String {
    let data = data.clone();
    let message = message.map(ToString::to_string);
    render_document(move || {
        view! {
            <Shell title="Log In" data=data>
                <LoginForm message=message />
            </Shell>
        }
    })
}
