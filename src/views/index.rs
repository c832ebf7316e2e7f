use leptos::prelude::*;

use super::{RootData, Shell, render_document};
use crate::store::{EventWithGroup, Group};

/// Landing page: upcoming events and groups.
#[component]
pub fn IndexPage(events: Vec<EventWithGroup>, groups: Vec<Group>) -> impl IntoView {
    let events = if events.is_empty() {
        view! { <p class="text-gray-500">"No events planned yet."</p> }.into_any()
    } else {
        let items = events
            .into_iter()
            .map(|item| {
                let iso = item.event.starts_at.to_rfc3339();
                let when = item
                    .event
                    .starts_at
                    .format("%a %b %-d, %Y %H:%M UTC")
                    .to_string();
                view! {
                    <li class="py-2">
                        <span class="font-medium">{item.event.title}</span>
                        <span class="text-gray-600">{format!(" · {} · ", item.group.name)}</span>
                        <time datetime=iso>{when}</time>
                    </li>
                }
            })
            .collect_view();
        view! { <ul class="divide-y">{items}</ul> }.into_any()
    };

    let groups = if groups.is_empty() {
        view! { <p class="text-gray-500">"No groups yet."</p> }.into_any()
    } else {
        let items = groups
            .into_iter()
            .map(|group| view! { <li class="py-2">{group.name}</li> })
            .collect_view();
        view! { <ul class="divide-y">{items}</ul> }.into_any()
    };

    view! {
        <main class="mx-auto w-full max-w-screen-xl flex-1 p-4">
            <section>
                <h2 class="text-2xl font-semibold">"Upcoming events"</h2>
                {events}
            </section>
            <section class="mt-8">
                <h2 class="text-2xl font-semibold">"Groups"</h2>
                {groups}
            </section>
        </main>
    }
}

/// Full document for `/`.
#[must_use]
pub fn index_document(data: &RootData) -> String {
    let shell_data = data.clone();
    let events = data.events.clone();
    let groups = data.groups.clone();
    render_document(move || {
        view! {
            <Shell title="Plan It Social" data=shell_data>
                <IndexPage events=events groups=groups />
            </Shell>
        }
    })
}
