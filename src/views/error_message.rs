use leptos::prelude::*;

/// Red-bordered alert box used by every error page.
#[component]
pub fn ErrorMessage(children: Children) -> impl IntoView {
    view! {
        <div class="m-6 flex items-center justify-center">
            <div
                class="relative w-auto justify-center self-center rounded border border-red-600 bg-red-100 px-4 py-3 text-center"
                role="alert"
            >
                <div class="block md:inline font-medium">{children()}</div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::render_fragment;

    #[test]
    fn wraps_content_in_alert() {
        let html = render_fragment(|| {
            view! {
                <ErrorMessage>
                    <h1>"Error"</h1>
                </ErrorMessage>
            }
        });
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("border-red-600"));
        assert!(html.contains("<h1>Error</h1>"));
    }
}
