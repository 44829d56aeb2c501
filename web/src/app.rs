use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::cache::BrowserCache;
use crate::client::HttpCounterApi;
use crate::interest::{self, InterestCell, InterestState, Notice, interested_phrase};

const FEATURES: [(&str, &str); 4] = [
    (
        "Seamless Access",
        "Minimal login, no personal data retained",
    ),
    (
        "Campus-Wide Hyperlocal Feed",
        "Connect with students on your campus and nearby universities",
    ),
    (
        "AI-Powered Profanity & Abuse Filtering",
        "Smart content moderation for a safer community experience",
    ),
    (
        "Student Community",
        "Built exclusively for university students, by students",
    ),
];

impl InterestCell for RwSignal<InterestState> {
    fn with_state<R>(&self, f: impl FnOnce(&mut InterestState) -> R) -> Option<R> {
        self.try_update(f)
    }
}

#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(InterestState::restore(&BrowserCache::new()));
    let notice = RwSignal::new(None::<Notice>);

    spawn_local(async move {
        let shown = interest::load(&state, &HttpCounterApi::same_origin(), &BrowserCache::new()).await;
        if shown.is_some() {
            notice.set(shown);
        }
    });

    let on_click = move |_| {
        spawn_local(async move {
            let shown = interest::vote(&state, &HttpCounterApi::same_origin(), &BrowserCache::new()).await;
            if shown.is_some() {
                notice.set(shown);
            }
        });
    };

    view! {
        <main class="landing">
            <header>
                <span class="brand">"CollegeConnect"</span>
                <span class="badge">"Coming soon to Shoolini University"</span>
            </header>
            <section class="hero">
                <h1>"Your campus, connected."</h1>
                <p>"A hyperlocal space for students to meet, talk and share what's happening around campus."</p>
                <button on:click=on_click disabled=move || !state.with(InterestState::can_vote)>
                    {move || if state.with(|s| s.has_voted) { "Thanks for your interest!" } else { "I'm interested" }}
                </button>
                <p class="count">
                    {move || match state.with(InterestState::displayed_count) {
                        Some(count) => format!("{count} {} already interested", interested_phrase(count)),
                        None => "Counting interested students…".to_string(),
                    }}
                </p>
                <Show when=move || state.with(|s| s.has_voted)>
                    <p class="voted">"We'll notify you when CollegeConnect launches!"</p>
                </Show>
            </section>
            <ul class="features">
                {FEATURES
                    .iter()
                    .map(|(title, description)| view! {
                        <li>
                            <h3>{*title}</h3>
                            <p>{*description}</p>
                        </li>
                    })
                    .collect_view()}
            </ul>
            {move || notice.get().map(|n| view! {
                <div class=format!("notice {}", n.kind.css_class()) on:click=move |_| notice.set(None)>
                    <strong>{n.title}</strong>
                    <p>{n.description}</p>
                </div>
            })}
        </main>
    }
}
