//! Crew Builder Page
//!
//! The one stateful screen: catalog grid, crew selection, topic input,
//! launch, and the polled result. Network and timer effects all start and
//! stop here; the components below render state only.

use std::time::Duration;

use leptos::prelude::*;

use crate::api::{self, AgentInfo};
use crate::components::{AgentCard, CrewCart, ResultPanel};
use crate::identity::Identity;

/// Fixed delay between result polls
const POLL_INTERVAL_MS: u64 = 2000;

#[component]
pub fn BuilderPage() -> impl IntoView {
    let identity = use_context::<Identity>().unwrap_or_default();
    let authenticated = identity.is_authenticated();
    let greeting = identity.greeting_name().to_string();

    // Catalog loader state
    let (agents, set_agents) = signal(None::<api::AgentMap>);
    let (catalog_loading, set_catalog_loading) = signal(true);
    let (catalog_error, set_catalog_error) = signal(None::<String>);

    // Crew selection and topic
    let (crew, set_crew) = signal(Vec::<String>::new());
    let (topic, set_topic) = signal(String::new());

    // Launch and result state
    let (launch_loading, set_launch_loading) = signal(false);
    let (launch_error, set_launch_error) = signal(None::<String>);
    let (session_id, set_session_id) = signal(None::<String>);
    let (result, set_result) = signal(None::<String>);
    let (polling, set_polling) = signal(false);

    // Handle of the active poll timer; cleared on every exit path
    let poll_handle = StoredValue::new(None::<IntervalHandle>);

    let stop_polling = move || {
        if let Some(handle) = poll_handle.get_value() {
            handle.clear();
            poll_handle.set_value(None);
        }
        set_polling.set(false);
    };

    let load_agents = move || {
        set_catalog_loading.set(true);
        leptos::task::spawn_local(async move {
            match api::fetch_agents().await {
                Ok(data) => {
                    set_agents.set(Some(data));
                    set_catalog_error.set(None);
                }
                Err(e) => set_catalog_error.set(Some(e)),
            }
            set_catalog_loading.set(false);
        });
    };

    // One fetch at mount; afterwards only the retry button re-invokes it
    load_agents();

    let start_polling = move |sid: String| {
        set_polling.set(true);
        let interval = set_interval_with_handle(
            move || {
                let sid = sid.clone();
                leptos::task::spawn_local(async move {
                    match api::fetch_result(&sid).await {
                        Ok(Some(content)) => {
                            set_result.set(Some(content));
                            stop_polling();
                        }
                        // Not ready yet; the interval fires again
                        Ok(None) => {}
                        Err(e) => {
                            set_launch_error.set(Some(e));
                            stop_polling();
                        }
                    }
                });
            },
            Duration::from_millis(POLL_INTERVAL_MS),
        );
        match interval {
            Ok(handle) => poll_handle.set_value(Some(handle)),
            Err(_) => set_polling.set(false),
        }
    };

    let launch = move || {
        if launch_loading.get() {
            return;
        }
        let ids = crew.get();
        let trimmed = topic.get().trim().to_string();
        if ids.is_empty() || trimmed.is_empty() {
            set_launch_error.set(Some(
                "Please select at least one agent and enter a topic".into(),
            ));
            return;
        }

        set_launch_error.set(None);
        set_launch_loading.set(true);
        leptos::task::spawn_local(async move {
            match api::launch_crew(&ids, &trimmed).await {
                Ok(data) => {
                    set_session_id.set(Some(data.session_id.clone()));
                    match data.data {
                        Some(text) => set_result.set(Some(text)),
                        None => start_polling(data.session_id),
                    }
                }
                Err(e) => set_launch_error.set(Some(e)),
            }
            set_launch_loading.set(false);
        });
    };

    let reset = move || {
        stop_polling();
        set_crew.set(Vec::new());
        set_topic.set(String::new());
        set_session_id.set(None);
        set_result.set(None);
        set_launch_error.set(None);
    };

    // Never leave the timer running past this page's lifetime
    on_cleanup(stop_polling);

    let toggle_agent = move |id: String| {
        set_crew.update(|ids| {
            if let Some(pos) = ids.iter().position(|existing| *existing == id) {
                ids.remove(pos);
            } else {
                ids.push(id);
            }
        });
    };

    let launch_disabled = Signal::derive(move || {
        crew.get().is_empty() || topic.get().trim().is_empty() || launch_loading.get()
    });

    view! {
        <div class="crew-builder">
            <header class="builder-header">
                <div class="header-left">
                    <h1>"Vyuh Crew Builder"</h1>
                    <p>"Build and launch collaborative AI agent crews"</p>
                </div>
                <div class="header-right">
                    <span class="user-info">"Welcome, " {greeting.clone()} "!"</span>
                </div>
            </header>

            <Show
                when=move || authenticated
                fallback=|| {
                    view! {
                        <div class="auth-notice">
                            <p>"Please sign in to build and launch crews."</p>
                        </div>
                    }
                }
            >
                <Show when=move || catalog_loading.get()>
                    <div class="loading-container">
                        <div class="loading-spinner"></div>
                        <p>"Loading available agents..."</p>
                    </div>
                </Show>

                <Show when=move || !catalog_loading.get() && catalog_error.get().is_some()>
                    <div class="error-container">
                        <h3>"Error Loading Agents"</h3>
                        <p>{move || catalog_error.get().unwrap_or_default()}</p>
                        <button class="retry-btn" on:click=move |_| load_agents()>
                            "Retry"
                        </button>
                    </div>
                </Show>

                <Show when=move || !catalog_loading.get() && catalog_error.get().is_none()>
                    <div class="agents-section">
                        <h2>"Available Agents"</h2>
                        <p>"Select agents to add to your crew"</p>
                        <div class="agents-grid">
                            <For
                                each=move || {
                                    agents
                                        .get()
                                        .map(|m| m.into_iter().collect::<Vec<_>>())
                                        .unwrap_or_default()
                                }
                                key=|(id, _)| id.clone()
                                children=move |(id, agent): (String, AgentInfo)| {
                                    let selected_id = id.clone();
                                    view! {
                                        <AgentCard
                                            id=id
                                            agent=agent
                                            selected=Signal::derive(move || {
                                                crew.get().contains(&selected_id)
                                            })
                                            on_toggle=Callback::new(toggle_agent)
                                        />
                                    }
                                }
                            />
                        </div>
                    </div>

                    <div class="topic-input-section">
                        <label class="topic-label" for="topic-input">"Your Idea"</label>
                        <textarea
                            id="topic-input"
                            class="topic-input"
                            placeholder="Enter your topic or idea..."
                            prop:value=move || topic.get()
                            on:input=move |ev| set_topic.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="crew-section">
                        <CrewCart
                            crew=crew
                            launch_disabled=launch_disabled
                            launch_loading=launch_loading
                            on_remove=Callback::new(toggle_agent)
                            on_launch=Callback::new(move |()| launch())
                        />
                    </div>

                    <Show when=move || launch_error.get().is_some()>
                        <div class="error launch-error">
                            <p>{move || launch_error.get().unwrap_or_default()}</p>
                        </div>
                    </Show>

                    <Show when=move || session_id.get().is_some() || result.get().is_some()>
                        <ResultPanel
                            session_id=session_id
                            polling=polling
                            result=result
                            on_reset=Callback::new(move |()| reset())
                        />
                    </Show>
                </Show>
            </Show>
        </div>
    }
}
