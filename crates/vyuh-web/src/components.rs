//! UI Components

use leptos::prelude::*;

use crate::api::AgentInfo;

/// Display name derived from a catalog key ("researcher" -> "Researcher")
pub fn agent_display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// One agent in the catalog grid, with its add/remove control
#[component]
pub fn AgentCard(
    id: String,
    agent: AgentInfo,
    #[prop(into)] selected: Signal<bool>,
    on_toggle: Callback<String>,
) -> impl IntoView {
    let name = agent_display_name(&id);
    let toggle_id = id.clone();

    view! {
        <div class="agent-card" class:selected=move || selected.get()>
            <h4 class="agent-name">{name}</h4>
            <p class="agent-role">{agent.role.clone()}</p>
            <p class="agent-goal">{agent.goal.clone()}</p>
            {agent
                .backstory
                .clone()
                .map(|backstory| view! { <p class="agent-backstory">{backstory}</p> })}
            <button
                class="toggle-btn"
                on:click=move |_| on_toggle.run(toggle_id.clone())
            >
                {move || if selected.get() { "Remove from Crew" } else { "Add to Crew" }}
            </button>
        </div>
    }
}

/// Selected-crew summary with the launch control
#[component]
pub fn CrewCart(
    #[prop(into)] crew: Signal<Vec<String>>,
    #[prop(into)] launch_disabled: Signal<bool>,
    #[prop(into)] launch_loading: Signal<bool>,
    on_remove: Callback<String>,
    on_launch: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="crew-cart">
            <div class="crew-cart-header">
                <h3>"Selected Crew"</h3>
                <span class="crew-count">
                    {move || format!("{} agent(s)", crew.get().len())}
                </span>
            </div>

            <Show
                when=move || !crew.get().is_empty()
                fallback=|| {
                    view! {
                        <div class="crew-cart-empty">
                            <p>"No agents selected"</p>
                            <span>"Add agents to your crew to get started"</span>
                        </div>
                    }
                }
            >
                <div class="crew-list">
                    <For
                        each=move || crew.get()
                        key=|id| id.clone()
                        children=move |id: String| {
                            let name = agent_display_name(&id);
                            let remove_id = id.clone();
                            view! {
                                <div class="crew-item">
                                    <span class="crew-agent-name">{name}</span>
                                    <button
                                        class="remove-btn"
                                        on:click=move |_| on_remove.run(remove_id.clone())
                                    >
                                        "×"
                                    </button>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>

            <div class="crew-cart-footer">
                <button
                    class="launch-crew-btn"
                    disabled=move || launch_disabled.get()
                    on:click=move |_| on_launch.run(())
                >
                    {move || if launch_loading.get() { "Launching..." } else { "Launch Crew" }}
                </button>
            </div>
        </div>
    }
}

/// Result area: polling indicator, result text, and the reset control
#[component]
pub fn ResultPanel(
    #[prop(into)] session_id: Signal<Option<String>>,
    #[prop(into)] polling: Signal<bool>,
    #[prop(into)] result: Signal<Option<String>>,
    on_reset: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="result-section">
            <div class="result-header">
                <h3>"Crew Execution Result"</h3>
                {move || {
                    session_id
                        .get()
                        .map(|sid| view! { <span class="session-id">"Session: " {sid}</span> })
                }}
            </div>

            <Show when=move || polling.get() && result.get().is_none()>
                <div class="result-loading">
                    <div class="loading-spinner"></div>
                    <p>"Executing crew... This may take a few moments."</p>
                </div>
            </Show>

            <Show when=move || result.get().is_some()>
                <div class="result-content">
                    <textarea
                        class="result-textarea"
                        readonly=true
                        prop:value=move || result.get().unwrap_or_default()
                    />
                    <div class="result-actions">
                        <button class="reset-btn" on:click=move |_| on_reset.run(())>
                            "Start Over"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
