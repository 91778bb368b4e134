//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Vyuh"</h1>
                <p class="tagline">"Build and launch collaborative AI agent crews"</p>
                <div class="cta">
                    <a href="/builder" class="btn btn-primary">"Open Crew Builder"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"🧩 Compose"</h3>
                    <p>"Pick researchers, writers, and analysts from a curated agent catalog."</p>
                </div>
                <div class="feature">
                    <h3>"🚀 Launch"</h3>
                    <p>"Submit a topic and let your crew work on it together."</p>
                </div>
                <div class="feature">
                    <h3>"📄 Collect"</h3>
                    <p>"Get the generated result back in one place, ready to reuse."</p>
                </div>
            </section>
        </div>
    }
}
