//! 页面外壳：顶部导航栏 + 内容区

use crate::auth::{logout, use_auth};
use crate::web::router::{Link, NavLink};
use chamada_shared::can_view_people_directory;
use leptos::prelude::*;

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();

    let can_view_people = move || auth.state.with(|s| can_view_people_directory(s.user.as_ref()));
    let display_name = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.display_name().to_string()))
            .unwrap_or_default()
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <header class="navbar bg-base-100 shadow-xl">
                <div class="flex-1 gap-2">
                    <Link to="/" class="btn btn-ghost text-xl">"Chamada"</Link>
                    <nav class="flex gap-1">
                        <NavLink to="/turmas" label="Turmas" />
                        <Show when=can_view_people>
                            <NavLink to="/pessoas" label="Pessoas" />
                        </Show>
                    </nav>
                </div>
                <div class="flex-none gap-2">
                    <span class="badge badge-neutral">{display_name}</span>
                    <button on:click=move |_| logout(&auth) class="btn btn-outline btn-sm">
                        "Sair"
                    </button>
                </div>
            </header>
            <main class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">{children()}</main>
        </div>
    }
}
