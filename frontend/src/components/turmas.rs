use crate::api::use_api;
use crate::components::feedback::{Empty, ErrorAlert, LoadState, Loading};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use chamada_shared::ClassInfo;
use chamada_shared::ticket::RequestTracker;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TurmasPage() -> impl IntoView {
    let api = use_api();
    let (classes, set_classes) = signal(LoadState::<Vec<ClassInfo>>::Loading);

    let tracker = RequestTracker::new();
    let ticket = tracker.begin();
    on_cleanup({
        let tracker = tracker.clone();
        move || tracker.invalidate()
    });

    spawn_local(async move {
        let result = api.list_classes().await;
        if !tracker.is_current(ticket) {
            return;
        }
        set_classes.try_set(match result {
            Ok(list) => LoadState::Ready(list),
            Err(e) => {
                warn!("[Chamada] Failed to load classes: {}", e);
                LoadState::Failed(e.message_or("Erro ao carregar turmas"))
            }
        });
    });

    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Turmas"</h2>
            {move || match classes.get() {
                LoadState::Loading => view! { <Loading /> }.into_any(),
                LoadState::Failed(message) => view! { <ErrorAlert message=message /> }.into_any(),
                LoadState::Ready(list) if list.is_empty() => {
                    view! { <Empty message="Nenhuma turma encontrada." /> }.into_any()
                }
                LoadState::Ready(list) => view! {
                    <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">
                        {list.into_iter().map(|class| view! { <ClassCard class=class /> }).collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn ClassCard(class: ClassInfo) -> impl IntoView {
    let href = AppRoute::ClassDetail { id: class.id.clone() }.to_path();
    let schedule = class.schedule_label(" – ");

    view! {
        <Link to=href class="card bg-base-100 shadow-xl hover:shadow-2xl transition-shadow">
            <div class="card-body">
                <h3 class="card-title">{class.name}</h3>
                {class.description.filter(|d| !d.is_empty()).map(|d| view! {
                    <p class="text-base-content/70 text-sm">{d}</p>
                })}
                <p class="text-sm">{schedule}</p>
                <p class="text-sm text-base-content/70">{class.owner.full_name}</p>
            </div>
        </Link>
    }
}
