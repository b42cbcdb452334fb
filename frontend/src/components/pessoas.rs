use crate::api::use_api;
use crate::components::feedback::{Empty, ErrorAlert, LoadState, Loading};
use chamada_shared::Person;
use chamada_shared::protocol::{PeopleFilter, PersonTypeFilter};
use chamada_shared::ticket::RequestTracker;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn PessoasPage() -> impl IntoView {
    let api = use_api();

    let (person_type, set_person_type) = signal(PersonTypeFilter::All);
    let (query, set_query) = signal(String::new());
    let (people, set_people) = signal(LoadState::<Vec<Person>>::Loading);

    let tracker = RequestTracker::new();
    on_cleanup({
        let tracker = tracker.clone();
        move || tracker.invalidate()
    });

    // 筛选条件变化时重新请求，过期的响应直接丢弃
    Effect::new(move |_| {
        let filter = PeopleFilter {
            person_type: person_type.get(),
            query: query.get(),
        };
        let ticket = tracker.begin();
        set_people.set(LoadState::Loading);

        let api = api.clone();
        let tracker = tracker.clone();
        spawn_local(async move {
            let result = api.list_people(&filter).await;
            if !tracker.is_current(ticket) {
                return;
            }
            set_people.try_set(match result {
                Ok(list) => LoadState::Ready(list),
                Err(e) => {
                    warn!("[Chamada] Failed to load people: {}", e);
                    LoadState::Failed(e.message_or("Erro ao carregar pessoas"))
                }
            });
        });
    });

    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Pessoas"</h2>
            <div class="flex flex-col md:flex-row gap-2">
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        set_person_type.set(PersonTypeFilter::from_param(&event_target_value(&ev)))
                    }
                >
                    {PersonTypeFilter::ALL
                        .iter()
                        .map(|filter| {
                            let filter = *filter;
                            view! {
                                <option
                                    value=filter.as_param().unwrap_or("")
                                    selected=move || person_type.get() == filter
                                >
                                    {filter.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <input
                    type="search"
                    placeholder="Buscar por nome"
                    class="input input-bordered flex-1"
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                    prop:value=query
                />
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    {move || match people.get() {
                        LoadState::Loading => view! { <Loading /> }.into_any(),
                        LoadState::Failed(message) => {
                            view! { <div class="p-4"><ErrorAlert message=message /></div> }.into_any()
                        }
                        LoadState::Ready(list) if list.is_empty() => {
                            view! { <Empty message="Nenhuma pessoa encontrada." /> }.into_any()
                        }
                        LoadState::Ready(list) => view! { <PeopleTable people=list /> }.into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn PeopleTable(people: Vec<Person>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Nome"</th>
                        <th>"E-mail"</th>
                        <th class="hidden md:table-cell">"Telefone"</th>
                        <th>"Tipo"</th>
                        <th>"Situação"</th>
                        <th>"Função"</th>
                    </tr>
                </thead>
                <tbody>
                    {people
                        .into_iter()
                        .map(|person| {
                            let worker = person.worker_label().unwrap_or_else(|| "—".to_string());
                            view! {
                                <tr>
                                    <td>{person.full_name}</td>
                                    <td>{person.email.unwrap_or_else(|| "—".to_string())}</td>
                                    <td class="hidden md:table-cell">
                                        {person.phone.unwrap_or_else(|| "—".to_string())}
                                    </td>
                                    <td>{person.person_type}</td>
                                    <td>{person.status}</td>
                                    <td>{worker}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}
