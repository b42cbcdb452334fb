//! 班级详情与点名流程
//!
//! 班级加载与会话打开是两条独立的状态线：
//! 班级加载失败是终态；打开会话失败可以修改日期后重试。

mod attendance_grid;
mod justify_dialog;

use crate::api::{use_api, use_config};
use crate::components::feedback::{ErrorAlert, LoadState, Loading, Toast, show_toast};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use attendance_grid::AttendanceGrid;
use chamada_shared::attendance::{AttendanceIndex, ChamadaState, filter_members};
use chamada_shared::date::{format_date_input, parse_date_input, today_in};
use chamada_shared::ticket::RequestTracker;
use chamada_shared::{AttendanceStatus, ClassInfo, Member};
use justify_dialog::JustifyDialog;
use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TurmaDetalhePage(class_id: String) -> impl IntoView {
    let api = use_api();
    let (class, set_class) = signal(LoadState::<Option<ClassInfo>>::Loading);

    let tracker = RequestTracker::new();
    let ticket = tracker.begin();
    on_cleanup({
        let tracker = tracker.clone();
        move || tracker.invalidate()
    });

    {
        let class_id = class_id.clone();
        spawn_local(async move {
            let result = api.find_class(&class_id).await;
            if !tracker.is_current(ticket) {
                return;
            }
            set_class.try_set(match result {
                Ok(found) => LoadState::Ready(found),
                Err(e) => {
                    warn!("[Chamada] Failed to load class {}: {}", class_id, e);
                    LoadState::Failed(e.message_or("Erro ao carregar turma"))
                }
            });
        });
    }

    view! {
        <div class="space-y-4">
            <Link to="/turmas" class="link link-hover text-sm">"← Voltar para turmas"</Link>
            {move || match class.get() {
                LoadState::Loading => view! { <Loading /> }.into_any(),
                LoadState::Failed(message) => view! { <ErrorAlert message=message /> }.into_any(),
                LoadState::Ready(None) => {
                    view! { <ErrorAlert message="Turma não encontrada." /> }.into_any()
                }
                LoadState::Ready(Some(info)) => view! {
                    <ClassHeader class=info />
                    <ChamadaPanel class_id=class_id.clone() />
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn ClassHeader(class: ClassInfo) -> impl IntoView {
    let schedule = class.schedule_label(" – ");

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title text-2xl">{class.name}</h2>
                {class.description.filter(|d| !d.is_empty()).map(|d| view! {
                    <p class="text-base-content/70">{d}</p>
                })}
                <p class="text-sm">{schedule}</p>
                <p class="text-sm text-base-content/70">{class.owner.full_name}</p>
            </div>
        </div>
    }
}

#[component]
fn ChamadaPanel(class_id: String) -> impl IntoView {
    let api = use_api();
    let config = use_config();

    let (date, set_date) = signal(format_date_input(today_in(config.timezone)));
    let (open_error, set_open_error) = signal(Option::<String>::None);
    let (search, set_search) = signal(String::new());
    let chamada = RwSignal::new(ChamadaState::new());
    let justify_target = RwSignal::new(Option::<Member>::None);
    let toast = RwSignal::new(Option::<String>::None);
    let opening = Memo::new(move |_| chamada.with(|c| c.is_opening()));

    // --- 打开会话 ---
    let on_open = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(session_date) = parse_date_input(&date.get_untracked()) else {
                set_open_error.set(Some("Data inválida".to_string()));
                return;
            };
            // 请求未完成时忽略重复提交
            if !chamada.try_update(|c| c.begin_open()).unwrap_or(false) {
                return;
            }
            set_open_error.set(None);

            let api = api.clone();
            let class_id = class_id.clone();
            spawn_local(async move {
                match api.open_chamada(&class_id, session_date).await {
                    Ok((session, summary)) => {
                        chamada.try_update(|c| c.open_succeeded(session, summary));
                    }
                    Err(e) => {
                        warn!("[Chamada] Failed to open session: {}", e);
                        chamada.try_update(|c| c.open_failed());
                        set_open_error.try_set(Some(e.message_or("Erro ao abrir chamada")));
                    }
                }
            });
        }
    };

    // --- 更新出勤 ---
    // 写入成功后使用服务端返回的读取结果；失败时保留上一次的权威状态
    let update = move |participant_id: String, status: AttendanceStatus, reason: Option<String>| {
        let Some((session_id, seq)) = chamada.try_update(|c| c.begin_write()).flatten() else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            let result = api
                .record_attendance(&session_id, &participant_id, status, reason.as_deref())
                .await;
            match result {
                Ok(summary) => {
                    chamada.try_update(|c| c.apply_read(&session_id, seq, summary));
                }
                Err(e) => {
                    error!(
                        "[Chamada] Failed to set {} for {}: {}",
                        status.as_str(),
                        participant_id,
                        e
                    );
                    show_toast(toast, e.message_or("Erro ao atualizar presença"));
                }
            }
        });
    };

    let on_mark = {
        let update = update.clone();
        Callback::new(move |(member, status): (Member, AttendanceStatus)| {
            if status == AttendanceStatus::Justified {
                justify_target.set(Some(member));
            } else {
                update(member.id, status, None);
            }
        })
    };
    let on_justify = Callback::new(move |(participant_id, reason): (String, String)| {
        update(participant_id, AttendanceStatus::Justified, Some(reason));
    });

    let members = Signal::derive(move || {
        let query = search.get();
        chamada.with(|c| {
            c.session()
                .map(|s| filter_members(&s.members, &query))
                .unwrap_or_default()
        })
    });
    let index = Signal::derive(move || {
        chamada.with(|c| c.summary().map(AttendanceIndex::new).unwrap_or_default())
    });
    let counts = move || {
        chamada.with(|c| {
            c.summary()
                .map(|s| (s.present, s.absent, s.justified, s.total))
        })
    };

    view! {
        <Toast toast=toast />
        <JustifyDialog target=justify_target on_confirm=on_justify />

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-4">
                <form class="flex flex-col md:flex-row md:items-end gap-2" on:submit=on_open>
                    <div class="form-control">
                        <label for="session-date" class="label">
                            <span class="label-text">"Data"</span>
                        </label>
                        <input
                            id="session-date"
                            type="date"
                            class="input input-bordered"
                            on:input=move |ev| set_date.set(event_target_value(&ev))
                            prop:value=date
                            required
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled=move || opening.get()>
                        {move || if opening.get() { "Abrindo..." } else { "Abrir chamada" }}
                    </button>
                </form>
                {move || open_error.get().map(|message| view! { <ErrorAlert message=message /> })}

                {move || counts().map(|(present, absent, justified, total)| view! {
                    <div class="stats shadow w-full stats-vertical md:stats-horizontal">
                        <div class="stat">
                            <div class="stat-title">"Presentes"</div>
                            <div class="stat-value text-success">{present}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Faltas"</div>
                            <div class="stat-value text-error">{absent}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Justificadas"</div>
                            <div class="stat-value text-warning">{justified}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Total"</div>
                            <div class="stat-value">{total}</div>
                        </div>
                    </div>
                })}

                <Show when=move || chamada.with(|c| c.session().is_some())>
                    {move || chamada.with(|c| c.session().map(|s| view! {
                        <h3 class="text-lg font-semibold">{format!("Chamada de {}", s.session_date)}</h3>
                    }))}
                    <div class="flex flex-col md:flex-row md:items-center justify-between gap-2">
                        <input
                            type="search"
                            placeholder="Buscar participante"
                            class="input input-bordered md:w-80"
                            on:input=move |ev| set_search.set(event_target_value(&ev))
                            prop:value=search
                        />
                        {move || chamada.with(|c| c.session().map(|s| {
                            let href = AppRoute::Session { id: s.id.clone() }.to_path();
                            view! { <Link to=href class="link link-primary text-sm">"Ver resumo da chamada"</Link> }
                        }))}
                    </div>
                    <AttendanceGrid members=members index=index on_mark=on_mark />
                </Show>
            </div>
        </div>
    }
}
