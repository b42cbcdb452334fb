use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::components::feedback::ErrorAlert;
use crate::web::router::{Link, use_router};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

const LOGIN_FALLBACK: &str = "Erro ao entrar";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    // 例如重置密码成功后的 "Senha atualizada"
    let flash = use_router().take_flash();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        let username = username.get_untracked();
        let password = password.get_untracked();
        spawn_local(async move {
            match api.login(&username, &password).await {
                // 跳转由路由服务的认证监听完成
                Ok(resp) => {
                    if let Err(e) = login(&auth, &resp.token, resp.user) {
                        warn!("[Auth] Failed to persist session: {}", e);
                        set_error_msg.try_set(Some(LOGIN_FALLBACK.to_string()));
                    }
                }
                Err(e) => {
                    set_error_msg.try_set(Some(e.message_or(LOGIN_FALLBACK)));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Chamada"</h1>
                    <p class="text-base-content/70">"Entre com seu usuário e senha"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {flash.map(|message| view! {
                            <div role="status" class="alert alert-success text-sm py-2">
                                <span>{message}</span>
                            </div>
                        })}
                        {move || error_msg.get().map(|message| view! { <ErrorAlert message=message /> })}

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Usuário"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Senha"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Entrando..." }.into_any()
                                } else {
                                    "Entrar".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm">
                            <Link to="/forgot-password" class="link link-primary">
                                "Esqueci minha senha"
                            </Link>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
