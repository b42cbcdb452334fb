use crate::api::use_api;
use crate::components::feedback::ErrorAlert;
use crate::web::router::Link;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 无论账号是否存在都显示同一条消息
const SENT_MESSAGE: &str = "Se existir uma conta, enviamos um link para o e-mail cadastrado.";
const SEND_FAILED: &str = "Erro ao enviar. Tente novamente.";

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let api = use_api();

    let (username_or_email, set_username_or_email) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (sent, set_sent) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        let value = username_or_email.get_untracked();
        spawn_local(async move {
            match api.forgot_password(&value).await {
                Ok(()) => {
                    set_sent.try_set(true);
                }
                Err(e) => {
                    warn!("[Auth] Forgot password request failed: {}", e);
                    set_error_msg.try_set(Some(SEND_FAILED.to_string()));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Esqueci minha senha"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || sent.get()
                        fallback=move || view! {
                            <form class="card-body" on:submit=on_submit.clone()>
                                {move || error_msg.get().map(|message| view! { <ErrorAlert message=message /> })}
                                <div class="form-control">
                                    <label class="label" for="username-or-email">
                                        <span class="label-text">"Usuário ou e-mail"</span>
                                    </label>
                                    <input
                                        id="username-or-email"
                                        type="text"
                                        on:input=move |ev| set_username_or_email.set(event_target_value(&ev))
                                        prop:value=username_or_email
                                        class="input input-bordered"
                                        required
                                    />
                                </div>
                                <div class="form-control mt-6">
                                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                        {move || if is_submitting.get() { "Enviando..." } else { "Enviar link" }}
                                    </button>
                                </div>
                            </form>
                        }
                    >
                        <div class="card-body">
                            <div role="status" class="alert alert-success text-sm">
                                <span>{SENT_MESSAGE}</span>
                            </div>
                        </div>
                    </Show>
                    <div class="text-center text-sm pb-6">
                        <Link to="/login" class="link link-primary">"Voltar ao login"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}
