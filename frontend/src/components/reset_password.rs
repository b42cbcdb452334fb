use crate::api::use_api;
use crate::components::feedback::ErrorAlert;
use crate::web::router::{Link, use_router};
use chamada_shared::validation::validate_password_reset;
use leptos::prelude::*;
use leptos::task::spawn_local;

const RESET_FALLBACK: &str = "Erro ao redefinir senha";
const PASSWORD_UPDATED: &str = "Senha atualizada";

#[component]
pub fn ResetPasswordPage(token: Option<String>) -> impl IntoView {
    match token {
        Some(token) => view! { <ResetPasswordForm token=token /> }.into_any(),
        None => view! {
            <div class="hero min-h-screen bg-base-200">
                <div class="card w-full max-w-md shadow-2xl bg-base-100">
                    <div class="card-body text-center">
                        <h1 class="card-title justify-center">"Link inválido"</h1>
                        <p>"Link inválido ou expirado. Solicite um novo link de recuperação."</p>
                        <Link to="/forgot-password" class="btn btn-primary mt-4">
                            "Solicitar novo link"
                        </Link>
                    </div>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn ResetPasswordForm(token: String) -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let (new_password, set_new_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let new_password = new_password.get_untracked();
        let token = match validate_password_reset(
            Some(&token),
            &new_password,
            &confirm_password.get_untracked(),
        ) {
            Ok(token) => token,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match api.reset_password(&token, &new_password).await {
                Ok(()) => router.navigate_with_flash("/login", PASSWORD_UPDATED),
                Err(e) => {
                    set_error_msg.try_set(Some(e.message_or(RESET_FALLBACK)));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Nova senha"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|message| view! { <ErrorAlert message=message /> })}
                        <div class="form-control">
                            <label class="label" for="new-password">
                                <span class="label-text">"Nova senha"</span>
                            </label>
                            <input
                                id="new-password"
                                type="password"
                                autocomplete="new-password"
                                on:input=move |ev| set_new_password.set(event_target_value(&ev))
                                prop:value=new_password
                                class="input input-bordered"
                                required
                            />
                            <label class="label">
                                <span class="label-text-alt">"Mínimo de 8 caracteres, com letras e números"</span>
                            </label>
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm-password">
                                <span class="label-text">"Confirmar senha"</span>
                            </label>
                            <input
                                id="confirm-password"
                                type="password"
                                autocomplete="new-password"
                                on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                                prop:value=confirm_password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Salvando..." } else { "Redefinir senha" }}
                            </button>
                        </div>
                        <div class="text-center text-sm">
                            <Link to="/login" class="link link-primary">"Voltar ao login"</Link>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
