//! 请假理由对话框
//!
//! 标记 "Justificada" 之前收集理由；取消时丢弃草稿，不发出任何请求。

use chamada_shared::Member;
use chamada_shared::validation::validate_reason;
use leptos::prelude::*;

#[component]
pub fn JustifyDialog(
    /// 待标记的参与者；`Some` 时对话框打开
    target: RwSignal<Option<Member>>,
    /// (participantId, 去空白后的理由)
    #[prop(into)]
    on_confirm: Callback<(String, String)>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let (reason, set_reason) = signal(String::new());

    let close = move || {
        set_reason.set(String::new());
        target.set(None);
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if target.with(|t| t.is_some()) {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let can_submit = move || reason.with(|r| validate_reason(r).is_ok());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(member) = target.get_untracked() else {
            return;
        };
        // 按钮禁用之外再校验一次
        let Ok(reason) = validate_reason(&reason.get_untracked()) else {
            return;
        };
        on_confirm.run((member.id, reason));
        close();
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Justificar falta"</h3>
                <p class="py-2 text-base-content/70">
                    {move || target.with(|t| t.as_ref().map(|m| m.full_name.clone()).unwrap_or_default())}
                </p>

                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label for="justification-reason" class="label">
                            <span class="label-text">"Motivo (mín. 3 caracteres)"</span>
                        </label>
                        <textarea
                            id="justification-reason"
                            class="textarea textarea-bordered w-full"
                            on:input=move |ev| set_reason.set(event_target_value(&ev))
                            prop:value=reason
                        ></textarea>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                            "Cancelar"
                        </button>
                        <button type="submit" disabled=move || !can_submit() class="btn btn-primary">
                            "Salvar"
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
