//! Email/password sign-in screen

use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::auth::{AuthAction, AuthForm};

#[derive(Properties, PartialEq, Clone)]
pub struct AuthScreenProps {
    pub form: AuthForm,
    pub on_email: Callback<String>,
    pub on_password: Callback<String>,
    pub on_submit: Callback<AuthAction>,
}

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let form = &props.form;

    let on_email = {
        let cb = props.on_email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(input.value());
        })
    };
    let on_password = {
        let cb = props.on_password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(input.value());
        })
    };
    let button = |action: AuthAction, id: &'static str| {
        let onclick = props.on_submit.reform(move |_: MouseEvent| action);
        html! {
            <button {id} type="button" {onclick} disabled={form.controls_disabled()}>
                { form.label(action) }
            </button>
        }
    };

    let error_class = classes!("auth-error", form.error.is_some().then_some("visible"));

    html! {
        <section id="auth" class="auth-view">
            <h1>{ "AI Chat" }</h1>
            <input
                id="email"
                type="email"
                placeholder="Email"
                autocomplete="email"
                value={form.email.clone()}
                oninput={on_email}
            />
            <input
                id="password"
                type="password"
                placeholder="Password"
                autocomplete="current-password"
                value={form.password.clone()}
                oninput={on_password}
            />
            <div id="auth-error" class={error_class}>
                { form.error.clone().unwrap_or_default() }
            </div>
            <div class="auth-actions">
                { button(AuthAction::SignIn, "signin") }
                { button(AuthAction::SignUp, "signup") }
            </div>
        </section>
    }
}
