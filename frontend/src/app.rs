//! Root component: switches between the auth and chat screens and drives the
//! async flows, applying their events to the local state.

use std::rc::Rc;

use chat_shared::{messages, ClientSettings, Session};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, StorageEvent};
use yew::prelude::*;

use crate::auth::{
    authenticate, AuthAction, AuthEvent, AuthForm, AuthPhase, SessionChange, SessionEffect,
};
use crate::chat::{load_history, ChatEvent, PersistenceSink, Pipeline, Transcript};
use crate::components::{AuthScreen, MessageBubble};
use crate::services::{http, IdentityProvider, Services};
use crate::utils;

pub enum AppMsg {
    /// Configuration loaded and stored session (if any) restored
    Ready {
        services: Rc<Services>,
        restored: Option<Session>,
    },
    Session(SessionChange),
    Auth(AuthEvent),
    Chat(ChatEvent),
    EmailChanged(String),
    PasswordChanged(String),
    Authenticate(AuthAction),
    SignOut,
    DraftChanged(String),
    Submit,
}

pub struct App {
    services: Option<Rc<Services>>,
    phase: AuthPhase,
    auth_form: AuthForm,
    transcript: Transcript,
    messages_ref: NodeRef,
    scroll_to_bottom: bool,
    #[allow(dead_code)]
    storage_listener: Option<EventListener>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let guest = utils::is_guest_mode();
        let link = ctx.link().clone();

        spawn_local(async move {
            let settings = ClientSettings::default();
            let services = if guest {
                log::info!("Guest mode: sign-in, history and persistence disabled");
                Services::guest(settings)
            } else {
                let config = http::fetch_config(&settings).await;
                Services::new(settings, config)
            };
            let restored = match &services.identity {
                Some(identity) => identity.restore().await,
                None => None,
            };
            link.send_message(AppMsg::Ready {
                services: Rc::new(services),
                restored,
            });
        });

        Self {
            services: None,
            phase: if guest {
                AuthPhase::Guest
            } else {
                AuthPhase::Unauthenticated
            },
            auth_form: AuthForm::default(),
            transcript: Transcript::new(),
            messages_ref: NodeRef::default(),
            scroll_to_bottom: false,
            storage_listener: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Ready { services, restored } => {
                if services.identity.is_some() && !self.phase.is_guest() {
                    self.storage_listener = watch_session_storage(ctx);
                }
                self.services = Some(services);
                if let Some(session) = restored {
                    ctx.link()
                        .send_message(AppMsg::Session(SessionChange::SignedIn(session)));
                }
                true
            }
            AppMsg::Session(change) => {
                for effect in self.phase.apply(change) {
                    match effect {
                        SessionEffect::ClearTranscript => self.transcript = Transcript::new(),
                        SessionEffect::LoadHistory(session) => self.spawn_history(ctx, session),
                    }
                }
                true
            }
            AppMsg::Auth(event) => {
                self.auth_form.apply(event);
                true
            }
            AppMsg::Chat(event) => {
                self.transcript.apply(event);
                self.scroll_to_bottom = true;
                true
            }
            AppMsg::EmailChanged(value) => {
                self.auth_form.email = value;
                false
            }
            AppMsg::PasswordChanged(value) => {
                self.auth_form.password = value;
                false
            }
            AppMsg::Authenticate(action) => self.handle_authenticate(ctx, action),
            AppMsg::SignOut => self.handle_sign_out(ctx),
            AppMsg::DraftChanged(value) => {
                self.transcript.draft = value;
                false
            }
            AppMsg::Submit => self.handle_submit(ctx),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if !self.scroll_to_bottom {
            return;
        }
        self.scroll_to_bottom = false;
        if let Some(element) = self.messages_ref.cast::<Element>() {
            element.set_scroll_top(element.scroll_height());
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        // Nothing to show until we know whether a session exists
        if self.services.is_none() && !self.phase.is_guest() {
            return html! { <main class="app pending" /> };
        }

        html! {
            <main class="app">
                if self.phase.shows_chat() {
                    { self.render_chat(ctx) }
                } else {
                    { self.render_auth(ctx) }
                }
            </main>
        }
    }
}

// Helper methods extracted from the main impl
impl App {
    fn chat_emitter(ctx: &Context<Self>) -> impl Fn(ChatEvent) {
        let link = ctx.link().clone();
        move |event| link.send_message(AppMsg::Chat(event))
    }

    fn spawn_history(&self, ctx: &Context<Self>, session: Session) {
        let Some(services) = self.services.clone() else {
            return;
        };
        let emit = Self::chat_emitter(ctx);
        spawn_local(async move {
            let (Some(store), Some(identity)) = (services.store.as_ref(), services.identity.as_ref())
            else {
                return;
            };
            // Renews the token if needed; skips users who already left
            let Some(live) = identity.current_session().await else {
                return;
            };
            if live.uid != session.uid {
                return;
            }
            load_history(store, &live, services.settings.history_limit, &emit).await;
        });
    }

    fn handle_authenticate(&mut self, ctx: &Context<Self>, action: AuthAction) -> bool {
        if self.auth_form.controls_disabled() {
            return false;
        }
        let Some(services) = self.services.clone() else {
            return false;
        };
        let email = self.auth_form.email.clone();
        let password = self.auth_form.password.clone();
        let link = ctx.link().clone();

        spawn_local(async move {
            let emit = {
                let link = link.clone();
                move |event| link.send_message(AppMsg::Auth(event))
            };
            let session =
                authenticate(services.identity.as_ref(), action, &email, &password, &emit).await;
            if let Some(session) = session {
                link.send_message(AppMsg::Session(SessionChange::SignedIn(session)));
            }
        });
        false
    }

    fn handle_sign_out(&mut self, ctx: &Context<Self>) -> bool {
        if self.phase.is_guest() {
            return false;
        }
        let Some(services) = self.services.clone() else {
            return false;
        };
        let link = ctx.link().clone();
        spawn_local(async move {
            if let Some(identity) = services.identity.as_ref() {
                identity.sign_out().await;
            }
            link.send_message(AppMsg::Session(SessionChange::SignedOut));
        });
        false
    }

    fn handle_submit(&mut self, ctx: &Context<Self>) -> bool {
        if self.transcript.busy || self.transcript.draft.trim().is_empty() {
            return false;
        }
        let Some(services) = self.services.clone() else {
            return false;
        };
        // Lock right away; the pipeline's own Busy event arrives a tick later
        self.transcript.busy = true;

        let question = self.transcript.draft.clone();
        let emit = Self::chat_emitter(ctx);

        spawn_local(async move {
            let pipeline = Pipeline {
                answers: &services.answers,
                sink: PersistenceSink::new(services.store.as_ref(), services.identity.as_ref()),
                typewriter: &services.typewriter,
                pause: &services.pause,
            };
            pipeline.submit(&question, &emit).await;
        });
        true
    }

    fn render_auth(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <AuthScreen
                form={self.auth_form.clone()}
                on_email={link.callback(AppMsg::EmailChanged)}
                on_password={link.callback(AppMsg::PasswordChanged)}
                on_submit={link.callback(AppMsg::Authenticate)}
            />
        }
    }

    fn render_chat(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let busy = self.transcript.busy;

        let handle_submit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            AppMsg::Submit
        });
        let handle_input = link.callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            AppMsg::DraftChanged(input.value())
        });
        let handle_sign_out = link.callback(|_: MouseEvent| AppMsg::SignOut);

        html! {
            <section id="chat" class="chat-view">
                <header class="chat-header">
                    <span id="user">{ self.phase.user_label() }</span>
                    if !self.phase.is_guest() {
                        <button id="signout" type="button" onclick={handle_sign_out}>
                            { messages::SIGN_OUT_LABEL }
                        </button>
                    }
                </header>
                <div id="messages" class="messages" ref={self.messages_ref.clone()}>
                    {
                        self.transcript.entries().iter().map(|entry| {
                            html! { <MessageBubble key={entry.id.to_string()} entry={entry.clone()} /> }
                        }).collect::<Html>()
                    }
                </div>
                <form id="chat-form" class="chat-form" onsubmit={handle_submit}>
                    <input
                        id="question"
                        type="text"
                        autocomplete="off"
                        placeholder={messages::QUESTION_PLACEHOLDER}
                        value={self.transcript.draft.clone()}
                        oninput={handle_input}
                        disabled={busy}
                    />
                    <button id="sendBtn" type="submit" disabled={busy}>
                        { if busy { messages::SEND_BUSY_LABEL } else { messages::SEND_LABEL } }
                    </button>
                </form>
            </section>
        }
    }
}

/// Follow sign-in/sign-out performed in other tabs.
fn watch_session_storage(ctx: &Context<App>) -> Option<EventListener> {
    let window = web_sys::window()?;
    let link = ctx.link().clone();
    Some(EventListener::new(&window, "storage", move |event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        let key = event.key();
        let value = event.new_value();
        if let Some(change) = SessionChange::from_storage(key.as_deref(), value.as_deref()) {
            link.send_message(AppMsg::Session(change));
        }
    }))
}
