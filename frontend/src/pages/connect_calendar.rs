use shared::AuthSession;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::multi_step::MultiStep;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct ConnectCalendarPageProps {
    pub api_client: ApiClient,
    /// Current sign-in state, passed down by the app shell
    pub session: AuthSession,
    /// Fired with the updated session once the provider connection succeeds
    pub on_connected: Callback<AuthSession>,
    /// Fired when the user advances to the next step
    pub on_next: Callback<()>,
}

/// Step 2 of 4: connect the calendar provider.
///
/// The provider handshake itself happens on the backend; this page only
/// triggers it and reflects the resulting session state. Next stays
/// disabled until the session reports the calendar as connected.
#[function_component(ConnectCalendarPage)]
pub fn connect_calendar_page(props: &ConnectCalendarPageProps) -> Html {
    let connecting = use_state(|| false);
    let auth_error = use_state(|| Option::<String>::None);

    let is_connected = props.session.calendar_connected;

    let on_connect = {
        let api_client = props.api_client.clone();
        let on_connected = props.on_connected.clone();
        let connecting = connecting.clone();
        let auth_error = auth_error.clone();

        Callback::from(move |_: MouseEvent| {
            let api_client = api_client.clone();
            let on_connected = on_connected.clone();
            let connecting = connecting.clone();
            let auth_error = auth_error.clone();

            spawn_local(async move {
                auth_error.set(None);
                connecting.set(true);

                match api_client.connect_calendar().await {
                    Ok(session) => {
                        Logger::info_with_component("connect-calendar", "Calendar connected");
                        on_connected.emit(session);
                    }
                    Err(e) => {
                        Logger::error_with_component(
                            "connect-calendar",
                            &format!("Calendar connection failed: {}", e),
                        );
                        auth_error.set(Some(e));
                    }
                }

                connecting.set(false);
            });
        })
    };

    let on_next = {
        let on_next = props.on_next.clone();
        Callback::from(move |_: MouseEvent| {
            on_next.emit(());
        })
    };

    html! {
        <div class="register-container">
            <header class="register-header">
                <h1>{"Connect your calendar!"}</h1>
                <p>
                    {"Connect your calendar so busy hours and new events are \
                      picked up automatically as they get scheduled."}
                </p>
                <MultiStep size={4} current_step={2} />
            </header>

            <div class="register-box">
                <div class="connect-item">
                    <span>{"Google Calendar"}</span>

                    {if is_connected {
                        html! {
                            <button class="btn btn-secondary" disabled={true}>
                                {"Connected ✓"}
                            </button>
                        }
                    } else {
                        html! {
                            <button
                                class="btn btn-secondary"
                                onclick={on_connect}
                                disabled={*connecting}
                            >
                                {if *connecting { "Connecting..." } else { "Connect" }}
                            </button>
                        }
                    }}
                </div>

                {if auth_error.is_some() {
                    html! {
                        <div class="form-message error">
                            {"Could not connect to the calendar provider. Make sure \
                              you have granted access to your calendar."}
                        </div>
                    }
                } else { html! {} }}

                <button class="btn btn-primary" onclick={on_next} disabled={!is_connected}>
                    {"Next step"}
                </button>
            </div>
        </div>
    }
}
