use shared::AuthSession;
use yew::prelude::*;

mod components;
mod hooks;
mod pages;
mod services;

use hooks::use_session;
use pages::connect_calendar::ConnectCalendarPage;
use pages::create_account::CreateAccountPage;
use pages::time_intervals::TimeIntervalsPage;
use pages::update_profile::UpdateProfilePage;
use services::api::ApiClient;
use services::logging::Logger;

/// The four wizard steps plus the completion screen
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterStep {
    CreateAccount,
    ConnectCalendar,
    TimeIntervals,
    UpdateProfile,
    Complete,
}

/// Where to resume the wizard for a freshly loaded session.
///
/// The session snapshot is the only input: an already signed-in user skips
/// account creation, and one with a connected calendar goes straight to the
/// availability form.
fn step_for_session(session: &AuthSession) -> RegisterStep {
    if !session.signed_in {
        RegisterStep::CreateAccount
    } else if !session.calendar_connected {
        RegisterStep::ConnectCalendar
    } else {
        RegisterStep::TimeIntervals
    }
}

#[function_component(App)]
fn app() -> Html {
    let api_client = ApiClient::new();
    let current_step = use_state(|| RegisterStep::CreateAccount);
    let session = use_session(&api_client);

    // Load the session once on startup and resume from where it points
    use_effect_with((), {
        let refresh_session = session.actions.refresh_session.clone();
        move |_| {
            refresh_session.emit(());
            || ()
        }
    });

    {
        let current_step = current_step.clone();
        use_effect_with(session.state.session.clone(), move |loaded| {
            // Only jump forward from the initial step; later transitions are
            // driven by the pages themselves
            if let Some(loaded) = loaded {
                if *current_step == RegisterStep::CreateAccount {
                    let resumed = step_for_session(loaded);
                    if resumed != *current_step {
                        Logger::info_with_component(
                            "wizard",
                            &format!("Resuming registration at {:?}", resumed),
                        );
                        current_step.set(resumed);
                    }
                }
            }
            || ()
        });
    }

    let on_account_created = {
        let current_step = current_step.clone();
        let refresh_session = session.actions.refresh_session.clone();
        Callback::from(move |_| {
            refresh_session.emit(());
            current_step.set(RegisterStep::ConnectCalendar);
        })
    };

    let on_calendar_connected = {
        let set_session = session.actions.set_session.clone();
        Callback::from(move |updated: AuthSession| {
            set_session.emit(updated);
        })
    };

    let on_calendar_next = {
        let current_step = current_step.clone();
        Callback::from(move |_| {
            current_step.set(RegisterStep::TimeIntervals);
        })
    };

    let on_intervals_saved = {
        let current_step = current_step.clone();
        Callback::from(move |_| {
            current_step.set(RegisterStep::UpdateProfile);
        })
    };

    let on_profile_completed = {
        let current_step = current_step.clone();
        let refresh_session = session.actions.refresh_session.clone();
        Callback::from(move |_| {
            refresh_session.emit(());
            current_step.set(RegisterStep::Complete);
        })
    };

    let active_session = session
        .state
        .session
        .clone()
        .unwrap_or_else(AuthSession::signed_out);

    html! {
        <main class="register-main">
            {match &*current_step {
                RegisterStep::CreateAccount => html! {
                    <CreateAccountPage
                        api_client={api_client.clone()}
                        on_created={on_account_created}
                    />
                },
                RegisterStep::ConnectCalendar => html! {
                    <ConnectCalendarPage
                        api_client={api_client.clone()}
                        session={active_session.clone()}
                        on_connected={on_calendar_connected}
                        on_next={on_calendar_next}
                    />
                },
                RegisterStep::TimeIntervals => html! {
                    <TimeIntervalsPage
                        api_client={api_client.clone()}
                        on_saved={on_intervals_saved}
                    />
                },
                RegisterStep::UpdateProfile => html! {
                    <UpdateProfilePage
                        api_client={api_client.clone()}
                        session={active_session.clone()}
                        on_completed={on_profile_completed}
                    />
                },
                RegisterStep::Complete => {
                    let username = active_session.username.clone().unwrap_or_default();
                    html! {
                        <div class="register-container">
                            <header class="register-header">
                                <h1>{"You're all set!"}</h1>
                                <p>{"People can now book time with you at:"}</p>
                            </header>
                            <div class="register-box">
                                <code class="schedule-link">
                                    {format!("/schedule/{}", username)}
                                </code>
                            </div>
                        </div>
                    }
                }
            }}
        </main>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_sessions_start_at_account_creation() {
        let session = AuthSession::signed_out();

        assert_eq!(step_for_session(&session), RegisterStep::CreateAccount);
    }

    #[test]
    fn signed_in_sessions_resume_at_calendar_connection() {
        let session = AuthSession {
            signed_in: true,
            username: Some("jane-doe".to_string()),
            name: Some("Jane Doe".to_string()),
            avatar_url: None,
            calendar_connected: false,
        };

        assert_eq!(step_for_session(&session), RegisterStep::ConnectCalendar);
    }

    #[test]
    fn connected_sessions_resume_at_time_intervals() {
        let session = AuthSession {
            signed_in: true,
            username: Some("jane-doe".to_string()),
            name: Some("Jane Doe".to_string()),
            avatar_url: None,
            calendar_connected: true,
        };

        assert_eq!(step_for_session(&session), RegisterStep::TimeIntervals);
    }
}
