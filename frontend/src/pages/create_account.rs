use shared::RegisterUserRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::multi_step::MultiStep;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct CreateAccountPageProps {
    pub api_client: ApiClient,
    /// Fired after the account exists and the session is signed in
    pub on_created: Callback<()>,
}

/// Step 1 of 4: claim a username and enter a display name.
///
/// Username rules live in the backend; this form just relays its message
/// when the submission is rejected.
#[function_component(CreateAccountPage)]
pub fn create_account_page(props: &CreateAccountPageProps) -> Html {
    let username = use_state(String::new);
    let name = use_state(String::new);
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);

    let on_username_change = {
        let username = username.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
        })
    };

    let on_name_change = {
        let name = name.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let on_created = props.on_created.clone();
        let username = username.clone();
        let name = name.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let api_client = api_client.clone();
            let on_created = on_created.clone();
            let username = username.clone();
            let name = name.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();

            spawn_local(async move {
                form_error.set(None);
                submitting.set(true);

                let request = RegisterUserRequest {
                    username: (*username).trim().to_string(),
                    name: (*name).clone(),
                };

                match api_client.register_user(request).await {
                    Ok(response) => {
                        Logger::info_with_component(
                            "create-account",
                            &format!("Account created for {}", response.user.username),
                        );
                        on_created.emit(());
                    }
                    Err(e) => {
                        form_error.set(Some(e));
                    }
                }

                submitting.set(false);
            });
        })
    };

    html! {
        <div class="register-container">
            <header class="register-header">
                <h1>{"Welcome to slotcal!"}</h1>
                <p>
                    {"We need some information to create your profile. \
                      You can edit it at any time later."}
                </p>
                <MultiStep size={4} current_step={1} />
            </header>

            <form class="register-box" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="username">{"Username"}</label>
                    <input
                        type="text"
                        id="username"
                        placeholder="your-username"
                        value={(*username).clone()}
                        onchange={on_username_change}
                        disabled={*submitting}
                    />
                    <span class="form-annotation">
                        {"This becomes your scheduling link."}
                    </span>
                </div>

                <div class="form-group">
                    <label for="name">{"Full name"}</label>
                    <input
                        type="text"
                        id="name"
                        placeholder="Your name"
                        value={(*name).clone()}
                        onchange={on_name_change}
                        disabled={*submitting}
                    />
                </div>

                {if let Some(error) = form_error.as_ref() {
                    html! { <div class="form-message error">{error}</div> }
                } else { html! {} }}

                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Creating account..." } else { "Next step" }}
                </button>
            </form>
        </div>
    }
}
