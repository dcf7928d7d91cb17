use shared::{AuthSession, UpdateProfileRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::components::multi_step::MultiStep;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct UpdateProfilePageProps {
    pub api_client: ApiClient,
    /// Current sign-in state, passed down by the app shell
    pub session: AuthSession,
    /// Fired after the profile is saved
    pub on_completed: Callback<()>,
}

/// Step 4 of 4: finish the profile with a short bio.
#[function_component(UpdateProfilePage)]
pub fn update_profile_page(props: &UpdateProfilePageProps) -> Html {
    let bio = use_state(String::new);
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);

    let on_bio_change = {
        let bio = bio.clone();
        Callback::from(move |e: Event| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            bio.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let on_completed = props.on_completed.clone();
        let bio = bio.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let api_client = api_client.clone();
            let on_completed = on_completed.clone();
            let bio = bio.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();

            spawn_local(async move {
                form_error.set(None);
                submitting.set(true);

                let request = UpdateProfileRequest { bio: (*bio).clone() };
                match api_client.update_profile(request).await {
                    Ok(response) => {
                        Logger::info_with_component(
                            "update-profile",
                            &format!("Profile completed for {}", response.user.username),
                        );
                        on_completed.emit(());
                    }
                    Err(e) => {
                        form_error.set(Some(e));
                    }
                }

                submitting.set(false);
            });
        })
    };

    let display_name = props.session.name.clone().unwrap_or_default();
    let avatar_initial = display_name.chars().next().unwrap_or('?');

    html! {
        <div class="register-container">
            <header class="register-header">
                <h1>{"Nearly done!"}</h1>
                <p>
                    {"Finally, a short description and a profile picture. \
                      This is shown on your personal scheduling page."}
                </p>
                <MultiStep size={4} current_step={4} />
            </header>

            <form class="register-box" onsubmit={on_submit}>
                <div class="form-group">
                    <label>{"Profile picture"}</label>
                    {if let Some(url) = props.session.avatar_url.as_ref() {
                        html! { <img class="avatar" src={url.clone()} alt={display_name.clone()} /> }
                    } else {
                        html! { <div class="avatar avatar-placeholder">{avatar_initial.to_string()}</div> }
                    }}
                </div>

                <div class="form-group">
                    <label for="bio">{"About you"}</label>
                    <textarea
                        id="bio"
                        value={(*bio).clone()}
                        onchange={on_bio_change}
                        disabled={*submitting}
                    />
                    <span class="form-annotation">
                        {"Tell people a little about yourself. This appears on \
                          your personal page."}
                    </span>
                </div>

                {if let Some(error) = form_error.as_ref() {
                    html! { <div class="form-message error">{error}</div> }
                } else { html! {} }}

                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Finishing..." } else { "Finish" }}
                </button>
            </form>
        </div>
    }
}
