use crate::services::api::ApiClient;
use shared::AuthSession;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct SessionState {
    /// None until the first fetch completes
    pub session: Option<AuthSession>,
    pub loading: bool,
}

pub struct UseSessionResult {
    pub state: SessionState,
    pub actions: UseSessionActions,
}

#[derive(Clone, PartialEq)]
pub struct UseSessionActions {
    pub refresh_session: Callback<()>,
    pub set_session: Callback<AuthSession>,
}

/// Loads the sign-in state from the backend and keeps it in component state.
/// Pages receive the session as a prop; only this hook talks to the session
/// endpoint.
#[hook]
pub fn use_session(api_client: &ApiClient) -> UseSessionResult {
    let session = use_state(|| Option::<AuthSession>::None);
    let loading = use_state(|| false);

    let refresh_session = {
        let api_client = api_client.clone();
        let session = session.clone();
        let loading = loading.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let session = session.clone();
            let loading = loading.clone();

            spawn_local(async move {
                loading.set(true);

                match api_client.get_session().await {
                    Ok(current) => {
                        session.set(Some(current));
                    }
                    Err(e) => {
                        gloo::console::error!("Failed to get session:", e);
                    }
                }

                loading.set(false);
            });
        })
    };

    let set_session = {
        let session = session.clone();

        use_callback((), move |updated: AuthSession, _| {
            session.set(Some(updated));
        })
    };

    UseSessionResult {
        state: SessionState {
            session: (*session).clone(),
            loading: *loading,
        },
        actions: UseSessionActions {
            refresh_session,
            set_session,
        },
    }
}
