use shared::availability::{default_week, normalize};
use shared::SetTimeIntervalsRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::multi_step::MultiStep;
use crate::services::api::ApiClient;
use crate::services::logging::Logger;

// Weekday labels, index-aligned with the interval rows (0 = Sunday)
fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Sunday",
    }
}

// Re-runs the validator while an error is showing, so the message goes
// away as soon as the week becomes valid again
fn revalidate_on_edit(
    week: &[shared::WeekdayInterval],
    form_error: &UseStateHandle<Option<String>>,
) {
    if form_error.is_some() {
        form_error.set(normalize(week).err().map(|e| e.to_string()));
    }
}

#[derive(Properties, PartialEq)]
pub struct TimeIntervalsPageProps {
    pub api_client: ApiClient,
    /// Fired after the normalized week is stored by the backend
    pub on_saved: Callback<()>,
}

/// Step 3 of 4: define the weekly availability intervals.
///
/// The week starts out as Monday–Friday 08:00–18:00. Submitting runs the
/// shared validator; a rejected week never leaves the page, a valid one is
/// posted in its normalized minute-offset form.
#[function_component(TimeIntervalsPage)]
pub fn time_intervals_page(props: &TimeIntervalsPageProps) -> Html {
    let intervals = use_state(default_week);
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);

    let on_toggle_day = {
        let intervals = intervals.clone();
        let form_error = form_error.clone();
        Callback::from(move |index: usize| {
            let mut week = (*intervals).clone();
            week[index].enabled = !week[index].enabled;
            revalidate_on_edit(&week, &form_error);
            intervals.set(week);
        })
    };

    let on_start_change = {
        let intervals = intervals.clone();
        let form_error = form_error.clone();
        Callback::from(move |(index, value): (usize, String)| {
            let mut week = (*intervals).clone();
            week[index].start_time = value;
            revalidate_on_edit(&week, &form_error);
            intervals.set(week);
        })
    };

    let on_end_change = {
        let intervals = intervals.clone();
        let form_error = form_error.clone();
        Callback::from(move |(index, value): (usize, String)| {
            let mut week = (*intervals).clone();
            week[index].end_time = value;
            revalidate_on_edit(&week, &form_error);
            intervals.set(week);
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let on_saved = props.on_saved.clone();
        let intervals = intervals.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            form_error.set(None);

            // Validate and convert before anything touches the network
            let normalized = match normalize(&intervals) {
                Ok(normalized) => normalized,
                Err(validation_error) => {
                    form_error.set(Some(validation_error.to_string()));
                    return;
                }
            };

            let api_client = api_client.clone();
            let on_saved = on_saved.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();

            spawn_local(async move {
                submitting.set(true);

                let request = SetTimeIntervalsRequest { intervals: normalized };
                match api_client.set_time_intervals(request).await {
                    Ok(response) => {
                        Logger::info_with_component(
                            "time-intervals",
                            &format!("Saved {} intervals", response.saved_count),
                        );
                        on_saved.emit(());
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
                <h1>{"Almost there"}</h1>
                <p>
                    {"Define the interval of hours you are available on each \
                      day of the week."}
                </p>
                <MultiStep size={4} current_step={3} />
            </header>

            <form class="register-box" onsubmit={on_submit}>
                <div class="intervals-container">
                    {for intervals.iter().enumerate().map(|(index, interval)| {
                        let on_checkbox = {
                            let on_toggle_day = on_toggle_day.clone();
                            Callback::from(move |_: Event| on_toggle_day.emit(index))
                        };
                        let on_start = {
                            let on_start_change = on_start_change.clone();
                            Callback::from(move |e: Event| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                on_start_change.emit((index, input.value()));
                            })
                        };
                        let on_end = {
                            let on_end_change = on_end_change.clone();
                            Callback::from(move |e: Event| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                on_end_change.emit((index, input.value()));
                            })
                        };

                        html! {
                            <div class="interval-item">
                                <label class="interval-day">
                                    <input
                                        type="checkbox"
                                        checked={interval.enabled}
                                        onchange={on_checkbox}
                                    />
                                    <span>{weekday_name(interval.weekday)}</span>
                                </label>
                                <div class="interval-inputs">
                                    <input
                                        type="time"
                                        step="60"
                                        value={interval.start_time.clone()}
                                        onchange={on_start}
                                        disabled={!interval.enabled}
                                    />
                                    <input
                                        type="time"
                                        step="60"
                                        value={interval.end_time.clone()}
                                        onchange={on_end}
                                        disabled={!interval.enabled}
                                    />
                                </div>
                            </div>
                        }
                    })}
                </div>

                {if let Some(error) = form_error.as_ref() {
                    html! { <div class="form-message error">{error}</div> }
                } else { html! {} }}

                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Saving..." } else { "Next step" }}
                </button>
            </form>
        </div>
    }
}
