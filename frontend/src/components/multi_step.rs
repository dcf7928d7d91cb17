use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct MultiStepProps {
    /// Total number of wizard steps
    pub size: usize,
    /// 1-based index of the step being shown
    pub current_step: usize,
}

/// Progress indicator rendered in each wizard page header
#[function_component(MultiStep)]
pub fn multi_step(props: &MultiStepProps) -> Html {
    html! {
        <div class="multi-step">
            <span class="multi-step-label">
                {format!("Step {} of {}", props.current_step, props.size)}
            </span>
            <div class="multi-step-bars">
                {for (1..=props.size).map(|step| {
                    let class = if step <= props.current_step {
                        "multi-step-bar active"
                    } else {
                        "multi-step-bar"
                    };
                    html! { <div class={class}></div> }
                })}
            </div>
        </div>
    }
}
