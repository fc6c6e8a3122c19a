use crate::{
    data::student::Student,
    error::RollcallResult,
    maud_conveniences::{Cell, render_table, title},
    state::RollcallState,
    view_state::{Transition, ViewState},
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use maud::{Markup, html};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// htmx swaps only want the results, but a history restore needs the whole page.
fn wants_fragment(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request") && !headers.contains_key("hx-history-restore-request")
}

pub async fn get_index_route(
    State(state): State<RollcallState>,
    headers: HeaderMap,
    Query(location): Query<HashMap<String, String>>,
) -> RollcallResult<Markup> {
    let view = ViewState::from_location(&location);
    let students = state.store().get_page(&view.page_request()).await?;
    let results = students_view(&view, &students);

    if wants_fragment(&headers) {
        return Ok(results);
    }

    Ok(state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            (title("Students"))
            (search_form(&view))
            div id="students_view" {
                (results)
            }
        }
    }))
}

fn search_form(view: &ViewState) -> Markup {
    //history handling for keystrokes comes from the view state
    let transition = view.clone().set_search(view.search());

    html! {
        form class="mb-4" onsubmit="return false;" {
            label for="search" class="block text-sm font-bold mb-2 text-gray-300" {"Search"}
            input type="search" id="search" name="search" value=(view.search())
                hx-get="/" hx-trigger="input changed delay:150ms, search"
                hx-target="#students_view" hx-include="#current_page"
                hx-push-url=[transition.push_url()] hx-replace-url=[transition.replace_url()]
                class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
        }
    }
}

pub fn students_view(view: &ViewState, students: &[Student]) -> Markup {
    let rows = students
        .iter()
        .map(|student| {
            [
                html! { (Cell(&student.last_name)) },
                html! { (Cell(&student.first_name)) },
                html! { (Cell(&student.email)) },
            ]
        })
        .collect();

    html! {
        @if let Some(page) = view.raw_page() {
            input type="hidden" id="current_page" name="page" value=(page);
        }

        @if students.is_empty() {
            p class="italic text-gray-300" {"No students to show."}
        } @else {
            (render_table(["Last Name", "First Name", "Email"], rows))
        }

        (pagination(view, students.is_empty()))
    }
}

fn pager_button(
    view: &ViewState,
    change: fn(&mut ViewState) -> Transition,
    disabled: bool,
    label: &str,
    symbol: &str,
) -> Markup {
    let mut target = view.clone();
    let transition = change(&mut target);
    let vals: Map<String, Value> = target
        .location()
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::String(value)))
        .collect();

    html! {
        button disabled[disabled] title=(label)
            hx-get="/" hx-vals=(Value::Object(vals).to_string()) hx-target="#students_view"
            hx-push-url=[transition.push_url()] hx-replace-url=[transition.replace_url()]
            class="bg-slate-600 hover:bg-slate-800 disabled:opacity-40 font-bold py-2 px-4 rounded" {
            (symbol)
        }
    }
}

pub fn pagination(view: &ViewState, page_is_empty: bool) -> Markup {
    html! {
        article class="flex flex-row items-center justify-between" {
            (pager_button(view, ViewState::previous_page, !view.can_go_back(), "Previous page", "⬅️"))
            p {"Showing page " (view.current_page())}
            (pager_button(view, ViewState::next_page, page_is_empty, "Next page", "➡️"))
        }
    }
}
