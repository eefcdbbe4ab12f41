//! Show listing and creation

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Form,
};
use fyyur_common::lifecycle::{self, Action, EntityKind, Operation};
use fyyur_common::{listing, time, Error};

use crate::error::{render, PageResult};
use crate::forms::{FormErrors, FormFields, ShowForm};
use crate::templates::{ShowFormTemplate, ShowsTemplate};
use crate::views::{show_rows, ShowFormView};
use crate::AppState;

/// GET /shows
pub async fn list_shows(State(state): State<AppState>) -> PageResult<Response> {
    let listing = listing::load_show_listing(&state.db, time::now()).await?;
    render(
        StatusCode::OK,
        &ShowsTemplate {
            flashes: Vec::new(),
            shows: show_rows(&listing),
        },
    )
}

fn form_page(status: StatusCode, flashes: FormErrors, form: ShowFormView) -> PageResult<Response> {
    render(status, &ShowFormTemplate { flashes, form })
}

/// GET /shows/create
pub async fn new_show_form() -> PageResult<Response> {
    form_page(StatusCode::OK, Vec::new(), ShowFormView::blank())
}

/// POST /shows/create
///
/// An unknown venue or artist re-renders the form like any other validation problem.
pub async fn create_show(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = ShowForm::from_fields(&FormFields::new(pairs));
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(StatusCode::BAD_REQUEST, errors, ShowFormView::new(&form)),
    };

    match lifecycle::create_show(&state.db, &fields).await {
        Ok(_) => {
            let message = Operation::new(EntityKind::Show, Action::Create, "").success_message();
            super::pages::home(vec![message])
        }
        Err(err) => match &err.source {
            Error::InvalidInput(reason) => form_page(
                StatusCode::BAD_REQUEST,
                vec![err.flash_message(), reason.clone()],
                ShowFormView::new(&form),
            ),
            _ => Err(err.into()),
        },
    }
}
