//! Venue pages

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use fyyur_common::db::venues;
use fyyur_common::lifecycle::{self, Action, EntityKind, Operation};
use fyyur_common::{listing, search, time};

use super::{delete_bad_id, delete_response, parse_id, DeleteParams, SearchForm};
use crate::error::{render, PageError, PageResult};
use crate::forms::{FormErrors, FormFields, VenueForm};
use crate::templates::{ProfileFormTemplate, SearchVenuesTemplate, ShowVenueTemplate, VenuesTemplate};
use crate::views::{ProfileFormView, VenuePage};
use crate::AppState;

/// GET /venues
pub async fn list_venues(State(state): State<AppState>) -> PageResult<Response> {
    let areas = listing::load_venue_areas(&state.db, time::now()).await?;
    render(
        StatusCode::OK,
        &VenuesTemplate {
            flashes: Vec::new(),
            areas,
        },
    )
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> PageResult<Response> {
    let results = search::search_venues(&state.db, &form.search_term, time::now()).await?;
    render(
        StatusCode::OK,
        &SearchVenuesTemplate {
            flashes: Vec::new(),
            search_term: form.search_term,
            count: results.count,
            venues: results.data,
        },
    )
}

/// GET /venues/:id
pub async fn show_venue(State(state): State<AppState>, Path(raw_id): Path<String>) -> PageResult<Response> {
    let id = parse_id("Venue", &raw_id)?;
    venue_page(&state, id, Vec::new()).await
}

async fn venue_page(state: &AppState, id: i64, flashes: Vec<String>) -> PageResult<Response> {
    let detail = listing::load_venue_detail(&state.db, id, time::now())
        .await?
        .ok_or_else(|| PageError::NotFound(format!("Venue {}", id)))?;

    render(
        StatusCode::OK,
        &ShowVenueTemplate {
            flashes,
            venue: VenuePage::new(&detail),
        },
    )
}

fn form_page(status: StatusCode, flashes: FormErrors, form: &VenueForm, edit_id: Option<i64>) -> PageResult<Response> {
    let (heading, action, submit_label) = match edit_id {
        Some(id) => (
            format!("Edit venue {}", form.name),
            format!("/venues/{}/edit", id),
            "Save Venue",
        ),
        None => (
            "List a new venue".to_string(),
            "/venues/create".to_string(),
            "Create Venue",
        ),
    };

    render(
        status,
        &ProfileFormTemplate {
            flashes,
            heading,
            action,
            submit_label: submit_label.to_string(),
            form: ProfileFormView::venue(form),
        },
    )
}

/// GET /venues/create
pub async fn new_venue_form() -> PageResult<Response> {
    form_page(StatusCode::OK, Vec::new(), &VenueForm::default(), None)
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = VenueForm::from_fields(&FormFields::new(pairs));
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(StatusCode::BAD_REQUEST, errors, &form, None),
    };

    lifecycle::create_venue(&state.db, &fields).await?;

    let message = Operation::new(EntityKind::Venue, Action::Create, &fields.name).success_message();
    super::pages::home(vec![message])
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> PageResult<Response> {
    let id = parse_id("Venue", &raw_id)?;
    let venue = venues::get_venue(&state.db, id)
        .await?
        .ok_or_else(|| PageError::NotFound(format!("Venue {}", id)))?;

    form_page(StatusCode::OK, Vec::new(), &VenueForm::from_venue(&venue), Some(id))
}

/// POST /venues/:id/edit
pub async fn update_venue(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let id = parse_id("Venue", &raw_id)?;
    let form = VenueForm::from_fields(&FormFields::new(pairs));
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(StatusCode::BAD_REQUEST, errors, &form, Some(id)),
    };

    lifecycle::update_venue(&state.db, id, &fields).await?;

    let message = Operation::new(EntityKind::Venue, Action::Update, &fields.name).success_message();
    venue_page(&state, id, vec![message]).await
}

/// DELETE /venues/:id
///
/// Refuses with 409 while shows reference the venue unless `?cascade=true`.
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return delete_bad_id(&raw_id);
    };
    delete_response(lifecycle::delete_venue(&state.db, id, params.policy()).await)
}
