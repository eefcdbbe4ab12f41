//! Artist pages

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use fyyur_common::db::artists;
use fyyur_common::lifecycle::{self, Action, EntityKind, Operation};
use fyyur_common::{listing, search, time};

use super::{delete_bad_id, delete_response, parse_id, DeleteParams, SearchForm};
use crate::error::{render, PageError, PageResult};
use crate::forms::{ArtistForm, FormErrors, FormFields};
use crate::templates::{ArtistsTemplate, ProfileFormTemplate, SearchArtistsTemplate, ShowArtistTemplate};
use crate::views::{ArtistPage, ProfileFormView};
use crate::AppState;

/// GET /artists
pub async fn list_artists(State(state): State<AppState>) -> PageResult<Response> {
    let artists = listing::load_artist_summaries(&state.db, time::now()).await?;
    render(
        StatusCode::OK,
        &ArtistsTemplate {
            flashes: Vec::new(),
            artists,
        },
    )
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> PageResult<Response> {
    let results = search::search_artists(&state.db, &form.search_term, time::now()).await?;
    render(
        StatusCode::OK,
        &SearchArtistsTemplate {
            flashes: Vec::new(),
            search_term: form.search_term,
            count: results.count,
            artists: results.data,
        },
    )
}

/// GET /artists/:id
pub async fn show_artist(State(state): State<AppState>, Path(raw_id): Path<String>) -> PageResult<Response> {
    let id = parse_id("Artist", &raw_id)?;
    artist_page(&state, id, Vec::new()).await
}

async fn artist_page(state: &AppState, id: i64, flashes: Vec<String>) -> PageResult<Response> {
    let detail = listing::load_artist_detail(&state.db, id, time::now())
        .await?
        .ok_or_else(|| PageError::NotFound(format!("Artist {}", id)))?;

    render(
        StatusCode::OK,
        &ShowArtistTemplate {
            flashes,
            artist: ArtistPage::new(&detail),
        },
    )
}

fn form_page(status: StatusCode, flashes: FormErrors, form: &ArtistForm, edit_id: Option<i64>) -> PageResult<Response> {
    let (heading, action, submit_label) = match edit_id {
        Some(id) => (
            format!("Edit artist {}", form.name),
            format!("/artists/{}/edit", id),
            "Save Artist",
        ),
        None => (
            "List a new artist".to_string(),
            "/artists/create".to_string(),
            "Create Artist",
        ),
    };

    render(
        status,
        &ProfileFormTemplate {
            flashes,
            heading,
            action,
            submit_label: submit_label.to_string(),
            form: ProfileFormView::artist(form),
        },
    )
}

/// GET /artists/create
pub async fn new_artist_form() -> PageResult<Response> {
    form_page(StatusCode::OK, Vec::new(), &ArtistForm::default(), None)
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let form = ArtistForm::from_fields(&FormFields::new(pairs));
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(StatusCode::BAD_REQUEST, errors, &form, None),
    };

    lifecycle::create_artist(&state.db, &fields).await?;

    let message = Operation::new(EntityKind::Artist, Action::Create, &fields.name).success_message();
    super::pages::home(vec![message])
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> PageResult<Response> {
    let id = parse_id("Artist", &raw_id)?;
    let artist = artists::get_artist(&state.db, id)
        .await?
        .ok_or_else(|| PageError::NotFound(format!("Artist {}", id)))?;

    form_page(StatusCode::OK, Vec::new(), &ArtistForm::from_artist(&artist), Some(id))
}

/// POST /artists/:id/edit
pub async fn update_artist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult<Response> {
    let id = parse_id("Artist", &raw_id)?;
    let form = ArtistForm::from_fields(&FormFields::new(pairs));
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(StatusCode::BAD_REQUEST, errors, &form, Some(id)),
    };

    lifecycle::update_artist(&state.db, id, &fields).await?;

    let message = Operation::new(EntityKind::Artist, Action::Update, &fields.name).success_message();
    artist_page(&state, id, vec![message]).await
}

/// DELETE /artists/:id
///
/// Refuses with 409 while shows reference the artist unless `?cascade=true`.
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return delete_bad_id(&raw_id);
    };
    delete_response(lifecycle::delete_artist(&state.db, id, params.policy()).await)
}
