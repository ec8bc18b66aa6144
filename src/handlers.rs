use crate::errors::AppError;
use crate::layout::starting_index;
use crate::models::{GridResponse, Toggle, ToggleRequest, ToggleResponse};
use crate::state::{AppState, Session};
use crate::ui::{render_index, render_loading};
use axum::{
    Json,
    extract::{Path, State},
    response::{Html, Redirect},
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    match &*session {
        Session::Loading => Html(render_loading()),
        Session::Ready(grid) => Html(render_index(state.year, grid)),
    }
}

pub async fn get_grid(State(state): State<AppState>) -> Result<Json<GridResponse>, AppError> {
    let session = state.session.lock().await;
    match &*session {
        Session::Loading => Err(AppError::loading()),
        Session::Ready(grid) => Ok(Json(GridResponse {
            year: state.year.value(),
            starting_index: starting_index(state.year),
            cells: grid.clone(),
        })),
    }
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let response = apply_toggle(&state, payload.index).await?;
    Ok(Json(response))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, index).await?;
    Ok(Redirect::to("/"))
}

async fn apply_toggle(state: &AppState, index: usize) -> Result<ToggleResponse, AppError> {
    let mut session = state.session.lock().await;
    let Session::Ready(grid) = &mut *session else {
        return Err(AppError::loading());
    };

    match state.gateway.toggle_cell(state.year, grid, index) {
        Toggle::OutOfRange => Err(AppError::bad_request(format!(
            "index {index} is outside the grid"
        ))),
        Toggle::Padding | Toggle::Flipped(_) => Ok(ToggleResponse {
            index,
            cell: grid.get(index).cloned(),
        }),
    }
}
