//! HTTP handlers for `/api/contacts`.
//!
//! Thin handlers that extract validated input and delegate to `ContactService`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use contacts_core::{
    AppResult, Contact, ContactQuery, CreateContactRequest, UpdateContactRequest,
};

use super::{ValidJson, ValidQuery};
use crate::startup::AppState;

/// Contact routes, nested under `/api/contacts` by the caller.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route("/groups", get(list_groups))
        .route(
            "/{id}",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
}

async fn create_contact(
    State(state): State<AppState>,
    ValidJson(contact): ValidJson<CreateContactRequest>,
) -> AppResult<(StatusCode, Json<Contact>)> {
    let created = state.contacts.create(contact).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_contacts(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<ContactQuery>,
) -> AppResult<Json<Vec<Contact>>> {
    state.contacts.list(filter).await.map(Json)
}

async fn list_groups(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    state.contacts.groups().await.map(Json)
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    state.contacts.get(&id).await.map(Json)
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<UpdateContactRequest>,
) -> AppResult<Json<Contact>> {
    state.contacts.update(&id, changes).await.map(Json)
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.contacts.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
