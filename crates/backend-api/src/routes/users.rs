//! HTTP adapters. Each route packs the request into an envelope and runs the
//! same handler the `invoke` command uses.

use std::collections::HashMap;

use axum::extract::{Path, RawQuery, State};

use crate::handlers::invoke;
use crate::{ApiRequest, ApiResponse, AppState, Operation};

/// Split a raw query string into parameters, percent-decoding each part.
/// `+` stays a literal plus so base64 tokens survive unescaped.
pub fn query_parameters(raw: Option<&str>) -> HashMap<String, String> {
    raw.unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn envelope(query: HashMap<String, String>, body: String) -> ApiRequest {
    let mut request = ApiRequest::new();
    if !query.is_empty() {
        request = request.with_query_parameters(query);
    }
    if !body.is_empty() {
        request = request.with_body(body);
    }
    request
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = crate::routes::models::CreateUserRequest,
    responses(
        (status = 200, description = "User stored", body = crate::routes::models::MessageResponse),
        (status = 400, description = "Missing id, name, or email", body = crate::error::ErrorResponse),
        (status = 500, description = "Could not create user", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(State(state): State<AppState>, body: String) -> ApiResponse {
    invoke(&state, Operation::CreateUser, &envelope(HashMap::new(), body)).await
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Users that are not soft-deleted", body = [crate::routes::models::UserRecord]),
        (status = 500, description = "Could not fetch users", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_users(State(state): State<AppState>) -> ApiResponse {
    invoke(&state, Operation::GetUsers, &ApiRequest::new()).await
}

#[utoipa::path(
    get,
    path = "/users/paginate",
    tag = "Users",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, default 5"),
        ("lastKey" = Option<String>, Query, description = "Token from the previous page")
    ),
    responses(
        (status = 200, description = "One page of users", body = crate::routes::models::UsersPageResponse),
        (status = 400, description = "Invalid limit or lastKey", body = crate::error::ErrorResponse),
        (status = 500, description = "Could not paginate users", body = crate::error::ErrorResponse)
    )
)]
pub async fn paginate_users(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResponse {
    invoke(
        &state,
        Operation::PaginateUsers,
        &envelope(query_parameters(query.as_deref()), String::new()),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/users/paginate/sorted",
    tag = "Users",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, default 3"),
        ("lastKey" = Option<String>, Query, description = "Token from the previous page"),
        ("sortBy" = Option<String>, Query, description = "`id` or `name` (default)")
    ),
    responses(
        (status = 200, description = "One page of users sorted within the page", body = crate::routes::models::UsersPageResponse),
        (status = 400, description = "Invalid sort key, limit or lastKey", body = crate::error::ErrorResponse),
        (status = 500, description = "Could not paginate and sort users", body = crate::error::ErrorResponse)
    )
)]
pub async fn paginate_and_sort_users(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResponse {
    invoke(
        &state,
        Operation::PaginateAndSortUsers,
        &envelope(query_parameters(query.as_deref()), String::new()),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/users/query",
    tag = "Users",
    params(
        ("name" = String, Query, description = "Exact name to match"),
        ("limit" = Option<u32>, Query, description = "Page size, default 5"),
        ("order" = Option<String>, Query, description = "`desc` for descending ids"),
        ("lastKey" = Option<String>, Query, description = "Id of the last user on the previous page")
    ),
    responses(
        (status = 200, description = "Users with the given name", body = crate::routes::models::NameQueryResponse),
        (status = 400, description = "Missing name or invalid limit", body = crate::error::ErrorResponse),
        (status = 500, description = "Could not query users by name", body = crate::error::ErrorResponse)
    )
)]
pub async fn query_users_by_name(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResponse {
    invoke(
        &state,
        Operation::QueryUsersByName,
        &envelope(query_parameters(query.as_deref()), String::new()),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/users/sorted",
    tag = "Users",
    params(("sortBy" = Option<String>, Query, description = "`name` (default) or `id`")),
    responses(
        (status = 200, description = "All users sorted", body = [crate::routes::models::UserRecord]),
        (status = 400, description = "Invalid sort key", body = crate::error::ErrorResponse),
        (status = 500, description = "Could not sort users", body = crate::error::ErrorResponse)
    )
)]
pub async fn sort_users(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResponse {
    invoke(
        &state,
        Operation::SortUsers,
        &envelope(query_parameters(query.as_deref()), String::new()),
    )
    .await
}

#[utoipa::path(
    patch,
    path = "/users/{id}/soft-delete",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User marked as deleted", body = crate::routes::models::MessageResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Soft delete failed.", body = crate::error::ErrorResponse)
    )
)]
pub async fn soft_delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse {
    let request = ApiRequest::new().with_path_parameter("id", id);
    invoke(&state, Operation::SoftDeleteUser, &request).await
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User removed, or was never there", body = crate::routes::models::MessageResponse),
        (status = 500, description = "Could not delete user", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    let request = ApiRequest::new().with_path_parameter("id", id);
    invoke(&state, Operation::DeleteUser, &request).await
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = crate::routes::models::UpdateUserRequest,
    responses(
        (status = 200, description = "The updated user", body = crate::routes::models::UserRecord),
        (status = 400, description = "Missing name or email", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Could not update user", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> ApiResponse {
    let request = envelope(HashMap::new(), body).with_path_parameter("id", id);
    invoke(&state, Operation::UpdateUser, &request).await
}
