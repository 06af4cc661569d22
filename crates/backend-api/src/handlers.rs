//! The handler set. Every handler takes a request envelope, validates it,
//! makes at most one store call through [`UserService`], and produces a
//! response envelope. Validation happens before the store is touched.
//!
//! [`UserService`]: crate::services::UserService

use roster_database::User;
use tracing::debug;

use crate::cursor::decode_scan_key;
use crate::routes::models::{
    records, CreateUserRequest, MessageResponse, NameQueryResponse, UpdateUserRequest,
    UserRecord, UsersPageResponse,
};
use crate::services::{NameLookup, PageRequest, SortKey, SortOrder};
use crate::util::{non_empty, parse_limit, require_path_id};
use crate::{ApiError, ApiRequest, ApiResponse, AppState, Operation};

type HandlerResult = Result<ApiResponse, ApiError>;

/// Run one operation against a request envelope.
#[tracing::instrument(skip_all, fields(operation = %operation))]
pub async fn invoke(state: &AppState, operation: Operation, request: &ApiRequest) -> ApiResponse {
    let result = match operation {
        Operation::CreateUser => create_user(state, request).await,
        Operation::GetUsers => get_users(state).await,
        Operation::PaginateUsers => paginate_users(state, request).await,
        Operation::PaginateAndSortUsers => paginate_and_sort_users(state, request).await,
        Operation::QueryUsersByName => query_users_by_name(state, request).await,
        Operation::SortUsers => sort_users(state, request).await,
        Operation::SoftDeleteUser => soft_delete_user(state, request).await,
        Operation::DeleteUser => delete_user(state, request).await,
        Operation::UpdateUser => update_user(state, request).await,
    };

    match result {
        Ok(response) => response,
        Err(error) => {
            if error.status.is_client_error() {
                debug!(status = error.status.as_u16(), error = %error.message, "request rejected");
            }
            error.into()
        }
    }
}

pub async fn create_user(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let payload: CreateUserRequest = request.json_body()?;
    let (Some(id), Some(name), Some(email)) = (
        non_empty(payload.id.as_deref()),
        non_empty(payload.name.as_deref()),
        non_empty(payload.email.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Missing id, name, or email"));
    };

    state.users().create(User::new(id, name, email)).await?;

    Ok(ApiResponse::ok(&MessageResponse::new(
        "User created successfully",
    )))
}

pub async fn get_users(state: &AppState) -> HandlerResult {
    let users = state.users().list_active().await?;
    Ok(ApiResponse::ok(&records(users)))
}

pub async fn paginate_users(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let page_request = page_request(request, state.pagination().default_limit)?;
    let page = state.users().paginate(page_request).await?;

    Ok(ApiResponse::ok(&UsersPageResponse {
        items: records(page.items),
        last_key: page.last_key,
    }))
}

pub async fn paginate_and_sort_users(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let sort_key = SortKey::from_param(request.query_parameter("sortBy"))
        .ok_or_else(|| ApiError::bad_request(r#"Invalid sort key. Use "id" or "name"."#))?;
    let page_request = page_request(request, state.pagination().sorted_default_limit)?;

    let page = state.users().paginate_sorted(page_request, sort_key).await?;

    Ok(ApiResponse::ok(&UsersPageResponse {
        items: records(page.items),
        last_key: page.last_key,
    }))
}

pub async fn query_users_by_name(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let name = non_empty(request.query_parameter("name"))
        .ok_or_else(|| ApiError::bad_request("Missing query parameter: name"))?;
    let limit = parse_limit(
        request.query_parameter("limit"),
        state.pagination().query_default_limit,
    )?;

    let page = state
        .users()
        .query_by_name(NameLookup {
            name: name.to_string(),
            limit,
            order: SortOrder::from_param(request.query_parameter("order")),
            last_key: non_empty(request.query_parameter("lastKey")).map(str::to_string),
        })
        .await?;

    Ok(ApiResponse::ok(&NameQueryResponse {
        items: records(page.items),
        last_evaluated_key: page.last_evaluated_key,
    }))
}

pub async fn sort_users(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let sort_key = SortKey::from_param(request.query_parameter("sortBy"))
        .ok_or_else(|| ApiError::bad_request(r#"Invalid sort key. Use "name" or "id"."#))?;

    let users = state.users().sort_all(sort_key).await?;
    Ok(ApiResponse::ok(&records(users)))
}

pub async fn soft_delete_user(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let id = require_path_id(request)?;
    state.users().soft_delete(id).await?;

    Ok(ApiResponse::ok(&MessageResponse::new(format!(
        "User with id {id} soft-deleted."
    ))))
}

pub async fn delete_user(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let id = require_path_id(request)?;
    state.users().delete(id).await?;

    Ok(ApiResponse::ok(&MessageResponse::new(
        "User deleted successfully",
    )))
}

pub async fn update_user(state: &AppState, request: &ApiRequest) -> HandlerResult {
    let id = require_path_id(request)?;
    let payload: UpdateUserRequest = request.json_body()?;
    let (Some(name), Some(email)) = (
        non_empty(payload.name.as_deref()),
        non_empty(payload.email.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Missing name or email"));
    };

    let user = state
        .users()
        .update(id, name.to_string(), email.to_string())
        .await?;

    Ok(ApiResponse::ok(&UserRecord::from(user)))
}

fn page_request(request: &ApiRequest, default_limit: u32) -> Result<PageRequest, ApiError> {
    let limit = parse_limit(request.query_parameter("limit"), default_limit)?;
    let start = non_empty(request.query_parameter("lastKey"))
        .map(decode_scan_key)
        .transpose()
        .map_err(|error| {
            debug!(%error, "rejected continuation token");
            ApiError::bad_request("Invalid lastKey encoding")
        })?;

    Ok(PageRequest { limit, start })
}
