use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::users::create_user,
        crate::routes::users::get_users,
        crate::routes::users::paginate_users,
        crate::routes::users::paginate_and_sort_users,
        crate::routes::users::query_users_by_name,
        crate::routes::users::sort_users,
        crate::routes::users::soft_delete_user,
        crate::routes::users::delete_user,
        crate::routes::users::update_user
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::models::UserRecord,
            crate::routes::models::CreateUserRequest,
            crate::routes::models::UpdateUserRequest,
            crate::routes::models::MessageResponse,
            crate::routes::models::UsersPageResponse,
            crate::routes::models::NameQueryResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Users", description = "User records: CRUD, pagination, sorting, soft-delete")
    )
)]
pub struct ApiDoc;
