//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use common::ErrorResponse;
use domain::{UserPage, UserRequest, UserResponse, UserRole, UserStatus};

/// OpenAPI documentation for the user service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service",
        version = "0.1.0",
        description = "User lifecycle management: registration, lookup, search, updates and soft deletion"
    ),
    servers(
        (url = "http://localhost:8081", description = "Local development server")
    ),
    paths(
        user_handler::create_user,
        user_handler::get_user,
        user_handler::get_user_by_username,
        user_handler::list_users,
        user_handler::search_users,
        user_handler::update_user,
        user_handler::update_user_status,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserStatus,
            UserRole,
            UserRequest,
            UserResponse,
            UserPage,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;
