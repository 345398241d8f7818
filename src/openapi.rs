use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gruntex Catalog API",
        version = "0.3.0",
        description = r#"
Catalog and admin backend for the Gruntex construction-equipment reseller.

Public endpoints serve the denormalized machine catalog (images, sections,
downloads, feature and parameter values, variant groups, accessories) and
accept quote requests. Admin endpoints, gated by a bearer session, manage
machines, categories, attribute definitions, variants, accessory links,
leads, users and SMTP settings.

Errors are returned as `{ "error": "<message>" }` with conventional HTTP
status codes.
        "#,
        contact(name = "Gruntex", email = "dev@gruntex.example"),
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Machines", description = "Machine catalog and mutation workflows"),
        (name = "Categories", description = "Category management"),
        (name = "Quote", description = "Public lead capture"),
        (name = "Auth", description = "Admin sessions")
    ),
    paths(
        crate::handlers::machines::list_machines,
        crate::handlers::machines::get_machine,
        crate::handlers::machines::create_machine,
        crate::handlers::machines::update_machine,
        crate::handlers::machines::delete_machine,
        crate::handlers::machines::clone_machine,
        crate::handlers::categories::create_category,
        crate::handlers::contacts::submit_quote,
        crate::handlers::auth::login,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::handlers::machines::CreateMachineRequest,
            crate::handlers::machines::UpdateMachineRequest,
            crate::handlers::categories::CategoryRequest,
            crate::handlers::contacts::QuoteRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::RegisterRequest,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
