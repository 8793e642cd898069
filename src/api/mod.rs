mod error;
mod extract;
mod handlers;

pub use extract::{JsonBody, ResourceId};

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::db::{CourseRepo, Database, EnrollmentService, StudentRepo};

/// Shared handler state. Each repository holds its own handle on the
/// connection pool.
#[derive(Clone)]
pub struct AppState {
    pub students: StudentRepo,
    pub courses: CourseRepo,
    pub enrollments: EnrollmentService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            students: StudentRepo::new(db.clone()),
            courses: CourseRepo::new(db.clone()),
            enrollments: EnrollmentService::new(db),
        }
    }
}

pub fn create_router(db: Database, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Students
        .route("/alunos", get(handlers::students::list))
        .route("/alunos/novoaluno", post(handlers::students::create))
        .route("/alunos/atualizaaluno", put(handlers::students::update))
        .route("/alunos/removealuno/{id}", delete(handlers::students::delete))
        .route("/alunos/{id}", get(handlers::students::get))
        // Courses
        .route("/cursos", get(handlers::courses::list))
        .route("/cursos/novocurso", post(handlers::courses::create))
        .route("/cursos/atualizacurso", put(handlers::courses::update))
        .route("/cursos/removecurso/{id}", delete(handlers::courses::delete))
        .route("/cursos/{id}", get(handlers::courses::get))
        // Enrollments
        .route("/matriculas", post(handlers::enrollments::enroll))
        .route("/matriculas/listar", get(handlers::enrollments::list_all))
        .route(
            "/matriculas/aluno/{id}/cursos",
            get(handlers::enrollments::courses_for_student),
        )
        .route(
            "/matriculas/curso/{id}/alunos",
            get(handlers::enrollments::students_for_course),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(AppState::new(db))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
