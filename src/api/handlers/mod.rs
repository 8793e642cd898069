pub mod courses;
pub mod enrollments;
pub mod students;

use axum::{response::IntoResponse, Json};
use serde::Serialize;

use crate::error::{AppError, Resource};
use crate::models::CascadeDeletion;

/// Answer to deleting a student or course.
#[derive(Serialize)]
pub struct RemovalResponse {
    #[serde(rename = "mensagem")]
    message: String,
    #[serde(rename = "matriculas_removidas")]
    removed_enrollments: usize,
}

impl RemovalResponse {
    fn new(kind: &str, deletion: CascadeDeletion) -> Self {
        Self {
            message: format!("{} \"{}\" removido com sucesso", kind, deletion.label),
            removed_enrollments: deletion.removed_enrollments,
        }
    }
}

pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "mensagem": "API de Matrículas - Sistema de Gestão de Alunos e Cursos",
        "endpoints": {
            "alunos": [
                "POST /alunos/novoaluno - Cadastrar novo aluno",
                "GET /alunos - Listar todos os alunos",
                "GET /alunos/<id> - Ver detalhes de um aluno",
                "PUT /alunos/atualizaaluno - Atualizar aluno",
                "DELETE /alunos/removealuno/<id> - Excluir aluno"
            ],
            "cursos": [
                "POST /cursos/novocurso - Cadastrar novo curso",
                "GET /cursos - Listar todos os cursos",
                "GET /cursos/<id> - Ver detalhes de um curso",
                "PUT /cursos/atualizacurso - Atualizar curso",
                "DELETE /cursos/removecurso/<id> - Excluir curso"
            ],
            "matriculas": [
                "POST /matriculas - Matricular aluno em curso",
                "GET /matriculas/aluno/<id>/cursos - Cursos do aluno",
                "GET /matriculas/curso/<id>/alunos - Alunos do curso",
                "GET /matriculas/listar - Listar todas as matrículas"
            ]
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn not_found() -> AppError {
    AppError::NotFound(Resource::Endpoint)
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
