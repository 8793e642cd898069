use anyhow::{Context, Result};
use rusqlite::Connection;

/// Text columns use NOCASE so that email uniqueness and name/title ordering
/// ignore case. The enrollment foreign keys carry no ON DELETE action: the
/// repositories delete dependents explicitly so they can count them.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS alunos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT NOT NULL COLLATE NOCASE,
        email TEXT NOT NULL COLLATE NOCASE UNIQUE
    );

    CREATE TABLE IF NOT EXISTS cursos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        titulo TEXT NOT NULL COLLATE NOCASE,
        descricao TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS matriculas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        aluno_id INTEGER NOT NULL REFERENCES alunos(id),
        curso_id INTEGER NOT NULL REFERENCES cursos(id),
        UNIQUE (aluno_id, curso_id)
    );

    CREATE INDEX IF NOT EXISTS idx_matriculas_curso ON matriculas(curso_id);
";

pub fn ensure(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!("BEGIN TRANSACTION; {} COMMIT;", SCHEMA))
        .context("Failed to create schema")?;
    tracing::debug!("Schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i32 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
             AND name IN ('alunos', 'cursos', 'matriculas')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn creates_tables_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        assert_eq!(table_count(&conn), 3);
    }

    #[test]
    fn is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        conn.execute(
            "INSERT INTO alunos (nome, email) VALUES ('Ana', 'ana@x.com')",
            [],
        )
        .unwrap();

        ensure(&conn).unwrap();

        let students: i32 = conn
            .query_row("SELECT COUNT(*) FROM alunos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(students, 1);
    }

    #[test]
    fn email_uniqueness_ignores_case() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        conn.execute(
            "INSERT INTO alunos (nome, email) VALUES ('Ana', 'ana@x.com')",
            [],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO alunos (nome, email) VALUES ('Ana', 'ANA@X.COM')",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn enrollment_pair_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO alunos (nome, email) VALUES ('Ana', 'ana@x.com');
             INSERT INTO cursos (titulo, descricao) VALUES ('Rust', 'Sistemas');
             INSERT INTO matriculas (aluno_id, curso_id) VALUES (1, 1);",
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO matriculas (aluno_id, curso_id) VALUES (1, 1)",
            [],
        );
        assert!(duplicate.is_err());
    }
}
