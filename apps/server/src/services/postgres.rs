// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PostgreSQL element store. Bulk writes use UNNEST inserts inside one
//! transaction.

use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use twinbim_core::{Element, ElementRecord, Project, StructureType};

use crate::error::ApiError;

/// Database row of `bim_element`. Any vector column may be null in rows
/// written by older clients.
#[derive(Debug, sqlx::FromRow)]
struct ElementRow {
    element_id: String,
    project_id: String,
    element_type: String,
    material: String,
    position_x: Option<f64>,
    position_y: Option<f64>,
    position_z: Option<f64>,
    size_x: Option<f64>,
    size_y: Option<f64>,
    size_z: Option<f64>,
    position_data: Option<String>,
    size_data: Option<String>,
}

impl ElementRow {
    fn into_element(self) -> Element {
        Element::from_record(&ElementRecord {
            element_id: self.element_id,
            project_id: Some(self.project_id),
            element_type: Some(self.element_type),
            material: Some(self.material),
            position_x: self.position_x,
            position_y: self.position_y,
            position_z: self.position_z,
            size_x: self.size_x,
            size_y: self.size_y,
            size_z: self.size_z,
            position_data: self.position_data.map(Value::String),
            size_data: self.size_data.map(Value::String),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    project_id: String,
    project_name: String,
    structure_type: String,
    span_count: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            project_id: row.project_id,
            project_name: row.project_name,
            structure_type: StructureType::from(row.structure_type),
            span_count: row.span_count,
        }
    }
}

const ELEMENT_COLUMNS: &str = "element_id, project_id, element_type, material, \
     position_x, position_y, position_z, size_x, size_y, size_z, position_data, size_data";

/// Element store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT project_id, project_name, structure_type, span_count
            FROM bim_project
            ORDER BY project_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    pub async fn project(&self, project_id: &str) -> Result<Option<Project>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT project_id, project_name, structure_type, span_count
            FROM bim_project
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Project::from))
    }

    /// Insert a new project with its initial elements; `false` if the id is taken.
    pub async fn create_project(
        &self,
        project: &Project,
        elements: &[Element],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO bim_project (project_id, project_name, structure_type, span_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id) DO NOTHING
            "#,
        )
        .bind(&project.project_id)
        .bind(&project.project_name)
        .bind(project.structure_type.as_str())
        .bind(&project.span_count)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if !insert_elements(&mut *tx, elements).await? {
            tx.rollback().await?;
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }

    /// Remove a project; elements go with it through the cascading key.
    pub async fn delete_project(&self, project_id: &str) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM bim_project WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    /// Elements sorted by id, optionally limited to one project.
    pub async fn list_elements(
        &self,
        project_id: Option<&str>,
    ) -> Result<Vec<Element>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ElementRow>(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM bim_element \
             WHERE $1::VARCHAR IS NULL OR project_id = $1 \
             ORDER BY element_id"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ElementRow::into_element).collect())
    }

    /// Merge an update onto the stored element; `false` if unknown.
    pub async fn update_element(&self, record: &ElementRecord) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ElementRow>(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM bim_element WHERE element_id = $1 FOR UPDATE"
        ))
        .bind(&record.element_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(false);
        };

        let mut element = row.into_element();
        element.apply_record(record);

        sqlx::query(
            r#"
            UPDATE bim_element
            SET material = $2,
                position_x = $3, position_y = $4, position_z = $5,
                size_x = $6, size_y = $7, size_z = $8,
                position_data = $9, size_data = $10
            WHERE element_id = $1
            "#,
        )
        .bind(&element.element_id)
        .bind(&element.material)
        .bind(element.position.x)
        .bind(element.position.y)
        .bind(element.position.z)
        .bind(element.size.x)
        .bind(element.size.y)
        .bind(element.size.z)
        .bind(element.position_data())
        .bind(element.size_data())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Upsert the project and replace all of its elements in one transaction.
    ///
    /// Returns the id of the first element already owned by another project;
    /// the transaction is rolled back in that case.
    pub async fn save_model(
        &self,
        project: &Project,
        elements: &[Element],
    ) -> Result<Option<String>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let taken = owned_elsewhere(&mut *tx, &project.project_id, elements).await?;
        if taken.is_some() {
            tx.rollback().await?;
            return Ok(taken);
        }

        sqlx::query(
            r#"
            INSERT INTO bim_project (project_id, project_name, structure_type, span_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id) DO UPDATE
            SET project_name = EXCLUDED.project_name,
                structure_type = EXCLUDED.structure_type,
                span_count = EXCLUDED.span_count
            "#,
        )
        .bind(&project.project_id)
        .bind(&project.project_name)
        .bind(project.structure_type.as_str())
        .bind(&project.span_count)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM bim_element WHERE project_id = $1")
            .bind(&project.project_id)
            .execute(&mut *tx)
            .await?;

        if !insert_elements(&mut *tx, elements).await? {
            // Another project claimed an id after the check above.
            tx.rollback().await?;
            let mut conn = self.pool.acquire().await?;
            let taken = owned_elsewhere(&mut *conn, &project.project_id, elements).await?;
            return Ok(taken.or_else(|| elements.first().map(|e| e.element_id.clone())));
        }
        tx.commit().await?;

        tracing::info!(
            project_id = %project.project_id,
            elements = elements.len(),
            "Saved model to PostgreSQL"
        );
        Ok(None)
    }
}

/// First of `elements` whose id is stored under a project other than `project_id`.
async fn owned_elsewhere(
    conn: &mut sqlx::PgConnection,
    project_id: &str,
    elements: &[Element],
) -> Result<Option<String>, sqlx::Error> {
    let element_ids: Vec<String> = elements.iter().map(|e| e.element_id.clone()).collect();
    sqlx::query_scalar(
        r#"
        SELECT element_id FROM bim_element
        WHERE element_id = ANY($1::VARCHAR[]) AND project_id <> $2
        ORDER BY element_id
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(&element_ids)
    .bind(project_id)
    .fetch_optional(conn)
    .await
}

// ─── Bulk insert helpers using UNNEST ───────────────────────────────────────

const BATCH_SIZE: usize = 5_000;

/// Upsert elements; `false` if any id belongs to another project, which
/// leaves that row untouched.
async fn insert_elements(
    conn: &mut sqlx::PgConnection,
    elements: &[Element],
) -> Result<bool, sqlx::Error> {
    if elements.is_empty() {
        return Ok(true);
    }

    for chunk in elements.chunks(BATCH_SIZE) {
        let len = chunk.len();
        let mut element_ids = Vec::with_capacity(len);
        let mut project_ids = Vec::with_capacity(len);
        let mut element_types = Vec::with_capacity(len);
        let mut materials = Vec::with_capacity(len);
        let mut px = Vec::with_capacity(len);
        let mut py = Vec::with_capacity(len);
        let mut pz = Vec::with_capacity(len);
        let mut sx = Vec::with_capacity(len);
        let mut sy = Vec::with_capacity(len);
        let mut sz = Vec::with_capacity(len);
        let mut position_data = Vec::with_capacity(len);
        let mut size_data = Vec::with_capacity(len);

        for element in chunk {
            element_ids.push(element.element_id.clone());
            project_ids.push(element.project_id.clone());
            element_types.push(element.element_type.clone());
            materials.push(element.material.clone());
            px.push(element.position.x);
            py.push(element.position.y);
            pz.push(element.position.z);
            sx.push(element.size.x);
            sy.push(element.size.y);
            sz.push(element.size.z);
            position_data.push(element.position_data());
            size_data.push(element.size_data());
        }

        let written = sqlx::query(
            r#"
            INSERT INTO bim_element
                (element_id, project_id, element_type, material,
                 position_x, position_y, position_z,
                 size_x, size_y, size_z,
                 position_data, size_data)
            SELECT * FROM UNNEST(
                $1::VARCHAR[],
                $2::VARCHAR[],
                $3::VARCHAR[],
                $4::VARCHAR[],
                $5::FLOAT8[],
                $6::FLOAT8[],
                $7::FLOAT8[],
                $8::FLOAT8[],
                $9::FLOAT8[],
                $10::FLOAT8[],
                $11::TEXT[],
                $12::TEXT[]
            )
            ON CONFLICT (element_id) DO UPDATE
            SET element_type = EXCLUDED.element_type,
                material = EXCLUDED.material,
                position_x = EXCLUDED.position_x,
                position_y = EXCLUDED.position_y,
                position_z = EXCLUDED.position_z,
                size_x = EXCLUDED.size_x,
                size_y = EXCLUDED.size_y,
                size_z = EXCLUDED.size_z,
                position_data = EXCLUDED.position_data,
                size_data = EXCLUDED.size_data
            WHERE bim_element.project_id = EXCLUDED.project_id
            "#,
        )
        .bind(&element_ids)
        .bind(&project_ids)
        .bind(&element_types)
        .bind(&materials)
        .bind(&px)
        .bind(&py)
        .bind(&pz)
        .bind(&sx)
        .bind(&sy)
        .bind(&sz)
        .bind(&position_data)
        .bind(&size_data)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if written < len as u64 {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twinbim_core::Vec3;

    fn row() -> ElementRow {
        ElementRow {
            element_id: "W-1".into(),
            project_id: "P-1".into(),
            element_type: "IfcWall".into(),
            material: "Brick".into(),
            position_x: None,
            position_y: None,
            position_z: None,
            size_x: None,
            size_y: None,
            size_z: None,
            position_data: Some("['1.5', '0', '-2']".into()),
            size_data: Some("[0.3, 3, 8]".into()),
        }
    }

    #[test]
    fn test_legacy_only_row_decodes() {
        let element = row().into_element();
        assert_eq!(element.position, Vec3::new(1.5, 0.0, -2.0));
        assert_eq!(element.size, Vec3::new(0.3, 3.0, 8.0));
    }

    #[test]
    fn test_discrete_columns_override_legacy_text() {
        let element = ElementRow {
            position_y: Some(4.0),
            ..row()
        }
        .into_element();
        assert_eq!(element.position, Vec3::new(1.5, 4.0, -2.0));
    }

    #[test]
    fn test_project_row_conversion() {
        let project = Project::from(ProjectRow {
            project_id: "P-1".into(),
            project_name: "Hall".into(),
            structure_type: "building".into(),
            span_count: None,
        });
        assert_eq!(project.structure_type, StructureType::Building);
        assert_eq!(project.span_count(), 1);
    }
}
