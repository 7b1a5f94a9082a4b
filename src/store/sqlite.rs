use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::{RecordPatch, StoreError, TramiteStore};
use crate::database::DatabaseManager;
use crate::tramite::{Documents, KindDetails, NewTramite, Tramite, TramiteKind, TramiteStatus};

const SELECT_COLUMNS: &str = r#"
    SELECT id, case_number, kind, form_label, client_name, email, phone, cups,
           address, cadastral_ref, voltage, power, status, opened_at,
           power_increase, housing_type, multiple_supplies, centralized_connection,
           identity_document, authorization_form, point_relation_template
    FROM tramites
"#;

/// SQLite-backed trámite store
#[derive(Debug, Clone)]
pub struct SqliteTramiteStore {
    pool: SqlitePool,
}

impl SqliteTramiteStore {
    pub fn new(database: &DatabaseManager) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }

    async fn fetch_one_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Tramite>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE {column} = ?1 ORDER BY id ASC LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_tramite).transpose()
    }
}

fn row_to_tramite(row: &SqliteRow) -> Result<Tramite, StoreError> {
    let id: i64 = row.try_get("id")?;

    let kind: String = row.try_get("kind")?;
    let kind = kind.parse::<TramiteKind>().map_err(|e| StoreError::Corrupt {
        id,
        field: "kind",
        message: e.to_string(),
    })?;

    let status: String = row.try_get("status")?;
    let status = status.parse::<TramiteStatus>().map_err(|e| StoreError::Corrupt {
        id,
        field: "status",
        message: e.to_string(),
    })?;

    Ok(Tramite {
        id,
        case_number: row.try_get("case_number")?,
        kind,
        form_label: row.try_get("form_label")?,
        client_name: row.try_get("client_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        cups: row.try_get("cups")?,
        address: row.try_get("address")?,
        cadastral_ref: row.try_get("cadastral_ref")?,
        voltage: row.try_get("voltage")?,
        power: row.try_get("power")?,
        status,
        opened_at: row.try_get("opened_at")?,
        details: KindDetails {
            power_increase: row.try_get("power_increase")?,
            housing_type: row.try_get("housing_type")?,
            multiple_supplies: row.try_get("multiple_supplies")?,
            centralized_connection: row.try_get("centralized_connection")?,
        },
        documents: Documents {
            identity_document: row.try_get("identity_document")?,
            authorization_form: row.try_get("authorization_form")?,
            point_relation_template: row.try_get("point_relation_template")?,
        },
    })
}

#[async_trait]
impl TramiteStore for SqliteTramiteStore {
    async fn insert(
        &self,
        new: &NewTramite,
        opened_at: DateTime<Utc>,
    ) -> Result<Tramite, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tramites (
                case_number, kind, form_label, client_name, email, phone, cups,
                address, cadastral_ref, voltage, power, status, opened_at,
                power_increase, housing_type, multiple_supplies, centralized_connection,
                identity_document, authorization_form, point_relation_template
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
            "#,
        )
        .bind(&new.case_number)
        .bind(new.kind.as_str())
        .bind(&new.form_label)
        .bind(&new.client_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.cups)
        .bind(&new.address)
        .bind(&new.cadastral_ref)
        .bind(&new.voltage)
        .bind(&new.power)
        .bind(TramiteStatus::default().as_str())
        .bind(opened_at)
        .bind(new.details.power_increase)
        .bind(&new.details.housing_type)
        .bind(new.details.multiple_supplies)
        .bind(new.details.centralized_connection)
        .bind(&new.documents.identity_document)
        .bind(&new.documents.authorization_form)
        .bind(&new.documents.point_relation_template)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted tramite {}", id);

        self.get(id).await?.ok_or(StoreError::NotFound { id })
    }

    async fn get(&self, id: i64) -> Result<Option<Tramite>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_tramite).transpose()
    }

    async fn list(&self) -> Result<Vec<Tramite>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(row_to_tramite).collect()
    }

    async fn update_fields(&self, id: i64, patch: &RecordPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return match self.get(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound { id }),
            };
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tramites SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(case_number) = &patch.case_number {
                set.push("case_number = ").push_bind_unseparated(case_number.clone());
            }
            if let Some(status) = patch.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(cups) = &patch.cups {
                set.push("cups = ").push_bind_unseparated(cups.clone());
            }
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }

        debug!("Updated tramite {} ({:?})", id, patch);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tramites WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_case_number(
        &self,
        case_number: &str,
    ) -> Result<Option<Tramite>, StoreError> {
        self.fetch_one_where("case_number", case_number).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Tramite>, StoreError> {
        self.fetch_one_where("email", email).await
    }
}
