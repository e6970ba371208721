use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::collect;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{codec, Address, BloodGroup, Gender, Patient};
use crate::repository::filters::{like_pattern, PatientSearch};
use crate::repository::PatientRepository;

const SELECT_PATIENT: &str = r#"
    SELECT id, first_name, last_name, email, phone_number, date_of_birth,
           gender, blood_group, address, created_at, updated_at
    FROM patients
"#;

#[derive(sqlx::FromRow)]
struct PatientRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    date_of_birth: String,
    gender: i32,
    blood_group: i32,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = DatabaseError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            date_of_birth: row.date_of_birth,
            gender: Gender::try_from(row.gender)?,
            blood_group: BloodGroup::try_from(row.blood_group)?,
            address: codec::decode_optional::<Address>("address", row.address.as_deref())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed patient repository
#[derive(Debug, Clone)]
pub struct PostgresPatientRepository {
    pool: PgPool,
}

impl PostgresPatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> DatabaseResult<Option<Patient>> {
        let sql = format!("{SELECT_PATIENT} WHERE {clause} = $1");
        sqlx::query_as::<_, PatientRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .map(Patient::try_from)
            .transpose()
    }
}

#[async_trait]
impl PatientRepository for PostgresPatientRepository {
    async fn create(&self, patient: &Patient) -> DatabaseResult<()> {
        debug!(patient_id = %patient.id, "Inserting patient");

        sqlx::query(
            r#"
            INSERT INTO patients (
                id, first_name, last_name, email, phone_number, date_of_birth,
                gender, blood_group, address, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(patient.id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(&patient.email)
        .bind(&patient.phone_number)
        .bind(&patient.date_of_birth)
        .bind(patient.gender.code())
        .bind(patient.blood_group.code())
        .bind(codec::encode_optional("address", patient.address.as_ref())?)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Patient>> {
        let sql = format!("{SELECT_PATIENT} WHERE id = $1");
        sqlx::query_as::<_, PatientRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Patient::try_from)
            .transpose()
    }

    async fn update(&self, patient: &Patient) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE patients
            SET first_name = $2, last_name = $3, email = $4, phone_number = $5,
                date_of_birth = $6, gender = $7, blood_group = $8, address = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(patient.id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(&patient.email)
        .bind(&patient.phone_number)
        .bind(&patient.date_of_birth)
        .bind(patient.gender.code())
        .bind(patient.blood_group.code())
        .bind(codec::encode_optional("address", patient.address.as_ref())?)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryFailed(format!("patient {} does not exist", patient.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, filter: &PatientSearch) -> DatabaseResult<Vec<Patient>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PATIENT);
        query.push(" WHERE TRUE");

        if let Some(name) = &filter.name {
            let pattern = like_pattern(name);
            query
                .push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(email) = &filter.email {
            query.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(phone) = &filter.phone_number {
            query.push(" AND phone_number = ").push_bind(phone.clone());
        }
        if let Some(id) = filter.patient_id {
            query.push(" AND id = ").push_bind(id);
        }
        query.push(" ORDER BY created_at ASC");

        let rows = query.build_query_as::<PatientRow>().fetch_all(&self.pool).await?;
        collect(rows)
    }

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Patient>> {
        self.fetch_one_where("email", email).await
    }

    async fn get_by_phone(&self, phone_number: &str) -> DatabaseResult<Option<Patient>> {
        self.fetch_one_where("phone_number", phone_number).await
    }
}
