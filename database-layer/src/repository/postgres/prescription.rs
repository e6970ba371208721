use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::collect;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{codec, Prescription};
use crate::repository::filters::DateRange;
use crate::repository::PrescriptionRepository;

const SELECT_PRESCRIPTION: &str = r#"
    SELECT id, appointment_id, patient_id, patient_name, doctor_id, doctor_name, medications,
           diagnosis, additional_instructions, prescription_date, valid_until, is_active, created_at
    FROM prescriptions
"#;

const RANGE_CLAUSE: &str = r#"
      AND ($2::TIMESTAMPTZ IS NULL OR prescription_date >= $2)
      AND ($3::TIMESTAMPTZ IS NULL OR prescription_date < $3)
    ORDER BY prescription_date DESC
"#;

#[derive(sqlx::FromRow)]
struct PrescriptionRow {
    id: Uuid,
    appointment_id: Option<Uuid>,
    patient_id: Uuid,
    patient_name: String,
    doctor_id: Uuid,
    doctor_name: String,
    medications: String,
    diagnosis: String,
    additional_instructions: String,
    prescription_date: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PrescriptionRow> for Prescription {
    type Error = DatabaseError;

    fn try_from(row: PrescriptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            appointment_id: row.appointment_id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            doctor_id: row.doctor_id,
            doctor_name: row.doctor_name,
            medications: codec::decode_list("medications", &row.medications)?,
            diagnosis: row.diagnosis,
            additional_instructions: row.additional_instructions,
            prescription_date: row.prescription_date,
            valid_until: row.valid_until,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL-backed prescription repository
#[derive(Debug, Clone)]
pub struct PostgresPrescriptionRepository {
    pool: PgPool,
}

impl PostgresPrescriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, owner_column: &str, owner_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>> {
        let sql = format!("{SELECT_PRESCRIPTION} WHERE {owner_column} = $1 {RANGE_CLAUSE}");
        let rows = sqlx::query_as::<_, PrescriptionRow>(&sql)
            .bind(owner_id)
            .bind(range.start())
            .bind(range.end_exclusive())
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }
}

#[async_trait]
impl PrescriptionRepository for PostgresPrescriptionRepository {
    async fn create(&self, prescription: &Prescription) -> DatabaseResult<()> {
        debug!(prescription_id = %prescription.id, "Inserting prescription");

        sqlx::query(
            r#"
            INSERT INTO prescriptions (
                id, appointment_id, patient_id, patient_name, doctor_id, doctor_name, medications,
                diagnosis, additional_instructions, prescription_date, valid_until, is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(prescription.id)
        .bind(prescription.appointment_id)
        .bind(prescription.patient_id)
        .bind(&prescription.patient_name)
        .bind(prescription.doctor_id)
        .bind(&prescription.doctor_name)
        .bind(codec::encode("medications", &prescription.medications)?)
        .bind(&prescription.diagnosis)
        .bind(&prescription.additional_instructions)
        .bind(prescription.prescription_date)
        .bind(prescription.valid_until)
        .bind(prescription.is_active)
        .bind(prescription.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Prescription>> {
        let sql = format!("{SELECT_PRESCRIPTION} WHERE id = $1");
        sqlx::query_as::<_, PrescriptionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Prescription::try_from)
            .transpose()
    }

    async fn list_by_patient(&self, patient_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>> {
        self.list_where("patient_id", patient_id, range).await
    }

    async fn list_by_doctor(&self, doctor_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<Prescription>> {
        self.list_where("doctor_id", doctor_id, range).await
    }

    async fn get_by_appointment(&self, appointment_id: Uuid) -> DatabaseResult<Option<Prescription>> {
        let sql = format!("{SELECT_PRESCRIPTION} WHERE appointment_id = $1 ORDER BY created_at ASC LIMIT 1");
        sqlx::query_as::<_, PrescriptionRow>(&sql)
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Prescription::try_from)
            .transpose()
    }
}
