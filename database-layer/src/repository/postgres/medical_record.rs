use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::collect;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{codec, MedicalRecord, VitalSigns};
use crate::repository::filters::DateRange;
use crate::repository::MedicalRecordRepository;

const SELECT_RECORD: &str = r#"
    SELECT id, patient_id, doctor_id, visit_date, diagnosis, symptoms, treatment, prescriptions,
           lab_results, vital_signs, notes, follow_up_date, record_type, created_at, updated_at
    FROM medical_records
"#;

#[derive(sqlx::FromRow)]
struct MedicalRecordRow {
    id: Uuid,
    patient_id: Uuid,
    doctor_id: Uuid,
    visit_date: DateTime<Utc>,
    diagnosis: String,
    symptoms: String,
    treatment: String,
    prescriptions: String,
    lab_results: String,
    vital_signs: Option<String>,
    notes: String,
    follow_up_date: Option<DateTime<Utc>>,
    record_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MedicalRecordRow> for MedicalRecord {
    type Error = DatabaseError;

    fn try_from(row: MedicalRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            visit_date: row.visit_date,
            diagnosis: row.diagnosis,
            symptoms: row.symptoms,
            treatment: row.treatment,
            prescriptions: row.prescriptions,
            lab_results: row.lab_results,
            vital_signs: codec::decode_optional::<VitalSigns>("vital_signs", row.vital_signs.as_deref())?,
            notes: row.notes,
            follow_up_date: row.follow_up_date,
            record_type: row.record_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed medical record repository
#[derive(Debug, Clone)]
pub struct PostgresMedicalRecordRepository {
    pool: PgPool,
}

impl PostgresMedicalRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MedicalRecordRepository for PostgresMedicalRecordRepository {
    async fn create(&self, record: &MedicalRecord) -> DatabaseResult<()> {
        debug!(record_id = %record.id, patient_id = %record.patient_id, "Inserting medical record");

        sqlx::query(
            r#"
            INSERT INTO medical_records (
                id, patient_id, doctor_id, visit_date, diagnosis, symptoms, treatment, prescriptions,
                lab_results, vital_signs, notes, follow_up_date, record_type, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id)
        .bind(record.patient_id)
        .bind(record.doctor_id)
        .bind(record.visit_date)
        .bind(&record.diagnosis)
        .bind(&record.symptoms)
        .bind(&record.treatment)
        .bind(&record.prescriptions)
        .bind(&record.lab_results)
        .bind(codec::encode_optional("vital_signs", record.vital_signs.as_ref())?)
        .bind(&record.notes)
        .bind(record.follow_up_date)
        .bind(&record.record_type)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<MedicalRecord>> {
        let sql = format!("{SELECT_RECORD} WHERE id = $1");
        sqlx::query_as::<_, MedicalRecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(MedicalRecord::try_from)
            .transpose()
    }

    async fn update(&self, record: &MedicalRecord) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE medical_records
            SET doctor_id = $2, visit_date = $3, diagnosis = $4, symptoms = $5, treatment = $6,
                prescriptions = $7, lab_results = $8, vital_signs = $9, notes = $10,
                follow_up_date = $11, record_type = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.doctor_id)
        .bind(record.visit_date)
        .bind(&record.diagnosis)
        .bind(&record.symptoms)
        .bind(&record.treatment)
        .bind(&record.prescriptions)
        .bind(&record.lab_results)
        .bind(codec::encode_optional("vital_signs", record.vital_signs.as_ref())?)
        .bind(&record.notes)
        .bind(record.follow_up_date)
        .bind(&record.record_type)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryFailed(format!("medical record {} does not exist", record.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM medical_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid, range: &DateRange) -> DatabaseResult<Vec<MedicalRecord>> {
        let sql = format!(
            "{SELECT_RECORD} WHERE patient_id = $1 \
             AND ($2::TIMESTAMPTZ IS NULL OR visit_date >= $2) \
             AND ($3::TIMESTAMPTZ IS NULL OR visit_date < $3) \
             ORDER BY visit_date DESC"
        );
        let rows = sqlx::query_as::<_, MedicalRecordRow>(&sql)
            .bind(patient_id)
            .bind(range.start())
            .bind(range.end_exclusive())
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }
}
