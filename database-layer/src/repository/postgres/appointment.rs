use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::collect;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{Appointment, AppointmentStatus, ConsultationType};
use crate::repository::filters::AppointmentFilter;
use crate::repository::AppointmentRepository;

const SELECT_APPOINTMENT: &str = r#"
    SELECT id, patient_id, patient_name, doctor_id, doctor_name, appointment_date,
           appointment_time, status, consultation_type, reason_for_visit, notes, diagnosis,
           cancelled_at, cancellation_reason, created_at, updated_at
    FROM appointments
"#;

// Dates and times are fixed-width text, so byte order is chronological order.
const FILTER_CLAUSE: &str = r#"
      AND ($2::INTEGER IS NULL OR status = $2)
      AND ($3::TEXT IS NULL OR appointment_date COLLATE "C" >= $3)
      AND ($4::TEXT IS NULL OR appointment_date COLLATE "C" <= $4)
      AND ($5::TEXT IS NULL OR appointment_date = $5)
    ORDER BY appointment_date DESC, appointment_time DESC
"#;

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    patient_id: Uuid,
    patient_name: String,
    doctor_id: Uuid,
    doctor_name: String,
    appointment_date: String,
    appointment_time: String,
    status: i32,
    consultation_type: i32,
    reason_for_visit: String,
    notes: String,
    diagnosis: String,
    cancelled_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DatabaseError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            doctor_id: row.doctor_id,
            doctor_name: row.doctor_name,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            status: AppointmentStatus::try_from(row.status)?,
            consultation_type: ConsultationType::try_from(row.consultation_type)?,
            reason_for_visit: row.reason_for_visit,
            notes: row.notes,
            diagnosis: row.diagnosis,
            cancelled_at: row.cancelled_at,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed appointment repository
///
/// Slot exclusivity is enforced by the partial unique index
/// `uq_appointments_active_slot`.
#[derive(Debug, Clone)]
pub struct PostgresAppointmentRepository {
    pool: PgPool,
}

impl PostgresAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        owner_column: &str,
        owner_id: Uuid,
        filter: &AppointmentFilter,
    ) -> DatabaseResult<Vec<Appointment>> {
        let sql = format!("{SELECT_APPOINTMENT} WHERE {owner_column} = $1 {FILTER_CLAUSE}");
        let rows = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(owner_id)
            .bind(filter.status.map(AppointmentStatus::code))
            .bind(filter.from_date.as_deref())
            .bind(filter.to_date.as_deref())
            .bind(filter.date.as_deref())
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> DatabaseResult<()> {
        debug!(appointment_id = %appointment.id, doctor_id = %appointment.doctor_id, "Inserting appointment");

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, patient_id, patient_name, doctor_id, doctor_name, appointment_date,
                appointment_time, status, consultation_type, reason_for_visit, notes, diagnosis,
                cancelled_at, cancellation_reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.patient_id)
        .bind(&appointment.patient_name)
        .bind(appointment.doctor_id)
        .bind(&appointment.doctor_name)
        .bind(&appointment.appointment_date)
        .bind(&appointment.appointment_time)
        .bind(appointment.status.code())
        .bind(appointment.consultation_type.code())
        .bind(&appointment.reason_for_visit)
        .bind(&appointment.notes)
        .bind(&appointment.diagnosis)
        .bind(appointment.cancelled_at)
        .bind(appointment.cancellation_reason.as_deref())
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Appointment>> {
        let sql = format!("{SELECT_APPOINTMENT} WHERE id = $1");
        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn update(&self, appointment: &Appointment) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET appointment_date = $2, appointment_time = $3, status = $4, consultation_type = $5,
                reason_for_visit = $6, notes = $7, diagnosis = $8, cancelled_at = $9,
                cancellation_reason = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(appointment.id)
        .bind(&appointment.appointment_date)
        .bind(&appointment.appointment_time)
        .bind(appointment.status.code())
        .bind(appointment.consultation_type.code())
        .bind(&appointment.reason_for_visit)
        .bind(&appointment.notes)
        .bind(&appointment.diagnosis)
        .bind(appointment.cancelled_at)
        .bind(appointment.cancellation_reason.as_deref())
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryFailed(format!(
                "appointment {} does not exist",
                appointment.id
            )));
        }
        Ok(())
    }

    async fn list_by_patient(&self, patient_id: Uuid, filter: &AppointmentFilter) -> DatabaseResult<Vec<Appointment>> {
        self.list_where("patient_id", patient_id, filter).await
    }

    async fn list_by_doctor(&self, doctor_id: Uuid, filter: &AppointmentFilter) -> DatabaseResult<Vec<Appointment>> {
        self.list_where("doctor_id", doctor_id, filter).await
    }

    async fn list_by_doctor_and_date(&self, doctor_id: Uuid, date: &str) -> DatabaseResult<Vec<Appointment>> {
        let sql = format!(
            "{SELECT_APPOINTMENT} WHERE doctor_id = $1 AND appointment_date = $2 AND status <> $3 \
             ORDER BY appointment_time ASC"
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(doctor_id)
            .bind(date)
            .bind(AppointmentStatus::Cancelled.code())
            .fetch_all(&self.pool)
            .await?;
        collect(rows)
    }

    async fn check_conflict(
        &self,
        doctor_id: Uuid,
        date: &str,
        time: &str,
        exclude_id: Option<Uuid>,
    ) -> DatabaseResult<Option<Appointment>> {
        let sql = format!(
            "{SELECT_APPOINTMENT} WHERE doctor_id = $1 AND appointment_date = $2 \
             AND appointment_time = $3 AND status <> $4 AND ($5::UUID IS NULL OR id <> $5) LIMIT 1"
        );
        sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(doctor_id)
            .bind(date)
            .bind(time)
            .bind(AppointmentStatus::Cancelled.code())
            .bind(exclude_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }
}
