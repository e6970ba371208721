use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::collect;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{codec, Doctor, DoctorAvailability, Specialization};
use crate::repository::filters::{like_pattern, DoctorSearch};
use crate::repository::DoctorRepository;

const SELECT_DOCTOR: &str = r#"
    SELECT id, first_name, last_name, email, phone_number, specialization, license_number,
           years_of_experience, qualifications, languages, consultation_fee, is_available,
           average_rating, total_consultations, created_at, updated_at
    FROM doctors
"#;

#[derive(sqlx::FromRow)]
struct DoctorRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    specialization: i32,
    license_number: String,
    years_of_experience: i32,
    qualifications: String,
    languages: String,
    consultation_fee: i32,
    is_available: bool,
    average_rating: f32,
    total_consultations: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = DatabaseError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            specialization: Specialization::try_from(row.specialization)?,
            license_number: row.license_number,
            years_of_experience: row.years_of_experience,
            qualifications: codec::decode_list("qualifications", &row.qualifications)?,
            languages: codec::decode_list("languages", &row.languages)?,
            consultation_fee: row.consultation_fee,
            is_available: row.is_available,
            average_rating: row.average_rating,
            total_consultations: row.total_consultations,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AvailabilityRow {
    id: Uuid,
    doctor_id: Uuid,
    day_of_week: String,
    start_time: String,
    end_time: String,
    slot_duration_minutes: i32,
}

impl From<AvailabilityRow> for DoctorAvailability {
    fn from(row: AvailabilityRow) -> Self {
        Self {
            id: row.id,
            doctor_id: row.doctor_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_duration_minutes: row.slot_duration_minutes,
        }
    }
}

/// PostgreSQL-backed doctor repository
#[derive(Debug, Clone)]
pub struct PostgresDoctorRepository {
    pool: PgPool,
}

impl PostgresDoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, column: &str, value: &str) -> DatabaseResult<Option<Doctor>> {
        let sql = format!("{SELECT_DOCTOR} WHERE {column} = $1");
        sqlx::query_as::<_, DoctorRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?
            .map(Doctor::try_from)
            .transpose()
    }
}

#[async_trait]
impl DoctorRepository for PostgresDoctorRepository {
    async fn create(&self, doctor: &Doctor) -> DatabaseResult<()> {
        debug!(doctor_id = %doctor.id, "Inserting doctor");

        sqlx::query(
            r#"
            INSERT INTO doctors (
                id, first_name, last_name, email, phone_number, specialization, license_number,
                years_of_experience, qualifications, languages, consultation_fee, is_available,
                average_rating, total_consultations, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(doctor.id)
        .bind(&doctor.first_name)
        .bind(&doctor.last_name)
        .bind(&doctor.email)
        .bind(&doctor.phone_number)
        .bind(doctor.specialization.code())
        .bind(&doctor.license_number)
        .bind(doctor.years_of_experience)
        .bind(codec::encode("qualifications", &doctor.qualifications)?)
        .bind(codec::encode("languages", &doctor.languages)?)
        .bind(doctor.consultation_fee)
        .bind(doctor.is_available)
        .bind(doctor.average_rating)
        .bind(doctor.total_consultations)
        .bind(doctor.created_at)
        .bind(doctor.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DatabaseResult<Option<Doctor>> {
        let sql = format!("{SELECT_DOCTOR} WHERE id = $1");
        sqlx::query_as::<_, DoctorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Doctor::try_from)
            .transpose()
    }

    async fn update(&self, doctor: &Doctor) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE doctors
            SET first_name = $2, last_name = $3, email = $4, phone_number = $5,
                specialization = $6, license_number = $7, years_of_experience = $8,
                qualifications = $9, languages = $10, consultation_fee = $11,
                is_available = $12, average_rating = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(doctor.id)
        .bind(&doctor.first_name)
        .bind(&doctor.last_name)
        .bind(&doctor.email)
        .bind(&doctor.phone_number)
        .bind(doctor.specialization.code())
        .bind(&doctor.license_number)
        .bind(doctor.years_of_experience)
        .bind(codec::encode("qualifications", &doctor.qualifications)?)
        .bind(codec::encode("languages", &doctor.languages)?)
        .bind(doctor.consultation_fee)
        .bind(doctor.is_available)
        .bind(doctor.average_rating)
        .bind(doctor.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryFailed(format!("doctor {} does not exist", doctor.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, filter: &DoctorSearch) -> DatabaseResult<Vec<Doctor>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_DOCTOR);
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
        if let Some(specialization) = filter.specialization {
            query.push(" AND specialization = ").push_bind(specialization.code());
        }
        if let Some(available) = filter.is_available {
            query.push(" AND is_available = ").push_bind(available);
        }
        query.push(" ORDER BY created_at ASC");

        let rows = query.build_query_as::<DoctorRow>().fetch_all(&self.pool).await?;
        collect(rows)
    }

    async fn get_by_email(&self, email: &str) -> DatabaseResult<Option<Doctor>> {
        self.fetch_one_where("email", email).await
    }

    async fn get_by_phone(&self, phone_number: &str) -> DatabaseResult<Option<Doctor>> {
        self.fetch_one_where("phone_number", phone_number).await
    }

    async fn get_by_license(&self, license_number: &str) -> DatabaseResult<Option<Doctor>> {
        self.fetch_one_where("license_number", license_number).await
    }

    async fn set_availability(&self, doctor_id: Uuid, slots: &[DoctorAvailability]) -> DatabaseResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM doctor_availability WHERE doctor_id = $1")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;

        for (position, slot) in (0_i32..).zip(slots) {
            sqlx::query(
                r#"
                INSERT INTO doctor_availability (
                    id, doctor_id, day_of_week, start_time, end_time, slot_duration_minutes, position
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(slot.id)
            .bind(doctor_id)
            .bind(&slot.day_of_week)
            .bind(&slot.start_time)
            .bind(&slot.end_time)
            .bind(slot.slot_duration_minutes)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(doctor_id = %doctor_id, slots = slots.len(), "Doctor availability replaced");
        Ok(())
    }

    async fn get_availability(&self, doctor_id: Uuid) -> DatabaseResult<Vec<DoctorAvailability>> {
        let rows = sqlx::query_as::<_, AvailabilityRow>(
            r#"
            SELECT id, doctor_id, day_of_week, start_time, end_time, slot_duration_minutes
            FROM doctor_availability
            WHERE doctor_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DoctorAvailability::from).collect())
    }

    async fn increment_consultations(&self, doctor_id: Uuid) -> DatabaseResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE doctors
            SET total_consultations = total_consultations + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(doctor_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryFailed(format!("doctor {doctor_id} does not exist")));
        }
        Ok(())
    }
}
