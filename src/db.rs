use serde::Serialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::{
    models::{
        ApplicationRecord, IncidentRecord, InterestRecord, NewApplication, NewIncident,
        NewInterest, NewRecord, NewSuggestion, SuggestionRecord,
    },
    store::{Store, StoreError},
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Postgres-backed store. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    async fn create(&self, record: NewRecord) -> Result<Uuid, StoreError> {
        let id = match &record {
            NewRecord::Application(application) => {
                insert_application(&self.pool, application).await?
            }
            NewRecord::Incident(incident) => insert_incident(&self.pool, incident).await?,
            NewRecord::Interest(interest) => insert_interest(&self.pool, interest).await?,
            NewRecord::Suggestion(suggestion) => {
                insert_suggestion(&self.pool, suggestion).await?
            }
        };

        Ok(id)
    }
}

pub async fn insert_application(
    pool: &PgPool,
    application: &NewApplication,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO concordia_house.applications
        (id, name, id_number, email, phone, room_type, course, year_of_study, nsfas_status, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&application.name)
    .bind(&application.id_number)
    .bind(&application.email)
    .bind(&application.phone)
    .bind(application.room_type.as_str())
    .bind(&application.course)
    .bind(&application.year_of_study)
    .bind(application.nsfas_status)
    .bind(&application.status)
    .fetch_one(pool)
    .await?
    .try_get("id")
}

pub async fn insert_incident(pool: &PgPool, incident: &NewIncident) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO concordia_house.incidents
        (id, date, time, location, description, type, reporter_name, reporter_contact)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(incident.date)
    .bind(&incident.time)
    .bind(&incident.location)
    .bind(&incident.description)
    .bind(incident.incident_type.as_str())
    .bind(&incident.reporter_name)
    .bind(&incident.reporter_contact)
    .fetch_one(pool)
    .await?
    .try_get("id")
}

pub async fn insert_interest(pool: &PgPool, interest: &NewInterest) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO concordia_house.interests
        (id, name, email, phone, preferred_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&interest.name)
    .bind(&interest.email)
    .bind(&interest.phone)
    .bind(interest.preferred_date)
    .fetch_one(pool)
    .await?
    .try_get("id")
}

pub async fn insert_suggestion(
    pool: &PgPool,
    suggestion: &NewSuggestion,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO concordia_house.suggestions
        (id, name, email, category, suggestion)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&suggestion.name)
    .bind(&suggestion.email)
    .bind(suggestion.category.as_str())
    .bind(&suggestion.suggestion)
    .fetch_one(pool)
    .await?
    .try_get("id")
}

/// A persisted row that can be listed back out of its table.
pub trait StoredRecord: Serialize + Sized {
    const TABLE: &'static str;
    const LABEL: &'static str;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl StoredRecord for ApplicationRecord {
    const TABLE: &'static str = "applications";
    const LABEL: &'static str = "Applications";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            id_number: row.try_get("id_number")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            room_type: row.try_get("room_type")?,
            course: row.try_get("course")?,
            year_of_study: row.try_get("year_of_study")?,
            nsfas_status: row.try_get("nsfas_status")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl StoredRecord for IncidentRecord {
    const TABLE: &'static str = "incidents";
    const LABEL: &'static str = "Incidents";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            date: row.try_get("date")?,
            time: row.try_get("time")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            incident_type: row.try_get("type")?,
            reporter_name: row.try_get("reporter_name")?,
            reporter_contact: row.try_get("reporter_contact")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl StoredRecord for InterestRecord {
    const TABLE: &'static str = "interests";
    const LABEL: &'static str = "Interest Entries";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            preferred_date: row.try_get("preferred_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl StoredRecord for SuggestionRecord {
    const TABLE: &'static str = "suggestions";
    const LABEL: &'static str = "Suggestions";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            category: row.try_get("category")?,
            suggestion: row.try_get("suggestion")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Newest first. `None` fetches the whole table.
pub async fn fetch_records<T: StoredRecord>(
    pool: &PgPool,
    limit: Option<i64>,
) -> anyhow::Result<Vec<T>> {
    let mut query = format!(
        "SELECT * FROM concordia_house.{} ORDER BY created_at DESC",
        T::TABLE
    );

    if limit.is_some() {
        query.push_str(" LIMIT $1");
    }

    let mut rows = sqlx::query(&query);

    if let Some(value) = limit {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut output = Vec::with_capacity(records.len());

    for row in records.iter() {
        output.push(T::from_row(row)?);
    }

    Ok(output)
}
