use sqlx::SqlitePool;

use crate::{
    errors::AppError,
    structs::{
        HomeDetails, NewParticipant, Participant, ParticipantSummary, PersonalDetails, User,
        WorkDetails,
    },
    utils,
};

pub async fn find_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let created_at = chrono::Utc::now().to_string();
    let pwd_hash = utils::hash_password(password).map_err(|e| {
        log::error!("Failed to hash password: {}", e);
        AppError::Password(e.to_string())
    })?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, pwd_hash, created_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(username)
    .bind(pwd_hash)
    .bind(&created_at)
    .fetch_one(pool)
    .await?;
    log::info!("User created: {}", user.username);
    Ok(user)
}

pub async fn get_all_participants(pool: &SqlitePool) -> Result<Vec<Participant>, sqlx::Error> {
    let participants = sqlx::query_as::<_, Participant>("SELECT * FROM participants")
        .fetch_all(pool)
        .await?;
    Ok(participants)
}

pub async fn get_participant_summaries(
    pool: &SqlitePool,
) -> Result<Vec<ParticipantSummary>, sqlx::Error> {
    let summaries = sqlx::query_as::<_, ParticipantSummary>(
        "SELECT firstname, lastname, email FROM participants",
    )
    .fetch_all(pool)
    .await?;
    Ok(summaries)
}

pub async fn get_personal_details(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<PersonalDetails>, sqlx::Error> {
    let details = sqlx::query_as::<_, PersonalDetails>(
        "SELECT firstname, lastname, dob FROM participants WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(details)
}

pub async fn get_work_details(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<WorkDetails>, sqlx::Error> {
    let work = sqlx::query_as::<_, WorkDetails>(
        "SELECT w.companyname, w.salary, w.currency
         FROM work w
         JOIN participants p ON w.participant_id = p.id
         WHERE p.email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(work)
}

pub async fn get_home_details(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<HomeDetails>, sqlx::Error> {
    let home = sqlx::query_as::<_, HomeDetails>(
        "SELECT h.country, h.city
         FROM home h
         JOIN participants p ON h.participant_id = p.id
         WHERE p.email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(home)
}

/// Inserts the participant and its work and home rows in one transaction.
/// Dropping the transaction guard on any early return rolls everything back
/// and releases the pooled connection.
pub async fn add_participant(pool: &SqlitePool, record: &NewParticipant) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM participants WHERE email = $1")
            .bind(&record.email)
            .fetch_optional(&mut *tx)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Participant with this email already exists".to_string(),
        ));
    }

    let (participant_id,): (i64,) = sqlx::query_as(
        "INSERT INTO participants (email, firstname, lastname, dob) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&record.email)
    .bind(&record.firstname)
    .bind(&record.lastname)
    .bind(&record.dob)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO work (participant_id, companyname, salary, currency) VALUES ($1, $2, $3, $4)",
    )
    .bind(participant_id)
    .bind(&record.work.companyname)
    .bind(record.work.salary)
    .bind(&record.work.currency)
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO home (participant_id, country, city) VALUES ($1, $2, $3)")
        .bind(participant_id)
        .bind(&record.home.country)
        .bind(&record.home.city)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("Participant added: {}", record.email);
    Ok(())
}

/// Rewrites the participant identified by `path_email` along with its work
/// and home rows. A payload email that belongs to a different participant
/// is a conflict.
pub async fn update_participant(
    pool: &SqlitePool,
    path_email: &str,
    record: &NewParticipant,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM participants WHERE email = $1")
        .bind(path_email)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((participant_id,)) = row else {
        return Err(AppError::NotFound("Participant not found".to_string()));
    };

    if record.email != path_email {
        let clash: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM participants WHERE email = $1 AND id != $2")
                .bind(&record.email)
                .bind(participant_id)
                .fetch_optional(&mut *tx)
                .await?;
        if clash.is_some() {
            return Err(AppError::Conflict("New email already in use".to_string()));
        }
    }

    sqlx::query(
        "UPDATE participants SET email = $1, firstname = $2, lastname = $3, dob = $4 WHERE id = $5",
    )
    .bind(&record.email)
    .bind(&record.firstname)
    .bind(&record.lastname)
    .bind(&record.dob)
    .bind(participant_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE work SET companyname = $1, salary = $2, currency = $3 WHERE participant_id = $4",
    )
    .bind(&record.work.companyname)
    .bind(record.work.salary)
    .bind(&record.work.currency)
    .bind(participant_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE home SET country = $1, city = $2 WHERE participant_id = $3")
        .bind(&record.home.country)
        .bind(&record.home.city)
        .bind(participant_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("Participant updated: {}", path_email);
    Ok(())
}

/// Deletes the participant row; the foreign keys cascade to work and home.
pub async fn delete_participant(pool: &SqlitePool, email: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM participants WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((participant_id,)) = row else {
        return Err(AppError::NotFound("Participant not found".to_string()));
    };

    sqlx::query("DELETE FROM participants WHERE id = $1")
        .bind(participant_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("Participant deleted: {}", email);
    Ok(())
}
