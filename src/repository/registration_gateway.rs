use async_trait::async_trait;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};

use super::RepositoryError;
use crate::models::{Athlete, NewAthlete, NewRepresentative, Representative, RepresentativeId};

const ATHLETE_COLUMNS: &str = "id, first_name, last_name, dni, birth_date, sex, type_athlete, \
     representative_id, parental_authorization, is_active, created_at, updated_at";
const REPRESENTATIVE_COLUMNS: &str =
    "id, first_name, last_name, dni, address, phone, email, is_active, created_at, updated_at";

/// How the registration resolves its representative: link an existing row
/// or insert a new one inside the same transaction
#[derive(Debug, Clone)]
pub enum RepresentativeSource {
    Existing(Representative),
    Create(NewRepresentative),
}

/// Outcome of a committed registration
#[derive(Debug)]
pub struct MinorRegistration {
    pub athlete: Athlete,
    pub representative: Representative,
    /// Whether the representative pre-existed and was linked, not created
    pub representative_reused: bool,
}

/// Transactional write path of the registration workflow.
///
/// The representative insert and the athlete insert commit or roll back
/// together; a reused representative is never written, so a failed athlete
/// insert cannot orphan anything.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn register_minor(
        &self,
        athlete: NewAthlete,
        representative: RepresentativeSource,
    ) -> Result<MinorRegistration, RepositoryError>;
}

/// SQLx implementation of RegistrationGateway
pub struct SqlxRegistrationGateway {
    pool: PgPool,
}

impl SqlxRegistrationGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_representative(
        tx: &mut Transaction<'_, Postgres>,
        representative: &NewRepresentative,
    ) -> Result<Representative, RepositoryError> {
        sqlx::query_as::<_, Representative>(&format!(
            "INSERT INTO representatives \
             (first_name, last_name, dni, address, phone, email, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, true, NOW(), NOW()) \
             RETURNING {}",
            REPRESENTATIVE_COLUMNS
        ))
        .bind(&representative.first_name)
        .bind(&representative.last_name)
        .bind(&representative.dni)
        .bind(&representative.address)
        .bind(&representative.phone)
        .bind(&representative.email)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("representatives_dni_key") {
                    return RepositoryError::DuplicateDni(representative.dni.clone());
                }
            }
            RepositoryError::Database(e)
        })
    }

    async fn fetch_representative_by_dni(
        tx: &mut Transaction<'_, Postgres>,
        dni: &str,
    ) -> Result<Representative, RepositoryError> {
        sqlx::query_as::<_, Representative>(&format!(
            "SELECT {} FROM representatives WHERE dni = $1",
            REPRESENTATIVE_COLUMNS
        ))
        .bind(dni)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            RepositoryError::Transaction(format!(
                "Representative with dni {} vanished during registration",
                dni
            ))
        })
    }

    async fn insert_athlete(
        tx: &mut Transaction<'_, Postgres>,
        athlete: &NewAthlete,
        representative_id: RepresentativeId,
    ) -> Result<Athlete, RepositoryError> {
        sqlx::query_as::<_, Athlete>(&format!(
            "INSERT INTO athletes \
             (first_name, last_name, dni, birth_date, sex, type_athlete, representative_id, \
              parental_authorization, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true, NOW(), NOW()) \
             RETURNING {}",
            ATHLETE_COLUMNS
        ))
        .bind(&athlete.first_name)
        .bind(&athlete.last_name)
        .bind(&athlete.dni)
        .bind(athlete.birth_date)
        .bind(&athlete.sex)
        .bind(&athlete.type_athlete)
        .bind(representative_id)
        .bind(&athlete.parental_authorization)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("athletes_dni_key") {
                    return RepositoryError::DuplicateDni(athlete.dni.clone());
                }
            }
            RepositoryError::Database(e)
        })
    }
}

#[async_trait]
impl RegistrationGateway for SqlxRegistrationGateway {
    #[instrument(skip(self, athlete, representative), fields(athlete_dni = %athlete.dni))]
    async fn register_minor(
        &self,
        athlete: NewAthlete,
        representative: RepresentativeSource,
    ) -> Result<MinorRegistration, RepositoryError> {
        // Dropping the transaction rolls everything back, so any early
        // return below leaves the database untouched.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Transaction(e.to_string()))?;

        let (representative, representative_reused) = match representative {
            RepresentativeSource::Existing(existing) => (existing, true),
            RepresentativeSource::Create(new_representative) => {
                // The insert runs under a savepoint: a unique violation
                // aborts only the savepoint, so the outer transaction
                // stays usable for the winner re-fetch below.
                let inserted = {
                    let mut savepoint = tx
                        .begin()
                        .await
                        .map_err(|e| RepositoryError::Transaction(e.to_string()))?;
                    let result =
                        Self::insert_representative(&mut savepoint, &new_representative).await;
                    let release = match &result {
                        Ok(_) => savepoint.commit().await,
                        Err(_) => savepoint.rollback().await,
                    };
                    release.map_err(|e| RepositoryError::Transaction(e.to_string()))?;
                    result
                };

                match inserted {
                    Ok(created) => {
                        info!("Created representative {} (dni {})", created.id, created.dni);
                        (created, false)
                    }
                    // Lost a concurrent create race for this dni: the
                    // winner's row is the one to link (representative
                    // duplicates are reuse, never a conflict).
                    Err(RepositoryError::DuplicateDni(dni)) => {
                        warn!("Concurrent representative create for dni {}, reusing winner", dni);
                        let winner = Self::fetch_representative_by_dni(&mut tx, &dni).await?;
                        (winner, true)
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let athlete = Self::insert_athlete(&mut tx, &athlete, representative.id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Transaction(e.to_string()))?;

        info!(
            "Committed registration of athlete {} (dni {}) with representative {}",
            athlete.id, athlete.dni, representative.id
        );

        Ok(MinorRegistration {
            athlete,
            representative,
            representative_reused,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRepresentative;
    use chrono::NaiveDate;
    use sqlx::postgres::PgPoolOptions;

    /// These tests exercise real transaction semantics and need Postgres;
    /// they no-op unless TEST_DATABASE_URL is set.
    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .ok()?;
        crate::database::run_migrations(&pool).await.ok()?;
        Some(pool)
    }

    fn random_dni() -> String {
        uuid::Uuid::new_v4().simple().to_string()[..16].to_string()
    }

    fn new_representative(dni: &str) -> NewRepresentative {
        NewRepresentative {
            first_name: "María José".to_string(),
            last_name: "Pérez".to_string(),
            dni: dni.to_string(),
            address: "Av. Universitaria 123".to_string(),
            phone: "0991234567".to_string(),
            email: "maria.perez@example.com".to_string(),
        }
    }

    fn new_athlete(dni: &str) -> NewAthlete {
        NewAthlete {
            first_name: "Juan Carlos".to_string(),
            last_name: "Pérez López".to_string(),
            dni: dni.to_string(),
            birth_date: NaiveDate::from_ymd_opt(2015, 5, 15).unwrap(),
            sex: "M".to_string(),
            type_athlete: "MINOR".to_string(),
            parental_authorization: "SI".to_string(),
        }
    }

    async fn seed_representative(pool: &PgPool, dni: &str) -> Representative {
        sqlx::query_as::<_, Representative>(&format!(
            "INSERT INTO representatives \
             (first_name, last_name, dni, address, phone, email, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, true, NOW(), NOW()) \
             RETURNING {}",
            REPRESENTATIVE_COLUMNS
        ))
        .bind("María José")
        .bind("Pérez")
        .bind(dni)
        .bind("Av. Universitaria 123")
        .bind("0991234567")
        .bind("maria.perez@example.com")
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_for_an_already_taken_dni_links_the_existing_row() {
        let Some(pool) = test_pool().await else { return };

        // Another request already created this representative; a Create
        // for the same dni must fall back to linking that row, and the
        // unique violation must not abort the outer transaction.
        let representative_dni = random_dni();
        let winner = seed_representative(&pool, &representative_dni).await;

        let gateway = SqlxRegistrationGateway::new(pool.clone());
        let registration = gateway
            .register_minor(
                new_athlete(&random_dni()),
                RepresentativeSource::Create(new_representative(&representative_dni)),
            )
            .await
            .unwrap();

        assert!(registration.representative_reused);
        assert_eq!(registration.representative.id, winner.id);
        assert_eq!(registration.athlete.representative_id, Some(winner.id));
    }

    #[tokio::test]
    async fn duplicate_athlete_dni_surfaces_as_duplicate_dni() {
        let Some(pool) = test_pool().await else { return };

        let athlete_dni = random_dni();
        let gateway = SqlxRegistrationGateway::new(pool.clone());

        gateway
            .register_minor(
                new_athlete(&athlete_dni),
                RepresentativeSource::Create(new_representative(&random_dni())),
            )
            .await
            .unwrap();

        let second = gateway
            .register_minor(
                new_athlete(&athlete_dni),
                RepresentativeSource::Create(new_representative(&random_dni())),
            )
            .await;

        assert!(matches!(
            second,
            Err(RepositoryError::DuplicateDni(dni)) if dni == athlete_dni
        ));
    }
}
