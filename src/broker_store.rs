use crate::errors::AppError;
use crate::models::BrokerProfile;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Storage for broker subscription records (`broker_profiles` table).
///
/// This is the only persistent state in the system; prospect data never
/// touches the database.
pub struct BrokerStore {
    pool: PgPool,
}

impl BrokerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a broker by email (stored lowercased).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<BrokerProfile>, AppError> {
        let profile = sqlx::query_as::<_, BrokerProfile>(
            "SELECT * FROM broker_profiles WHERE email = $1 LIMIT 1",
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error in find_by_email for '{}': {:?}", email, e);
            AppError::DatabaseError(e)
        })?;

        Ok(profile)
    }

    /// Create a trial profile for a new sign-up, or refresh the contact
    /// fields of an existing one. New profiles get a trial expiring
    /// `trial_days` from now.
    pub async fn upsert_trial(
        &self,
        email: &str,
        broker_name: Option<&str>,
        company: Option<&str>,
        phone: Option<&str>,
        plan: Option<&str>,
        trial_days: i64,
    ) -> Result<BrokerProfile, AppError> {
        let trial_expires_at = Utc::now() + Duration::days(trial_days);

        let profile = sqlx::query_as::<_, BrokerProfile>(
            r#"
            INSERT INTO broker_profiles
                (id, email, broker_name, company, phone, subscription_status,
                 subscription_plan, trial_expires_at, monthly_searches_used,
                 monthly_search_limit, created_at)
            VALUES ($1, $2, $3, $4, $5, 'trial', $6, $7, 0, 999, now())
            ON CONFLICT (email) DO UPDATE SET
                broker_name = EXCLUDED.broker_name,
                company = EXCLUDED.company,
                phone = COALESCE(EXCLUDED.phone, broker_profiles.phone),
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.to_lowercase())
        .bind(broker_name.unwrap_or("New Broker"))
        .bind(company.unwrap_or("New Company"))
        .bind(phone)
        .bind(plan.unwrap_or("starter"))
        .bind(trial_expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        tracing::info!(
            "Upserted trial profile for {} (expires {})",
            profile.email,
            trial_expires_at
        );
        Ok(profile)
    }

    /// Apply a completed checkout: attach the payment-processor identifiers
    /// and activate the subscription. Returns the broker id when a matching
    /// record was found.
    pub async fn apply_checkout_completed(
        &self,
        email: &str,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<Option<Uuid>, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE broker_profiles
            SET stripe_customer_id = $2,
                stripe_subscription_id = $3,
                subscription_status = 'active',
                updated_at = now()
            WHERE email = $1
            RETURNING id
            "#,
        )
        .bind(email.to_lowercase())
        .bind(customer_id)
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        match &id {
            Some(id) => tracing::info!("Activated subscription for {} ({})", email, id),
            None => tracing::warn!("No broker profile found for email {}", email),
        }

        Ok(id)
    }

    /// Bump the monthly search counter after a successful search.
    pub async fn record_search(&self, broker_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE broker_profiles
            SET monthly_searches_used = monthly_searches_used + 1,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(broker_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(())
    }
}
