//! REST repository for the managed backend.
//!
//! Tables are exposed PostgREST-style under `/rest/v1/{table}` with filters as
//! query parameters (`id=eq.4`). Every request carries the project API key.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::db::config::RemoteConfig;
use crate::db::repository::*;
use crate::models::{BookingRecord, DateRangeRow, PackageId, TourPackage, UserId, UserProfile};

const PACKAGES: &str = "packages";
const PACKAGE_DATES: &str = "package_dates";
const PROFILES: &str = "profiles";
const FAVORITES: &str = "favorites";
const BOOKINGS: &str = "bookings";

#[derive(Debug, Deserialize)]
struct FavoriteRow {
    package_id: PackageId,
}

/// Repository backed by the managed backend's REST tables.
#[derive(Clone)]
pub struct RemoteRepository {
    client: Client,
    config: RemoteConfig,
}

impl RemoteRepository {
    pub fn new(config: RemoteConfig) -> RepositoryResult<Self> {
        config
            .validate()
            .map_err(RepositoryError::configuration)?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| RepositoryError::configuration(format!("Invalid API key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| RepositoryError::configuration(format!("Invalid API key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RepositoryError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> RepositoryResult<Vec<T>> {
        debug!("GET {} {:?}", table, filters);
        let rows = self
            .client
            .get(self.config.table_url(table))
            .query(filters)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<T>>()
            .await?;
        Ok(rows)
    }

    /// Send a write that asks for the affected rows back.
    async fn returning<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<Vec<T>> {
        let rows = request
            .header("Prefer", "return=representation")
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<T>>()
            .await?;
        Ok(rows)
    }
}

fn eq(value: impl ToString) -> String {
    format!("eq.{}", value.to_string())
}

#[async_trait]
impl PackageRepository for RemoteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let response = self
            .client
            .get(self.config.table_url(""))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn list_packages(&self) -> RepositoryResult<Vec<TourPackage>> {
        self.select(PACKAGES, &[("select", "*".into()), ("order", "id.asc".into())])
            .await
            .map_err(|e| e.with_operation("list_packages"))
    }

    async fn get_package(&self, package_id: PackageId) -> RepositoryResult<TourPackage> {
        let rows: Vec<TourPackage> = self
            .select(PACKAGES, &[("select", "*".into()), ("id", eq(package_id))])
            .await
            .map_err(|e| e.with_operation("get_package"))?;
        rows.into_iter().next().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Package {} not found", package_id),
                ErrorContext::new("get_package")
                    .with_entity("package")
                    .with_entity_id(package_id),
            )
        })
    }
}

#[async_trait]
impl AvailabilityRepository for RemoteRepository {
    async fn fetch_date_range_rows(
        &self,
        package_id: PackageId,
    ) -> RepositoryResult<Vec<DateRangeRow>> {
        self.select(
            PACKAGE_DATES,
            &[
                ("select", "package_id,date_ranges".into()),
                ("package_id", eq(package_id)),
                ("order", "id.asc".into()),
            ],
        )
        .await
        .map_err(|e| e.with_operation("fetch_date_range_rows"))
    }
}

#[async_trait]
impl AccountRepository for RemoteRepository {
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<UserProfile>> {
        let rows: Vec<UserProfile> = self
            .select(
                PROFILES,
                &[
                    ("select", "id,email,display_name".into()),
                    ("email", format!("ilike.{}", email.trim())),
                    ("limit", "1".into()),
                ],
            )
            .await
            .map_err(|e| e.with_operation("find_user_by_email"))?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl FavoriteRepository for RemoteRepository {
    async fn list_favorites(&self, user_id: UserId) -> RepositoryResult<Vec<PackageId>> {
        let rows: Vec<FavoriteRow> = self
            .select(
                FAVORITES,
                &[
                    ("select", "package_id".into()),
                    ("user_id", eq(user_id)),
                    ("order", "created_at.asc".into()),
                ],
            )
            .await
            .map_err(|e| e.with_operation("list_favorites"))?;
        Ok(rows.into_iter().map(|r| r.package_id).collect())
    }

    async fn add_favorite(&self, user_id: UserId, package_id: PackageId) -> RepositoryResult<bool> {
        let request = self
            .client
            .post(self.config.table_url(FAVORITES))
            .header("Prefer", "resolution=ignore-duplicates")
            .json(&serde_json::json!({ "user_id": user_id, "package_id": package_id }));
        let inserted: Vec<serde_json::Value> = self
            .returning(request)
            .await
            .map_err(|e| e.with_operation("add_favorite"))?;
        Ok(!inserted.is_empty())
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        package_id: PackageId,
    ) -> RepositoryResult<bool> {
        let request = self
            .client
            .delete(self.config.table_url(FAVORITES))
            .query(&[("user_id", eq(user_id)), ("package_id", eq(package_id))]);
        let deleted: Vec<serde_json::Value> = self
            .returning(request)
            .await
            .map_err(|e| e.with_operation("remove_favorite"))?;
        Ok(!deleted.is_empty())
    }
}

#[async_trait]
impl BookingRepository for RemoteRepository {
    async fn store_booking(&self, booking: &BookingRecord) -> RepositoryResult<BookingRecord> {
        let request = self.client.post(self.config.table_url(BOOKINGS)).json(booking);
        let stored: Vec<BookingRecord> = self
            .returning(request)
            .await
            .map_err(|e| e.with_operation("store_booking"))?;
        stored.into_iter().next().ok_or_else(|| {
            RepositoryError::internal_with_context(
                "Insert returned no rows",
                ErrorContext::new("store_booking").with_entity("booking"),
            )
        })
    }

    async fn find_booking_by_reference(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<BookingRecord>> {
        let rows: Vec<BookingRecord> = self
            .select(
                BOOKINGS,
                &[("select", "*".into()), ("reference", eq(reference)), ("limit", "1".into())],
            )
            .await
            .map_err(|e| e.with_operation("find_booking_by_reference"))?;
        Ok(rows.into_iter().next())
    }

    async fn list_bookings(&self, user_id: UserId) -> RepositoryResult<Vec<BookingRecord>> {
        self.select(
            BOOKINGS,
            &[
                ("select", "*".into()),
                ("user_id", eq(user_id)),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
        .map_err(|e| e.with_operation("list_bookings"))
    }
}
