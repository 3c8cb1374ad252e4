//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use chrono::{NaiveDate, Utc};

use super::dto::{
    AvailabilityResponse, BookingIntentRequest, BookingIntentResponse, BookingListResponse,
    CalendarDayDto, CalendarQuery, CalendarResponse, CreateBookingRequest, FavoriteResponse,
    FavoritesResponse, HealthResponse, PackageDetailResponse, PackageListResponse,
    SessionResponse, SignInRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::availability::{AvailabilitySet, DateSelector};
use crate::calendar::{CalendarMonth, WEEKDAY_LABELS};
use crate::db::services as db_services;
use crate::inclusions::normalize_inclusions;
use crate::models::{
    parse_calendar_date, BookingRecord, InstallmentOption, PackageId, TourPackage,
};
use crate::services::{
    build_intent, destinations, intent_for_range, BookingError, Checkout, CheckoutStep,
    PackageQuery,
};
use crate::session::{Session, SessionError};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
}

fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session, AppError> {
    Ok(state.sessions.resolve(bearer_token(headers)?)?)
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    parse_calendar_date(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {}: '{}'", field, raw)))
}

async fn package_with_availability(
    state: &AppState,
    package_id: PackageId,
) -> Result<(TourPackage, AvailabilitySet), AppError> {
    let repo = state.repository.as_ref();
    let package = db_services::get_package(repo, package_id).await?;
    let availability = db_services::load_availability(repo, package_id)
        .await?
        .into_set();
    Ok((package, availability))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Session
// =============================================================================

/// POST /v1/auth/session
///
/// Credentials are checked by the external auth provider; this only maps the
/// verified email to a profile and issues an access token.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    let session =
        db_services::sign_in(state.repository.as_ref(), &state.sessions, &request.email).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// DELETE /v1/auth/session
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    state
        .sessions
        .sign_out(token)
        .ok_or(SessionError::NotAuthenticated)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Catalog
// =============================================================================

/// GET /v1/packages
pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<PackageQuery>,
) -> HandlerResult<PackageListResponse> {
    let all = db_services::list_packages(state.repository.as_ref()).await?;
    let packages = query.apply(&all);

    Ok(Json(PackageListResponse {
        total: packages.len(),
        destinations: destinations(&all),
        packages,
    }))
}

/// GET /v1/packages/{package_id}
pub async fn get_package(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> HandlerResult<PackageDetailResponse> {
    let package =
        db_services::get_package(state.repository.as_ref(), PackageId::new(package_id)).await?;
    let inclusions = normalize_inclusions(&package.inclusions);
    Ok(Json(PackageDetailResponse {
        package,
        inclusions,
    }))
}

// =============================================================================
// Availability
// =============================================================================

/// GET /v1/packages/{package_id}/availability
pub async fn get_availability(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> HandlerResult<AvailabilityResponse> {
    let package_id = PackageId::new(package_id);
    let (_, availability) = package_with_availability(&state, package_id).await?;
    Ok(Json(AvailabilityResponse::new(package_id, &availability)))
}

/// GET /v1/packages/{package_id}/calendar
///
/// Without `year`/`month` the calendar opens on the selected range, else on
/// the nearest upcoming range, else on the current month.
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> HandlerResult<CalendarResponse> {
    let (_, availability) = package_with_availability(&state, PackageId::new(package_id)).await?;
    let mut selector = DateSelector::new(availability);

    match (query.start.as_deref(), query.end.as_deref()) {
        (Some(start), Some(end)) => {
            let (start, end) = (parse_date("start", start)?, parse_date("end", end)?);
            let range = *selector
                .availability()
                .find_span(start, end)
                .ok_or(BookingError::RangeNotOffered { start, end })?;
            selector.select_range_directly(range);
        }
        (None, None) => {}
        _ => {
            return Err(AppError::BadRequest(
                "start and end must be given together".to_string(),
            ))
        }
    }

    let month = match (query.year, query.month) {
        (Some(year), Some(month)) => CalendarMonth::new(year, month).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid month {} of {}", month, year))
        })?,
        (None, None) => {
            let today = Utc::now().date_naive();
            let anchor = selector
                .selection()
                .range()
                .map(|r| r.start)
                .or_else(|| selector.availability().upcoming(today).first().map(|r| r.start))
                .unwrap_or(today);
            CalendarMonth::containing(anchor)
        }
        _ => {
            return Err(AppError::BadRequest(
                "year and month must be given together".to_string(),
            ))
        }
    };

    let weeks = month
        .classified_weeks(&selector)
        .into_iter()
        .map(|week| week.into_iter().map(CalendarDayDto::from).collect())
        .collect();

    Ok(Json(CalendarResponse {
        title: month.title(),
        year: month.year(),
        month: month.month(),
        weekday_labels: WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
        weeks,
        selection_label: selector.label(),
        previous: month.previous().into(),
        next: month.next().into(),
    }))
}

/// POST /v1/packages/{package_id}/booking-intents
pub async fn create_booking_intent(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    Json(request): Json<BookingIntentRequest>,
) -> HandlerResult<BookingIntentResponse> {
    let (package, availability) =
        package_with_availability(&state, PackageId::new(package_id)).await?;
    let mut selector = DateSelector::new(availability);

    match (request.date.as_deref(), request.start_date.as_deref(), request.end_date.as_deref()) {
        (Some(date), None, None) => {
            let date = parse_date("date", date)?;
            selector.select_day(date);
            if !selector.selection().is_selected() {
                return Err(AppError::BadRequest(format!("{} is not available", date)));
            }
        }
        (None, Some(start), Some(end)) => {
            let (start, end) = (parse_date("start_date", start)?, parse_date("end_date", end)?);
            let range = *selector
                .availability()
                .find_span(start, end)
                .ok_or(BookingError::RangeNotOffered { start, end })?;
            selector.select_range_directly(range);
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide either date or start_date and end_date".to_string(),
            ))
        }
    }

    let intent = build_intent(&package, &selector, request.party_size)?;
    let label = selector.label().unwrap_or_default();
    Ok(Json(BookingIntentResponse { intent, label }))
}

// =============================================================================
// Favorites
// =============================================================================

/// GET /v1/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<FavoritesResponse> {
    let session = require_session(&state, &headers)?;
    let repo = state.repository.as_ref();
    let package_ids = db_services::list_favorites(repo, &session).await?;
    let packages = db_services::favorite_packages(repo, &session).await?;
    Ok(Json(FavoritesResponse {
        package_ids,
        packages,
    }))
}

/// PUT /v1/favorites/{package_id}
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    headers: HeaderMap,
) -> HandlerResult<FavoriteResponse> {
    let session = require_session(&state, &headers)?;
    let package_id = PackageId::new(package_id);
    let changed =
        db_services::add_favorite(state.repository.as_ref(), &session, package_id).await?;
    Ok(Json(FavoriteResponse {
        package_id,
        favorite: true,
        changed,
    }))
}

/// DELETE /v1/favorites/{package_id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
    headers: HeaderMap,
) -> HandlerResult<FavoriteResponse> {
    let session = require_session(&state, &headers)?;
    let package_id = PackageId::new(package_id);
    let changed =
        db_services::remove_favorite(state.repository.as_ref(), &session, package_id).await?;
    Ok(Json(FavoriteResponse {
        package_id,
        favorite: false,
        changed,
    }))
}

// =============================================================================
// Bookings
// =============================================================================

/// POST /v1/bookings
///
/// Runs the whole checkout flow in one request. Resubmitting the same booking
/// returns the stored record instead of creating a second one.
pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingRecord>), AppError> {
    let session = require_session(&state, &headers)?;
    let (package, availability) = package_with_availability(&state, request.package_id).await?;

    let start = parse_date("start_date", &request.start_date)?;
    let end = parse_date("end_date", &request.end_date)?;
    let intent = intent_for_range(&package, &availability, start, end, request.party_size)?;

    let mut checkout = Checkout::new(intent);
    checkout.submit_contact(request.contact)?;
    checkout.choose_payment_method(request.payment_method)?;
    if checkout.step() == CheckoutStep::InstallmentOption {
        checkout.choose_installments(request.installments)?;
    } else if request.installments != InstallmentOption::PayInFull {
        return Err(BookingError::InstallmentsNotAllowed(request.payment_method).into());
    }

    let record = checkout.confirm(session.user_id())?;
    let stored = db_services::store_booking(state.repository.as_ref(), &record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<BookingListResponse> {
    let session = require_session(&state, &headers)?;
    let bookings = db_services::list_bookings(state.repository.as_ref(), &session).await?;
    Ok(Json(BookingListResponse {
        total: bookings.len(),
        bookings,
    }))
}
