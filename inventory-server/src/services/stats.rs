//! Sales statistics
//!
//! Value distribution of one custom field over the sold products of a
//! category, and the dashboard totals.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{FieldStat, FieldStatsQuery, FieldType, Overview};

use super::catalog;
use crate::core::AppState;
use crate::eav::FieldValue;
use crate::error::ServiceResult;
use crate::utils::require;

const BLANK: &str = "N/A";

/// Start of the reporting window for `period`; `None` means all time
fn period_start(
    period: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let days = match period.map(str::trim) {
        None | Some("") | Some("all") => return Ok(None),
        Some("week") => 7,
        Some("month") => 30,
        Some("year") => 365,
        Some(other) => {
            return Err(AppError::validation(format!(
                "Unknown period '{other}' (expected week, month, year or all)"
            ))
            .with_detail("field", "period"));
        }
    };
    Ok(Some(now - Duration::days(days)))
}

/// Count values after normalising them through the field type, so
/// differently formatted inputs of the same value land in one bucket.
/// Sorted by count descending, then value ascending.
pub(crate) fn aggregate(field_type: FieldType, values: &[String]) -> Vec<FieldStat> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for raw in values {
        let key = if raw.trim().is_empty() {
            BLANK.to_string()
        } else {
            FieldValue::from_stored(field_type, raw.trim()).to_stored()
        };
        *counts.entry(key).or_default() += 1;
    }

    let mut stats: Vec<FieldStat> = counts
        .into_iter()
        .map(|(value, count)| FieldStat { value, count })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    stats
}

pub async fn field_stats(
    state: &AppState,
    query: FieldStatsQuery,
) -> ServiceResult<Vec<FieldStat>> {
    let category_id = require(query.category_id, "categoryId")?;
    let slug = require(query.field.filter(|f| !f.trim().is_empty()), "field")?;
    let since = period_start(query.period.as_deref(), Utc::now())?;

    let category = catalog::find_category(state, category_id).await?;
    let fields = state.store().list_fields(category.id).await?;
    let field = fields
        .into_iter()
        .find(|f| f.slug == slug.trim())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::FieldNotFound,
                format!("Field '{slug}' not found in category {category_id}"),
            )
        })?;

    let values = state
        .store()
        .sold_field_values(category.id, field.id, since)
        .await?;
    Ok(aggregate(field.field_type, &values))
}

pub async fn overview(state: &AppState) -> ServiceResult<Overview> {
    Ok(state.store().overview().await?)
}
