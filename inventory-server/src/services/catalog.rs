//! Category and field management
//!
//! Slugs are derived from names and must be unique (categories globally,
//! fields within their category). Field order is the `displayOrder`
//! column; reordering rewrites it for the whole category at once.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryField, CategoryInput, CategoryWithFields, FieldCreate, FieldType,
    FieldUpdate, split_options,
};
use shared::util::now_millis;

use super::not_found;
use crate::core::AppState;
use crate::db::{NewCategory, NewField, RepoError};
use crate::eav::slugify;
use crate::error::{ServiceError, ServiceResult};
use crate::utils::validate_payload;

fn slug_for(name: &str) -> Result<String, AppError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::validation(
            "Name must contain at least one letter or digit",
        )
        .with_detail("field", "name"));
    }
    Ok(slug)
}

fn duplicate_as(code: ErrorCode, slug: &str) -> impl FnOnce(RepoError) -> ServiceError {
    move |e| match e {
        RepoError::Duplicate(_) => {
            AppError::with_message(code, format!("{} '{}'", code.message(), slug)).into()
        }
        other => other.into(),
    }
}

/// Select fields need at least one option to choose from
fn check_options(field_type: FieldType, options: Option<&str>) -> Result<(), AppError> {
    if field_type == FieldType::Select && split_options(options).is_empty() {
        return Err(
            AppError::validation("Select fields need at least one option")
                .with_detail("field", "options"),
        );
    }
    Ok(())
}

// ── Categories ──

pub async fn list_categories(state: &AppState) -> ServiceResult<Vec<Category>> {
    Ok(state.store().list_categories().await?)
}

pub async fn find_category(state: &AppState, id: i64) -> ServiceResult<Category> {
    state
        .store()
        .find_category(id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::CategoryNotFound, "Category", id))
}

/// Category plus its fields in display order
pub async fn get_category(state: &AppState, id: i64) -> ServiceResult<CategoryWithFields> {
    let category = find_category(state, id).await?;
    let fields = state.store().list_fields(id).await?;
    Ok(CategoryWithFields { category, fields })
}

pub async fn create_category(state: &AppState, input: CategoryInput) -> ServiceResult<Category> {
    validate_payload(&input)?;
    let slug = slug_for(&input.name)?;
    let data = NewCategory {
        name: input.name.trim().to_string(),
        slug: slug.clone(),
        icon: input.icon,
        now: now_millis(),
    };
    let category = state
        .store()
        .create_category(&data)
        .await
        .map_err(duplicate_as(ErrorCode::CategorySlugExists, &slug))?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok(category)
}

pub async fn update_category(
    state: &AppState,
    id: i64,
    input: CategoryInput,
) -> ServiceResult<Category> {
    validate_payload(&input)?;
    let slug = slug_for(&input.name)?;
    let data = NewCategory {
        name: input.name.trim().to_string(),
        slug: slug.clone(),
        icon: input.icon,
        now: now_millis(),
    };
    Ok(state
        .store()
        .update_category(id, &data)
        .await
        .map_err(duplicate_as(ErrorCode::CategorySlugExists, &slug))?)
}

/// Refused while products belong to the category; drops its fields
pub async fn delete_category(state: &AppState, id: i64) -> ServiceResult<()> {
    state.store().delete_category(id).await?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(())
}

// ── Fields ──

pub async fn list_fields(state: &AppState, category_id: i64) -> ServiceResult<Vec<CategoryField>> {
    find_category(state, category_id).await?;
    Ok(state.store().list_fields(category_id).await?)
}

pub async fn create_field(
    state: &AppState,
    category_id: i64,
    input: FieldCreate,
) -> ServiceResult<CategoryField> {
    validate_payload(&input)?;
    find_category(state, category_id).await?;
    check_options(input.field_type, input.options.as_deref())?;

    let name = input.name.trim().to_string();
    let slug = slug_for(&name)?;
    let label = match input.label.trim() {
        "" => name.clone(),
        label => label.to_string(),
    };
    let data = NewField {
        category_id,
        name,
        slug: slug.clone(),
        label,
        field_type: input.field_type,
        is_required: input.is_required,
        options: input.options,
        display_order: input.display_order,
        show_in_table: input.show_in_table,
        show_in_graph: input.show_in_graph,
    };
    let field = state
        .store()
        .create_field(&data)
        .await
        .map_err(duplicate_as(ErrorCode::FieldSlugExists, &slug))?;
    tracing::info!(category_id, field_id = field.id, slug = %field.slug, "Field created");
    Ok(field)
}

pub async fn find_field(state: &AppState, id: i64) -> ServiceResult<CategoryField> {
    state
        .store()
        .find_field(id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::FieldNotFound, "Field", id))
}

/// Merge the supplied attributes; a new name re-derives the slug
pub async fn update_field(
    state: &AppState,
    id: i64,
    input: FieldUpdate,
) -> ServiceResult<CategoryField> {
    validate_payload(&input)?;
    let mut field = find_field(state, id).await?;

    if let Some(name) = input.name {
        field.slug = slug_for(&name)?;
        field.name = name.trim().to_string();
    }
    if let Some(label) = input.label {
        field.label = match label.trim() {
            "" => field.name.clone(),
            label => label.to_string(),
        };
    }
    if let Some(field_type) = input.field_type {
        field.field_type = field_type;
    }
    if let Some(v) = input.is_required {
        field.is_required = v;
    }
    if input.options.is_some() {
        field.options = input.options;
    }
    if let Some(v) = input.display_order {
        field.display_order = v;
    }
    if let Some(v) = input.show_in_table {
        field.show_in_table = v;
    }
    if let Some(v) = input.show_in_graph {
        field.show_in_graph = v;
    }
    check_options(field.field_type, field.options.as_deref())?;

    let slug = field.slug.clone();
    Ok(state
        .store()
        .update_field(&field)
        .await
        .map_err(duplicate_as(ErrorCode::FieldSlugExists, &slug))?)
}

/// Drops the field and every value stored for it
pub async fn delete_field(state: &AppState, id: i64) -> ServiceResult<()> {
    state.store().delete_field(id).await?;
    tracing::info!(field_id = id, "Field deleted");
    Ok(())
}

/// `field_ids` must list every field of the category exactly once
pub async fn reorder_fields(
    state: &AppState,
    category_id: i64,
    field_ids: Vec<i64>,
) -> ServiceResult<Vec<CategoryField>> {
    let fields = state.store().reorder_fields(category_id, &field_ids).await?;
    tracing::info!(category_id, count = fields.len(), "Fields reordered");
    Ok(fields)
}
