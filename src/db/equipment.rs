use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::SortOrder;
use crate::models::{Equipment, EquipmentStatus, EquipmentType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentSort {
    PurchaseDate,
    CreatedAt,
    UpdatedAt,
}

impl EquipmentSort {
    pub fn parse(s: &str) -> Self {
        match s {
            "purchase_date" => EquipmentSort::PurchaseDate,
            "updated_at" => EquipmentSort::UpdatedAt,
            _ => EquipmentSort::CreatedAt,
        }
    }

    fn column(self) -> &'static str {
        match self {
            EquipmentSort::PurchaseDate => "purchase_date",
            EquipmentSort::CreatedAt => "created_at",
            EquipmentSort::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EquipmentFilter {
    pub q: Option<String>,
    pub equipment_type: Option<EquipmentType>,
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
    pub sort_by: EquipmentSort,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, f: &EquipmentFilter) {
    if let Some(q) = &f.q {
        let pattern = format!("%{q}%");
        qb.push(" AND (brand ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR model ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR serial_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(t) = f.equipment_type {
        qb.push(" AND equipment_type = ").push_bind(t);
    }
    if let Some(s) = f.status {
        qb.push(" AND status = ").push_bind(s);
    }
    if let Some(loc) = &f.location {
        qb.push(" AND location ILIKE ").push_bind(format!("%{loc}%"));
    }
}

pub async fn list(pool: &PgPool, f: &EquipmentFilter) -> Result<Vec<Equipment>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM equipment WHERE 1=1");
    push_filters(&mut qb, f);
    qb.push(format!(
        " ORDER BY {} {}",
        f.sort_by.column(),
        f.sort_order.keyword()
    ));
    qb.push(" LIMIT ")
        .push_bind(f.limit)
        .push(" OFFSET ")
        .push_bind(f.offset);
    qb.build_query_as::<Equipment>().fetch_all(pool).await
}

pub async fn count(pool: &PgPool, f: &EquipmentFilter) -> Result<i64, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM equipment WHERE 1=1");
    push_filters(&mut qb, f);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Equipment>, sqlx::Error> {
    sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    equipment_type: EquipmentType,
    brand: &str,
    model: &str,
    serial_number: &str,
    purchase_date: chrono::NaiveDate,
    warranty_expiry: Option<chrono::NaiveDate>,
    location: &str,
    status: EquipmentStatus,
    assigned_to: Option<Uuid>,
    notes: &str,
) -> Result<Equipment, sqlx::Error> {
    sqlx::query_as::<_, Equipment>(
        "INSERT INTO equipment
            (equipment_type, brand, model, serial_number, purchase_date,
             warranty_expiry, location, status, assigned_to, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(equipment_type)
    .bind(brand)
    .bind(model)
    .bind(serial_number)
    .bind(purchase_date)
    .bind(warranty_expiry)
    .bind(location)
    .bind(status)
    .bind(assigned_to)
    .bind(notes)
    .fetch_one(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    equipment_type: EquipmentType,
    brand: &str,
    model: &str,
    serial_number: &str,
    purchase_date: chrono::NaiveDate,
    warranty_expiry: Option<chrono::NaiveDate>,
    location: &str,
    status: EquipmentStatus,
    assigned_to: Option<Uuid>,
    notes: &str,
) -> Result<Equipment, sqlx::Error> {
    sqlx::query_as::<_, Equipment>(
        "UPDATE equipment SET
            equipment_type = $2, brand = $3, model = $4, serial_number = $5,
            purchase_date = $6, warranty_expiry = $7, location = $8,
            status = $9, assigned_to = $10, notes = $11, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(equipment_type)
    .bind(brand)
    .bind(model)
    .bind(serial_number)
    .bind(purchase_date)
    .bind(warranty_expiry)
    .bind(location)
    .bind(status)
    .bind(assigned_to)
    .bind(notes)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: EquipmentStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE equipment SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_assignee(
    pool: &PgPool,
    id: Uuid,
    assigned_to: Option<Uuid>,
) -> Result<Equipment, sqlx::Error> {
    sqlx::query_as::<_, Equipment>(
        "UPDATE equipment SET assigned_to = $2, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(assigned_to)
    .fetch_one(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Equipment>, sqlx::Error> {
    sqlx::query_as::<_, Equipment>("SELECT * FROM equipment ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}
