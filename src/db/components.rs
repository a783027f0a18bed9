use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Component;

pub async fn list_by_equipment(
    pool: &PgPool,
    equipment_id: Uuid,
) -> Result<Vec<Component>, sqlx::Error> {
    sqlx::query_as::<_, Component>(
        "SELECT * FROM components WHERE equipment_id = $1 ORDER BY installed_date DESC",
    )
    .bind(equipment_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Component>, sqlx::Error> {
    sqlx::query_as::<_, Component>("SELECT * FROM components WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    equipment_id: Uuid,
    component_type: &str,
    brand: &str,
    model: &str,
    serial_number: &str,
    specifications: &str,
) -> Result<Component, sqlx::Error> {
    sqlx::query_as::<_, Component>(
        "INSERT INTO components
            (equipment_id, component_type, brand, model, serial_number, specifications)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(equipment_id)
    .bind(component_type)
    .bind(brand)
    .bind(model)
    .bind(serial_number)
    .bind(specifications)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    component_type: &str,
    brand: &str,
    model: &str,
    serial_number: &str,
    specifications: &str,
) -> Result<Component, sqlx::Error> {
    sqlx::query_as::<_, Component>(
        "UPDATE components SET
            component_type = $2, brand = $3, model = $4,
            serial_number = $5, specifications = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(component_type)
    .bind(brand)
    .bind(model)
    .bind(serial_number)
    .bind(specifications)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM components WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
