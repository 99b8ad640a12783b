use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::db::models::*;

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Initialize database connection and create tables
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        // Use sqlite:// with ?mode=rwc to create if it doesn't exist
        let database_url = format!("sqlite://{}?mode=rwc", database_path);
        info!("Connecting to {}", database_url);
        let pool = SqlitePool::connect(&database_url).await?;

        let db = Database { pool };
        db.create_tables().await?;
        Ok(db)
    }

    /// Create all necessary tables
    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        // Manufacturers table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS manufacturers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Device types table. The UNIQUE(manufacturer_id, model) constraint is
        // the authoritative duplicate guard; the importer's pre-check is only
        // a fast short-circuit.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS device_types (
                id TEXT PRIMARY KEY,
                manufacturer_id TEXT NOT NULL,
                model TEXT NOT NULL,
                part_number TEXT,
                u_height REAL,
                is_full_depth BOOLEAN,
                comments TEXT,
                custom_fields TEXT NOT NULL DEFAULT '{}',
                front_image_name TEXT,
                front_image BLOB,
                rear_image_name TEXT,
                rear_image BLOB,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (manufacturer_id) REFERENCES manufacturers (id) ON DELETE CASCADE,
                UNIQUE(manufacturer_id, model)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Component templates table (ports and bays declared by a device type)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS component_templates (
                id TEXT PRIMARY KEY,
                device_type_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                label TEXT,
                port_type TEXT,
                position INTEGER NOT NULL,
                attrs TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                FOREIGN KEY (device_type_id) REFERENCES device_types (id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new manufacturer
    pub async fn insert_manufacturer(
        &self,
        manufacturer: &DbManufacturer,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO manufacturers (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&manufacturer.id)
        .bind(&manufacturer.name)
        .bind(manufacturer.created_at.to_rfc3339())
        .bind(manufacturer.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Bump a manufacturer's updated_at (update-if-exists semantics)
    pub async fn touch_manufacturer(&self, manufacturer_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE manufacturers SET updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(manufacturer_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Look up a manufacturer by exact name
    pub async fn get_manufacturer_by_name(
        &self,
        name: &str,
    ) -> Result<Option<DbManufacturer>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM manufacturers WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| manufacturer_from_row(&row)))
    }

    /// Get all manufacturers, ordered by name
    pub async fn get_manufacturers(&self) -> Result<Vec<DbManufacturer>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM manufacturers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(manufacturer_from_row).collect())
    }

    /// Insert a new device type.
    ///
    /// A concurrent import of the same (manufacturer, model) surfaces here as
    /// a unique-constraint violation; callers map that to their duplicate
    /// error.
    pub async fn insert_device_type(&self, device_type: &DbDeviceType) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO device_types (
                id, manufacturer_id, model, part_number, u_height, is_full_depth,
                comments, custom_fields, front_image_name, front_image,
                rear_image_name, rear_image, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&device_type.id)
        .bind(&device_type.manufacturer_id)
        .bind(&device_type.model)
        .bind(&device_type.part_number)
        .bind(device_type.u_height)
        .bind(device_type.is_full_depth)
        .bind(&device_type.comments)
        .bind(Value::Object(device_type.custom_fields.clone()).to_string())
        .bind(&device_type.front_image_name)
        .bind(&device_type.front_image)
        .bind(&device_type.rear_image_name)
        .bind(&device_type.rear_image)
        .bind(device_type.created_at.to_rfc3339())
        .bind(device_type.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a device type by its (manufacturer, model) identity
    pub async fn get_device_type(
        &self,
        manufacturer_id: &str,
        model: &str,
    ) -> Result<Option<DbDeviceType>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM device_types WHERE manufacturer_id = ? AND model = ?")
            .bind(manufacturer_id)
            .bind(model)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| device_type_from_row(&row)))
    }

    /// Count all device types
    pub async fn count_device_types(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM device_types")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Store elevation image bytes into a device type record
    pub async fn set_device_type_image(
        &self,
        device_type_id: &str,
        orientation: ImageOrientation,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), sqlx::Error> {
        let sql = match orientation {
            ImageOrientation::Front => {
                "UPDATE device_types SET front_image_name = ?, front_image = ?, updated_at = ? WHERE id = ?"
            }
            ImageOrientation::Rear => {
                "UPDATE device_types SET rear_image_name = ?, rear_image = ?, updated_at = ? WHERE id = ?"
            }
        };

        sqlx::query(sql)
            .bind(filename)
            .bind(bytes)
            .bind(Utc::now().to_rfc3339())
            .bind(device_type_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Replace a device type's custom-field store in one update
    pub async fn update_custom_fields(
        &self,
        device_type_id: &str,
        custom_fields: &Map<String, Value>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE device_types SET custom_fields = ?, updated_at = ? WHERE id = ?")
            .bind(Value::Object(custom_fields.clone()).to_string())
            .bind(Utc::now().to_rfc3339())
            .bind(device_type_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert all component templates for one kind in a single transaction.
    ///
    /// All-or-nothing for this list; previously inserted kinds are untouched.
    pub async fn insert_component_templates(
        &self,
        templates: &[DbComponentTemplate],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for template in templates {
            sqlx::query(
                r#"
                INSERT INTO component_templates (
                    id, device_type_id, kind, name, label, port_type,
                    position, attrs, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&template.id)
            .bind(&template.device_type_id)
            .bind(template.kind)
            .bind(&template.name)
            .bind(&template.label)
            .bind(&template.port_type)
            .bind(template.position)
            .bind(Value::Object(template.attrs.clone()).to_string())
            .bind(template.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Get all component templates for a device type (ordered by kind, position)
    pub async fn get_component_templates(
        &self,
        device_type_id: &str,
    ) -> Result<Vec<DbComponentTemplate>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM component_templates
            WHERE device_type_id = ?
            ORDER BY kind, position
            "#,
        )
        .bind(device_type_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(component_template_from_row).collect())
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

fn parse_json_object(raw: &str) -> Map<String, Value> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn manufacturer_from_row(row: &SqliteRow) -> DbManufacturer {
    DbManufacturer {
        id: row.get("id"),
        name: row.get("name"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at")),
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at")),
    }
}

fn device_type_from_row(row: &SqliteRow) -> DbDeviceType {
    DbDeviceType {
        id: row.get("id"),
        manufacturer_id: row.get("manufacturer_id"),
        model: row.get("model"),
        part_number: row.get("part_number"),
        u_height: row.get("u_height"),
        is_full_depth: row.get("is_full_depth"),
        comments: row.get("comments"),
        custom_fields: parse_json_object(&row.get::<String, _>("custom_fields")),
        front_image_name: row.get("front_image_name"),
        front_image: row.get("front_image"),
        rear_image_name: row.get("rear_image_name"),
        rear_image: row.get("rear_image"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at")),
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at")),
    }
}

fn component_template_from_row(row: &SqliteRow) -> DbComponentTemplate {
    DbComponentTemplate {
        id: row.get("id"),
        device_type_id: row.get("device_type_id"),
        kind: row.get("kind"),
        name: row.get("name"),
        label: row.get("label"),
        port_type: row.get("port_type"),
        position: row.get("position"),
        attrs: parse_json_object(&row.get::<String, _>("attrs")),
        created_at: parse_timestamp(&row.get::<String, _>("created_at")),
    }
}
