use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

use super::store::{CatalogStore, StoreError};
use crate::models::{Category, FoodComponent, FoodItem, FoodKind, ImageMetadata, Unit};

pub struct CatalogRepository {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct FoodItemRow {
    id: String,
    name: String,
    category_id: String,
    portion_equivalent: f64,
    amount_per_portion: Option<f64>,
    unit_id: Option<String>,
    notes: Option<String>,
    is_favorite: bool,
    image_path: Option<String>,
    image_remote_url: Option<String>,
    image_source: Option<String>,
    image_source_id: Option<String>,
    image_attribution_name: Option<String>,
    image_attribution_url: Option<String>,
    image_source_url: Option<String>,
    kind: String,
}

#[derive(sqlx::FromRow)]
struct ComponentRow {
    composite_id: String,
    food_item_id: String,
    portion_multiplier: f64,
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
}

#[derive(sqlx::FromRow)]
struct UnitRow {
    id: String,
    name: String,
    symbol: String,
}

fn parse_id(value: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add_category(&self, category: &Category) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO categories (id, name, sort_order) VALUES (?, ?, (SELECT COUNT(*) FROM categories))",
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn add_unit(&self, unit: &Unit) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO units (id, name, symbol) VALUES (?, ?, ?)")
            .bind(unit.id.to_string())
            .bind(&unit.name)
            .bind(&unit.symbol)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY sort_order, name")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Category {
                    id: parse_id(&row.id)?,
                    name: row.name,
                })
            })
            .collect()
    }

    pub async fn units(&self) -> Result<Vec<Unit>, sqlx::Error> {
        let rows: Vec<UnitRow> = sqlx::query_as("SELECT id, name, symbol FROM units ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Unit {
                    id: parse_id(&row.id)?,
                    name: row.name,
                    symbol: row.symbol,
                })
            })
            .collect()
    }

    pub async fn food_items(&self) -> Result<Vec<FoodItem>, sqlx::Error> {
        let rows: Vec<FoodItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, category_id, portion_equivalent, amount_per_portion, unit_id, notes,
                   is_favorite, image_path, image_remote_url, image_source, image_source_id,
                   image_attribution_name, image_attribution_url, image_source_url, kind
            FROM food_items
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let component_rows: Vec<ComponentRow> = sqlx::query_as(
            "SELECT composite_id, food_item_id, portion_multiplier FROM food_components ORDER BY composite_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut components: HashMap<String, Vec<FoodComponent>> = HashMap::new();
        for row in component_rows {
            components
                .entry(row.composite_id)
                .or_default()
                .push(FoodComponent::new(
                    parse_id(&row.food_item_id)?,
                    row.portion_multiplier,
                ));
        }

        rows.into_iter()
            .map(|row| {
                let parts = components.remove(&row.id).unwrap_or_default();
                hydrate_food_item(row, parts)
            })
            .collect()
    }

    pub async fn upsert(&self, items: &[FoodItem]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now().to_rfc3339();

        for item in items {
            let id = item.id.to_string();

            sqlx::query(
                r#"
                INSERT INTO food_items (id, name, category_id, portion_equivalent, amount_per_portion,
                    unit_id, notes, is_favorite, image_path, image_remote_url, image_source,
                    image_source_id, image_attribution_name, image_attribution_url, image_source_url,
                    kind, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    category_id = excluded.category_id,
                    portion_equivalent = excluded.portion_equivalent,
                    amount_per_portion = excluded.amount_per_portion,
                    unit_id = excluded.unit_id,
                    notes = excluded.notes,
                    is_favorite = excluded.is_favorite,
                    image_path = excluded.image_path,
                    image_remote_url = excluded.image_remote_url,
                    image_source = excluded.image_source,
                    image_source_id = excluded.image_source_id,
                    image_attribution_name = excluded.image_attribution_name,
                    image_attribution_url = excluded.image_attribution_url,
                    image_source_url = excluded.image_source_url,
                    kind = excluded.kind,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&id)
            .bind(&item.name)
            .bind(item.category_id.to_string())
            .bind(item.portion_equivalent)
            .bind(item.amount_per_portion)
            .bind(item.unit_id.map(|u| u.to_string()))
            .bind(&item.notes)
            .bind(item.is_favorite)
            .bind(&item.image.path)
            .bind(&item.image.remote_url)
            .bind(item.image.source.map(|s| s.to_string()))
            .bind(&item.image.source_id)
            .bind(&item.image.attribution_name)
            .bind(&item.image.attribution_url)
            .bind(&item.image.source_url)
            .bind(item.kind.to_string())
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

            // Replace components
            sqlx::query("DELETE FROM food_components WHERE composite_id = ?")
                .bind(&id)
                .execute(&mut *tx)
                .await?;

            for (position, component) in item.components.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO food_components (composite_id, position, food_item_id, portion_multiplier) VALUES (?, ?, ?, ?)",
                )
                .bind(&id)
                .bind(position as i64)
                .bind(component.food_item_id.to_string())
                .bind(component.portion_multiplier)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::debug!("Upserted {} food item(s)", items.len());
        Ok(())
    }
}

fn hydrate_food_item(
    row: FoodItemRow,
    components: Vec<FoodComponent>,
) -> Result<FoodItem, sqlx::Error> {
    let kind: FoodKind = row.kind.parse().unwrap_or_default();
    let unit_id = row.unit_id.as_deref().map(parse_id).transpose()?;

    Ok(FoodItem {
        id: parse_id(&row.id)?,
        name: row.name,
        category_id: parse_id(&row.category_id)?,
        portion_equivalent: row.portion_equivalent,
        amount_per_portion: row.amount_per_portion,
        unit_id,
        notes: row.notes,
        is_favorite: row.is_favorite,
        image: ImageMetadata {
            path: row.image_path,
            remote_url: row.image_remote_url,
            source: row.image_source.and_then(|s| s.parse().ok()),
            source_id: row.image_source_id,
            attribution_name: row.image_attribution_name,
            attribution_url: row.image_attribution_url,
            source_url: row.image_source_url,
        },
        kind,
        components: if kind == FoodKind::Composite {
            components
        } else {
            Vec::new()
        },
    })
}

impl CatalogStore for CatalogRepository {
    async fn list_food_items(&self) -> Result<Vec<FoodItem>, StoreError> {
        Ok(self.food_items().await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories().await?)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        Ok(self.units().await?)
    }

    async fn upsert_food_items(&self, items: &[FoodItem]) -> Result<(), StoreError> {
        Ok(self.upsert(items).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::ImageSource;
    use tempfile::TempDir;

    struct TestContext {
        repo: CatalogRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        TestContext {
            repo: CatalogRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_categories_keep_insertion_order() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.add_category(&Category::new("Vegetables")).await.unwrap();
        repo.add_category(&Category::new("Dairy")).await.unwrap();

        let categories = repo.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Vegetables");
        assert_eq!(categories[1].name, "Dairy");
    }

    #[tokio::test]
    async fn test_upsert_and_list_food_items() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let category = Category::new("Fruit");
        let unit = Unit::new("gram", "g");
        repo.add_category(&category).await.unwrap();
        repo.add_unit(&unit).await.unwrap();

        let apple = FoodItem::new("Apple", category.id)
            .with_amount(150.0, unit.id)
            .with_notes("crisp")
            .with_image(ImageMetadata {
                remote_url: Some("https://example.com/apple.jpg".to_string()),
                source: Some(ImageSource::Unsplash),
                ..ImageMetadata::default()
            });
        let banana = FoodItem::new("Banana", category.id).with_favorite(true);
        let salad = FoodItem::new("Fruit salad", category.id).with_components(vec![
            FoodComponent::new(apple.id, 0.5),
            FoodComponent::new(banana.id, 1.0),
        ]);

        repo.upsert_food_items(&[salad.clone(), banana.clone(), apple.clone()])
            .await
            .unwrap();

        let items = repo.list_food_items().await.unwrap();
        assert_eq!(items.len(), 3);
        // Sorted by name
        assert_eq!(items[0], apple);
        assert_eq!(items[1], banana);
        assert_eq!(items[2], salad);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let category = Category::new("Snacks");
        let part = Uuid::new_v4();
        let original = FoodItem::new("Trail mix", category.id)
            .with_components(vec![FoodComponent::new(part, 1.0)]);
        repo.upsert_food_items(&[original.clone()]).await.unwrap();

        let mut replacement = original.clone();
        replacement.name = "Trail mix (salted)".to_string();
        replacement.kind = FoodKind::Single;
        replacement.components.clear();
        repo.upsert_food_items(&[replacement.clone()]).await.unwrap();

        let items = repo.list_food_items().await.unwrap();
        assert_eq!(items, vec![replacement]);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM food_components")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_upsert_empty_batch_is_noop() {
        let ctx = setup_repo().await;
        ctx.repo.upsert_food_items(&[]).await.unwrap();
        assert!(ctx.repo.list_food_items().await.unwrap().is_empty());
    }
}
