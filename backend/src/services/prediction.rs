//! Harvest width prediction service

use shared::projection::{self, FruitMeasurement};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{PredictionRequest, PredictionResponse};

/// Prediction service backed by the scanned fruit table
#[derive(Clone)]
pub struct PredictionService {
    db: PgPool,
}

/// Database row for a scanned fruit
#[derive(Debug, Clone, sqlx::FromRow)]
struct FruitRow {
    major_mm: f64,
    minor_mm: f64,
    subminor_mm: f64,
}

impl From<FruitRow> for FruitMeasurement {
    fn from(row: FruitRow) -> Self {
        FruitMeasurement {
            major_mm: row.major_mm,
            minor_mm: row.minor_mm,
            subminor_mm: row.subminor_mm,
        }
    }
}

impl PredictionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fruit whose mean diameter lies within [min_mm, max_mm]
    pub async fn fruits_in_range(&self, min_mm: f64, max_mm: f64) -> AppResult<Vec<FruitMeasurement>> {
        let rows = sqlx::query_as::<_, FruitRow>(
            r#"
            SELECT major_mm::float8 AS major_mm,
                   minor_mm::float8 AS minor_mm,
                   subminor_mm::float8 AS subminor_mm
            FROM fruits
            WHERE ((major_mm + minor_mm + subminor_mm) / 3)::float8 BETWEEN $1 AND $2
            "#,
        )
        .bind(min_mm)
        .bind(max_mm)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(FruitMeasurement::from).collect())
    }

    /// Project every matching fruit to the harvest date
    pub async fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionResponse> {
        let fruits = self
            .fruits_in_range(request.min_diameter, request.max_diameter)
            .await?;
        let days = request.days_until_harvest();

        tracing::info!(
            fruits = fruits.len(),
            days,
            growth_rate = request.growth_rate,
            "Projecting fruit diameters"
        );

        let response = projection::project(&fruits, request.growth_rate, days)?;
        Ok(response)
    }
}
