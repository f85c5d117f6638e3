//! Bulk CSV import parsing.
//!
//! `bulk_insert` endpoints accept one multipart file field holding a CSV
//! whose header row names the entity's add-shape fields. Parsing is
//! all-or-nothing: the first malformed record rejects the whole upload
//! before any row reaches the store.

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Reads the uploaded CSV file into add-shape records.
///
/// Rejects uploads whose filename does not end in `.csv` and any record
/// that fails to deserialize, naming the offending row.
pub async fn read_csv_rows<T: DeserializeOwned>(
    multipart: &mut Multipart,
) -> Result<Vec<T>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadUpload(e.to_string()))?
        .ok_or_else(|| ApiError::BadUpload("missing file field".to_string()))?;

    let file_name = field.file_name().unwrap_or_default().to_string();
    if !file_name.ends_with(".csv") {
        return Err(ApiError::BadUpload("file must be in CSV format".to_string()));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadUpload(e.to_string()))?;

    let mut reader = csv::Reader::from_reader(bytes.as_ref());
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<T>().enumerate() {
        let row =
            record.map_err(|e| ApiError::BadUpload(format!("row {}: {}", index + 1, e)))?;
        rows.push(row);
    }

    debug!(file = %file_name, rows = rows.len(), "bulk csv parsed");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use mercato_core::NewProduct;

    #[test]
    fn test_csv_rows_deserialize_into_add_shape() {
        let data = "product_name,product_description,product_category,unit_price\n\
                    Green Tea,,Groceries,4.2\n\
                    Espresso Beans 1kg,Dark roast,Groceries,12.5\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<NewProduct> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_name, "Green Tea");
        assert_eq!(rows[1].unit_price, 12.5);
    }

    #[test]
    fn test_malformed_row_fails() {
        let data = "product_name,product_description,product_category,unit_price\n\
                    Green Tea,,Groceries,not-a-number\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Result<Vec<mercato_core::NewProduct>, _> = reader.deserialize().collect();
        assert!(rows.is_err());
    }
}
