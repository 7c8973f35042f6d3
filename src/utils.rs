use crate::store::error::DataStoreError;
use chrono::NaiveDate;
use std::io;
use std::path::Path;

/// Days between 0001-01-01 (CE day 1) and the polars date epoch 1970-01-01.
const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Converts a polars `Date` physical value (days since 1970-01-01) to a `NaiveDate`.
pub(crate) fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(CE_TO_UNIX_EPOCH_DAYS)?)
}

pub(crate) async fn ensure_source_file(path: &Path) -> Result<(), DataStoreError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(DataStoreError::NotAFile(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(DataStoreError::SourceNotFound(path.to_path_buf()))
        }
        Err(e) => Err(DataStoreError::SourceMetadata(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_day_conversion() {
        assert_eq!(
            date_from_epoch_days(0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            date_from_epoch_days(17_401),
            NaiveDate::from_ymd_opt(2017, 8, 23)
        );
        assert_eq!(date_from_epoch_days(i32::MAX), None);
    }

    #[tokio::test]
    async fn test_ensure_source_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let missing = dir.path().join("missing.sqlite");
        assert!(matches!(
            ensure_source_file(&missing).await,
            Err(DataStoreError::SourceNotFound(_))
        ));
        assert!(matches!(
            ensure_source_file(dir.path()).await,
            Err(DataStoreError::NotAFile(_))
        ));

        let file = dir.path().join("present.csv");
        std::fs::write(&file, "station,name\n")?;
        ensure_source_file(&file).await?;
        Ok(())
    }
}
