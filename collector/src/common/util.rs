use chrono::{DateTime, TimeZone, Utc};
use itertools::Itertools;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

#[inline]
pub fn get_current_time() -> Result<i64, SystemTimeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
}

// Fast path: returns 0 on any error instead of double error handling
#[inline]
pub fn get_current_time_or_zero() -> i64 {
    get_current_time().unwrap_or(0)
}

/// Converts a store timestamp (milliseconds since the epoch) to a UTC date-time.
pub fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Converts a date-time to the store's millisecond timestamp.
pub fn millis_from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> i64 {
    datetime.timestamp_millis()
}

/// Flattens a list of lists into one list, keeping the order of both levels.
pub fn flatten<T, I>(list_of_lists: I) -> Vec<T>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = T>,
{
    list_of_lists.into_iter().flatten().collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_current_time() {
        let current_time = get_current_time_or_zero();
        assert!(current_time > 0);
    }

    #[test]
    fn test_millis_datetime_round_trip() {
        let datetime = datetime_from_millis(1_500_000_000_123).unwrap();
        assert_eq!(datetime.timestamp(), 1_500_000_000);
        assert_eq!(millis_from_datetime(&datetime), 1_500_000_000_123);
    }

    #[test]
    fn test_flatten_keeps_order() {
        let nested = vec![vec![1, 2], vec![], vec![3]];
        assert_eq!(flatten(nested), vec![1, 2, 3]);
    }

    #[test]
    fn test_flatten_empty() {
        let nested: Vec<Vec<u8>> = vec![];
        assert!(flatten(nested).is_empty());
    }
}
