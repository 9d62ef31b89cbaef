//! Shared helpers for Diesel repository implementations.

use pagination::PageRequest;

/// Failure inside a transaction closure: either the database failed or the
/// adapter rejected the operation with a port error.
///
/// Returning `Rejected` from the closure rolls the transaction back.
#[derive(Debug)]
pub enum TransactionError<E> {
    Database(diesel::result::Error),
    Rejected(E),
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl<E> TransactionError<E> {
    /// Collapse into the port error, mapping database failures with `map`.
    pub fn into_port_error(self, map: impl FnOnce(diesel::result::Error) -> E) -> E {
        match self {
            Self::Database(error) => map(error),
            Self::Rejected(error) => error,
        }
    }
}

/// Limit and offset for an overfetching list query, as SQL integers.
///
/// The limit includes the extra row used to detect a next page.
pub fn page_bounds(page: PageRequest) -> Result<(i64, i64), String> {
    let offset = i64::try_from(page.offset())
        .map_err(|_| format!("offset {} is out of range", page.offset()))?;
    Ok((i64::from(page.overfetch_limit()), offset))
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<R, T, E>(
    rows: Vec<R>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejected_transaction_keeps_port_error() {
        let err: TransactionError<&str> = TransactionError::Rejected("sold out");
        assert_eq!(err.into_port_error(|_| "database"), "sold out");
        let err: TransactionError<&str> = diesel::result::Error::NotFound.into();
        assert_eq!(err.into_port_error(|_| "database"), "database");
    }

    #[rstest]
    fn page_bounds_overfetch_by_one() {
        let page = PageRequest::new(Some(20), Some(40)).expect("valid page");
        assert_eq!(page_bounds(page), Ok((21, 40)));
    }

    #[rstest]
    fn collect_rows_reports_first_failure() {
        struct Even(u8);
        impl TryFrom<u8> for Even {
            type Error = String;
            fn try_from(value: u8) -> Result<Self, Self::Error> {
                if value % 2 == 0 {
                    Ok(Self(value))
                } else {
                    Err(format!("odd {value}"))
                }
            }
        }

        let ok: Result<Vec<Even>, String> = collect_rows(vec![2, 4], |m| m);
        assert_eq!(ok.map(|v| v.len()), Ok(2));
        let err: Result<Vec<Even>, String> = collect_rows(vec![2, 3, 5], |m| m);
        assert_eq!(err.map(|v| v.len()), Err("odd 3".to_owned()));
    }
}
