//! Paging clauses.

use sqlweave_core::BuildError;

/// The paging clause of a select statement.
///
/// Either the `limit`/`offset` form or the standard
/// `offset ... rows fetch first ... rows only` form. Counts are held as the
/// signed BIGINT they bind as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingModel {
    LimitOffset {
        limit: i64,
        offset: Option<i64>,
    },
    /// At least one of the two is present.
    OffsetFetch {
        offset: Option<i64>,
        fetch_first: Option<i64>,
    },
}

impl PagingModel {
    /// Build the paging model from whichever paging values were supplied.
    ///
    /// A limit selects the `limit` form; otherwise an offset or fetch-first
    /// count selects the standard form; with nothing supplied there is no
    /// paging clause. A limit together with a fetch-first count, or a count
    /// above `i64::MAX`, is an invalid argument.
    pub fn from_parts(
        limit: Option<u64>,
        offset: Option<u64>,
        fetch_first: Option<u64>,
    ) -> Result<Option<Self>, BuildError> {
        let limit = count("limit", limit)?;
        let offset = count("offset", offset)?;
        let fetch_first = count("fetch first", fetch_first)?;
        Ok(match (limit, offset, fetch_first) {
            (Some(_), _, Some(_)) => {
                return Err(BuildError::invalid_argument(
                    "limit cannot be combined with fetch first",
                ));
            }
            (Some(limit), offset, None) => Some(PagingModel::LimitOffset { limit, offset }),
            (None, None, None) => None,
            (None, offset, fetch_first) => Some(PagingModel::OffsetFetch {
                offset,
                fetch_first,
            }),
        })
    }
}

fn count(name: &str, value: Option<u64>) -> Result<Option<i64>, BuildError> {
    value
        .map(|v| {
            i64::try_from(v).map_err(|_| {
                BuildError::invalid_argument(format!("{} {} exceeds the BIGINT range", name, v))
            })
        })
        .transpose()
}
