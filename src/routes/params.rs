use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

// Pagination fields are inlined rather than flattened: serde_urlencoded
// buffers flattened values as strings, which fails to deserialize into
// Option<i64>.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HotelListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Approval state filter: pending, approved or rejected.
    pub status: Option<String>,
}

impl HotelListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    #[test]
    fn pagination_normalizes_defaults_and_bounds() {
        let (page, per_page, offset) = Pagination {
            page: None,
            per_page: None,
        }
        .normalize();
        assert_eq!((page, per_page, offset), (1, 20, 0));

        let (page, per_page, offset) = Pagination {
            page: Some(3),
            per_page: Some(500),
        }
        .normalize();
        assert_eq!((page, per_page, offset), (3, 100, 200));
    }

    #[test]
    fn hotel_list_query_parses_pagination_params() {
        let uri: Uri = "/api/admin/hotels?page=2&per_page=10&status=pending"
            .parse()
            .unwrap();
        let Query(query) = Query::<HotelListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(10));
        assert_eq!(query.status.as_deref(), Some("pending"));

        let (page, per_page, offset) = query.pagination().normalize();
        assert_eq!((page, per_page, offset), (2, 10, 10));
    }

    #[test]
    fn hotel_list_query_params_are_optional() {
        let uri: Uri = "/api/admin/hotels".parse().unwrap();
        let Query(query) = Query::<HotelListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.per_page, None);
        assert_eq!(query.status, None);
    }
}
