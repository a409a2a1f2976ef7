use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::IntoDeserializer};
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: i64 = 20;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Treats a missing or blank query value as `None`, so `?status=` means "no filter".
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let de: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
                value.into_deserializer();
            T::deserialize(de)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::orders::OrderListQuery;
    use crate::entity::sea_orm_active_enums::OrderStatus;

    #[test]
    fn huge_page_numbers_saturate_instead_of_overflowing() {
        let pagination = Pagination {
            page: Some(i64::MAX),
            per_page: Some(20),
        };
        let (page, per_page, offset) = pagination.normalize();
        assert_eq!((page, per_page, offset), (i64::MAX, 20, i64::MAX));
    }

    #[test]
    fn pagination_defaults_to_twenty_per_page() {
        let (page, per_page, offset) = Pagination::default().normalize();
        assert_eq!((page, per_page, offset), (1, 20, 0));

        let (page, per_page, offset) = Pagination {
            page: Some(3),
            per_page: None,
        }
        .normalize();
        assert_eq!((page, per_page, offset), (3, 20, 40));
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let (page, per_page, offset) = Pagination {
            page: Some(-4),
            per_page: Some(1000),
        }
        .normalize();
        assert_eq!((page, per_page, offset), (1, 100, 0));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let query: OrderListQuery = serde_json::from_value(serde_json::json!({
            "status": "",
            "order_type": "  ",
        }))
        .unwrap();
        assert!(query.status.is_none());
        assert!(query.order_type.is_none());
    }

    #[test]
    fn known_status_filter_parses_and_unknown_is_rejected() {
        let query: OrderListQuery =
            serde_json::from_value(serde_json::json!({ "status": "ready" })).unwrap();
        assert_eq!(query.status, Some(OrderStatus::Ready));

        let bad = serde_json::from_value::<OrderListQuery>(serde_json::json!({ "status": "shipped" }));
        assert!(bad.is_err());
    }
}
