use tracing::instrument;

use scholaris_core::PaginationMeta;

use crate::modules::classes::model::{ClassFilterParams, PaginatedClassesResponse};
use crate::store::{SchoolStore, StoreError};

pub struct ClassService;

impl ClassService {
    #[instrument(skip(store))]
    pub async fn list_classes<S: SchoolStore>(
        store: &S,
        filters: ClassFilterParams,
    ) -> Result<PaginatedClassesResponse, StoreError> {
        let page = filters.pagination;

        let (data, total) = store
            .list_classes_with_stats(filters.filter(), page.limit(), page.offset())
            .await?;

        Ok(PaginatedClassesResponse {
            data,
            meta: PaginationMeta::new(&page, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use scholaris_core::PaginationParams;

    fn params(academic_year: Option<i32>, grade_level: Option<i16>, page: u32) -> ClassFilterParams {
        ClassFilterParams {
            academic_year,
            course_id: None,
            grade_level,
            pagination: PaginationParams::new(page, 2),
        }
    }

    #[tokio::test]
    async fn test_list_classes_paginates_and_counts() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        for section in ["A", "B", "C"] {
            store.add_class(course, 10, section, 2025);
        }
        store.add_class(course, 10, "A", 2024);

        let first = ClassService::list_classes(&store, params(Some(2025), None, 1))
            .await
            .unwrap();
        assert_eq!(first.meta.total, 3);
        assert_eq!(first.data.len(), 2);
        assert_eq!(first.meta.total_pages, 2);
        assert!(first.meta.has_next());

        let second = ClassService::list_classes(&store, params(Some(2025), None, 2))
            .await
            .unwrap();
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.data[0].class.section, "C");
        assert!(!second.meta.has_next());
    }

    #[tokio::test]
    async fn test_list_classes_filters_by_grade_level() {
        let store = MemoryStore::new();
        let course = store.add_course("Informatics");
        store.add_class(course, 10, "A", 2025);
        store.add_class(course, 12, "A", 2025);

        let response = ClassService::list_classes(&store, params(None, Some(12), 1))
            .await
            .unwrap();
        assert_eq!(response.meta.total, 1);
        assert_eq!(response.data[0].class.grade_level, 12);
    }
}
