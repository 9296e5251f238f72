use utoipa::OpenApi;

use scholaris_core::{ErrorResponse, PaginationMeta, PaginationParams};
use scholaris_models::{
    AcademicYearQuery, Class, ClassFilterParams, ClassPeriod, ClassWithStats,
    CurrentAcademicYearResponse, PaginatedClassesResponse, PreviewRow, TransitionRequest,
    TransitionResult,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::transition::controller::get_current_academic_year,
        crate::modules::transition::controller::preview_transition,
        crate::modules::transition::controller::execute_transition,
        crate::modules::classes::controller::get_classes,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            TransitionRequest,
            TransitionResult,
            PreviewRow,
            AcademicYearQuery,
            CurrentAcademicYearResponse,
            Class,
            ClassPeriod,
            ClassWithStats,
            ClassFilterParams,
            PaginatedClassesResponse,
        )
    ),
    tags(
        (name = "Transitions", description = "Academic-year transition"),
        (name = "Classes", description = "Class listing"),
    ),
    info(
        title = "Scholaris API",
        description = "School records and academic-year transition",
    )
)]
pub struct ApiDoc;
