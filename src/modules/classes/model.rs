pub use scholaris_models::classes::{
    Class, ClassFilterParams, ClassPeriod, ClassWithStats, PaginatedClassesResponse,
};
