//! Inspection Module
//!
//! Reverse inspection of reported equipment parameters against the standard
//! template of their module.

mod checker;
mod comparator;
mod model;
mod resolver;
mod store;


pub use checker::{
    build_description, InspectionSettings, Inspector, CLEAN_DESCRIPTION,
    MISSING_TEMPLATE_DESCRIPTION, MISSING_TEMPLATE_DETAIL_DESCRIPTION,
    TEMPLATE_OFFLINE_DESCRIPTION,
};
pub use comparator::{KeyedComparator, ParameterComparator};
pub use model::{
    ActualParameterSet, CheckCode, InspectionDiff, InspectionResult, Label, StandardParameterSet,
    TemplateInfo, TemplateStatus, ValueMismatch, SOURCE_AA_LIST,
};
pub use resolver::TemplateResolver;
pub use store::{MemoryTemplateStore, TemplateStore};
