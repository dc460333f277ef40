//! Core types: data, model specification, design matrix, options, results.

mod dataset;
mod design;
mod options;
mod report;
mod result;

pub use dataset::{Dataset, DatasetBuilder, Factor, ModelSpec, Observation, Value};
pub use design::{
    build_design, build_design_with, DesignMatrix, DropReason, DroppedRow, Term, TermKind,
    INTERCEPT,
};
pub use options::{
    DiagnosticsOptions, DiagnosticsOptionsBuilder, DwAlternative, MissingPolicy, OptionsError,
};
pub use report::{
    ColumnVif, ConfidenceInterval, Decision, DegreesOfFreedom, DiagnosticResult, FullReport,
    InferenceReport, InfluenceDiagnosticsReport, MulticollinearityReport,
    ResidualDiagnosticsReport, TermVif,
};
pub use result::FittedModel;
