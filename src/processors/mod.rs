pub mod cleaner;
pub mod data_merger;
pub mod feature_builder;
pub mod outlier_filter;
pub mod pipeline;
pub mod report;
pub mod type_normalizer;

pub use data_merger::DataMerger;
pub use feature_builder::FeatureBuilder;
pub use outlier_filter::OutlierFilter;
pub use pipeline::TransformationPipeline;
pub use report::{
    ImputationStats, MergeStats, NormalizationStats, OutlierStats, TransformReport, VocabularyStats,
};
pub use type_normalizer::TypeNormalizer;
