//! SeaORM entity models
//!
//! Database entities for the LexForge admin backend

mod data_processing_job;
mod dataset_metrics;
mod fine_tuning_job;
mod legal_document;
mod model_deployment;
mod prompt_response_pair;
mod training_metrics;
mod validation_result;

pub use legal_document::{
    Entity as LegalDocumentEntity,
    Model as LegalDocument,
    ActiveModel as LegalDocumentActiveModel,
    Column as LegalDocumentColumn,
    Complexity,
    DocumentType,
};

pub use prompt_response_pair::{
    Entity as PairEntity,
    Model as PromptResponsePair,
    ActiveModel as PairActiveModel,
    Column as PairColumn,
    PairType,
};

pub use data_processing_job::{
    Entity as ProcessingJobEntity,
    Model as DataProcessingJob,
    ActiveModel as ProcessingJobActiveModel,
    Column as ProcessingJobColumn,
    ProcessingJobType,
    ProcessingStatus,
};

pub use fine_tuning_job::{
    Entity as FineTuningJobEntity,
    Model as FineTuningJob,
    ActiveModel as FineTuningJobActiveModel,
    Column as FineTuningJobColumn,
    TrainingStatus,
};

pub use training_metrics::{
    Entity as TrainingMetricsEntity,
    Model as TrainingMetrics,
    ActiveModel as TrainingMetricsActiveModel,
    Column as TrainingMetricsColumn,
};

pub use validation_result::{
    Entity as ValidationResultEntity,
    Model as ValidationResult,
    ActiveModel as ValidationResultActiveModel,
    Column as ValidationResultColumn,
};

pub use dataset_metrics::{
    Entity as DatasetMetricsEntity,
    Model as DatasetMetrics,
    ActiveModel as DatasetMetricsActiveModel,
    Column as DatasetMetricsColumn,
};

pub use model_deployment::{
    Entity as ModelDeploymentEntity,
    Model as ModelDeployment,
    ActiveModel as ModelDeploymentActiveModel,
    Column as ModelDeploymentColumn,
};
