//! AWS SDK integration: SSM parameter store, STS role assumption, IAM listing, S3 writes.
//!
//! Each remote collaborator sits behind a trait so the command layer can be
//! driven by in-memory fakes in tests.

pub mod arn;
pub mod iam_client;
pub mod s3;
pub mod ssm;
pub mod sts;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("SSM error: {0}")]
    SsmError(String),
    #[error("STS error: {0}")]
    StsError(String),
    #[error("IAM client error: {0}")]
    IamError(String),
    #[error("S3 error: {0}")]
    S3Error(String),
}

pub type AwsResult<T> = Result<T, AwsError>;
