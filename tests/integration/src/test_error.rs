//! Error decoding against real S3 error responses.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use s3request_client::{ErrorKind, ReqwestTransport, S3RequestError, S3Service};
    use s3request_core::SigningCredentials;

    use crate::{s3_service, test_bucket, test_config, test_key};

    #[tokio::test]
    #[ignore = "requires S3 credentials and S3_TEST_BUCKET"]
    async fn test_should_decode_no_such_key() {
        let service = s3_service();
        let err = service
            .get_object(&test_bucket(), &test_key("missing"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Aws);
        let S3RequestError::Aws(aws) = err else {
            panic!("expected a structured AWS error");
        };
        assert_eq!(aws.status, 404);
        assert_eq!(aws.code, "NoSuchKey");
        assert!(aws.field("requestId").is_some());
        assert_eq!(aws.http_request_log.response.status, 404);
    }

    #[tokio::test]
    #[ignore = "requires S3 credentials and S3_TEST_BUCKET"]
    async fn test_should_reject_wrong_secret() {
        let config = test_config();
        let credentials = SigningCredentials::new(
            config.access_key_id.clone(),
            "not-the-secret",
            config.region.clone(),
        );
        let service = S3Service::new(credentials, Arc::new(ReqwestTransport::new()));

        let err = service
            .get_object(&test_bucket(), &test_key("denied"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        let S3RequestError::Aws(aws) = err else {
            panic!("expected a structured AWS error");
        };
        assert_eq!(aws.code, "SignatureDoesNotMatch");
    }
}
