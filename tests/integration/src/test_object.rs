//! Object round-trip tests, cross-checked with the AWS SDK.

#[cfg(test)]
mod tests {
    use aws_sdk_s3::primitives::ByteStream;
    use s3request_client::{Blob, RequestSpecBuilder};

    use crate::{cleanup_object, s3_service, sdk_client, test_bucket, test_key};

    #[tokio::test]
    #[ignore = "requires S3 credentials and S3_TEST_BUCKET"]
    async fn test_should_put_object_readable_by_sdk() -> anyhow::Result<()> {
        let service = s3_service();
        let client = sdk_client().await;
        let bucket = test_bucket();
        let key = test_key("put");

        let exchange = service
            .put_object(&bucket, &key, Blob::new("test123", "text/plain"))
            .await?;
        assert_eq!(exchange.response.status, 200);
        assert!(exchange.response.header("etag").is_some());

        let resp = client.get_object().bucket(&bucket).key(&key).send().await?;
        assert_eq!(resp.content_type(), Some("text/plain"));
        let data = resp.body.collect().await?.into_bytes();
        assert_eq!(data.as_ref(), b"test123");

        cleanup_object(&client, &bucket, &key).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires S3 credentials and S3_TEST_BUCKET"]
    async fn test_should_get_object_written_by_sdk() -> anyhow::Result<()> {
        let service = s3_service();
        let client = sdk_client().await;
        let bucket = test_bucket();
        let key = test_key("get");

        client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .body(ByteStream::from_static(b"hello from the sdk"))
            .send()
            .await?;

        let exchange = service.get_object(&bucket, &key).await?;
        assert_eq!(exchange.response.text(), "hello from the sdk");
        assert_eq!(exchange.log.response.status, 200);

        cleanup_object(&client, &bucket, &key).await;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires S3 credentials and S3_TEST_BUCKET"]
    async fn test_should_delete_object() -> anyhow::Result<()> {
        let service = s3_service();
        let client = sdk_client().await;
        let bucket = test_bucket();
        let key = test_key("delete");

        service
            .put_object(&bucket, &key, Blob::new("bye", "text/plain"))
            .await?;
        let exchange = service.delete_object(&bucket, &key).await?;
        assert_eq!(exchange.response.status, 204);

        let head = client.head_object().bucket(&bucket).key(&key).send().await;
        assert!(head.is_err(), "object should be gone");
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires S3 credentials and S3_TEST_BUCKET"]
    async fn test_should_accept_reexecuted_spec() -> anyhow::Result<()> {
        let service = s3_service();
        let client = sdk_client().await;
        let bucket = test_bucket();
        let key = test_key("again");

        let spec = RequestSpecBuilder::new()
            .method("PUT")?
            .bucket(&bucket)?
            .object_key(&key)?
            .content("same body twice")
            .content_type("text/plain")?
            .build()?;

        service.execute(&spec).await?;
        service.execute(&spec).await?;

        cleanup_object(&client, &bucket, &key).await;
        Ok(())
    }
}
