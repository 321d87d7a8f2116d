//! Shared AWS SDK configuration loading

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load SDK configuration for `region` from the default credential chain
///
/// With an `endpoint_url` override (local emulators) and no access key in
/// the environment, a static placeholder key pair is used instead.
pub(crate) async fn load_sdk_config(region: &str, endpoint_url: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
        if std::env::var_os("AWS_ACCESS_KEY_ID").is_none() {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                "local",
                "local",
                None,
                None,
                "mailcode_local_endpoint",
            ));
        }
    }

    loader.load().await
}
