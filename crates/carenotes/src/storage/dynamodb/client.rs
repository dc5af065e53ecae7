//! AWS SDK client setup.

use aws_sdk_dynamodb::Client;

/// Connection settings for the DynamoDB client.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    /// AWS region.
    pub region: String,
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({url})"),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given settings.
///
/// Credentials come from the SDK's default provider chain.
pub async fn create_client(settings: &AwsSettings) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(settings.region.clone()));

    if let Some(endpoint) = &settings.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    tracing::info!(endpoint = %settings.target_display(), "Initializing DynamoDB client");

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}
