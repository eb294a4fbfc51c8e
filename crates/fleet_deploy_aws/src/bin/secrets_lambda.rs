use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use fleet_deploy_aws::adapters::secret_store::SecretStore;
use fleet_deploy_aws::handlers::secrets::handle_secret_event;
use fleet_deploy_core::contract::SecretResponse;

struct AwsSecretStore {
    secrets_client: aws_sdk_secretsmanager::Client,
}

impl SecretStore for AwsSecretStore {
    fn fetch_secret_string(&self, secret_id: &str) -> Result<Option<String>, String> {
        let client = self.secrets_client.clone();
        let id = secret_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let value = client
                    .get_secret_value()
                    .secret_id(id)
                    .send()
                    .await
                    .map_err(|error| format!("failed to read secret value: {error}"))?;
                Ok(value.secret_string().map(str::to_string))
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<SecretResponse, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let secret_store = AwsSecretStore {
        secrets_client: aws_sdk_secretsmanager::Client::new(&aws_config),
    };

    Ok(handle_secret_event(event.payload, &secret_store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
