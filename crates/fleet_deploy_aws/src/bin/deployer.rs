use std::path::PathBuf;
use std::process::exit;

use aws_sdk_apigatewayv2::types::ProtocolType;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionCode, Runtime};
use clap::Parser;

use fleet_deploy_aws::adapters::function_registry::{FunctionLookup, FunctionRegistry};
use fleet_deploy_aws::adapters::gateway::GatewayBinder;
use fleet_deploy_aws::handlers::publisher::run_deploy;
use fleet_deploy_core::contract::{
    DEFAULT_FUNCTIONS_ROOT, FUNCTION_ENTRY_POINT, FUNCTION_RUNTIME,
};
use fleet_deploy_core::naming::{gateway_api_name, gateway_permission_statement_id};

#[derive(Parser)]
#[command(
    name = "deployer",
    about = "Publish function directories to AWS Lambda",
    long_about = "Scans a root directory for function subdirectories and creates or\n\
                  updates the matching Lambda functions, binding an HTTP gateway to\n\
                  newly created functions whose directory name carries a trailing\n\
                  underscore marker."
)]
struct Cli {
    /// Root directory holding one subdirectory per function
    #[arg(long, default_value = DEFAULT_FUNCTIONS_ROOT)]
    root: PathBuf,
    /// Execution role ARN assumed by newly created functions
    #[arg(long, env = "FUNCTION_ROLE_ARN")]
    role: String,
}

struct AwsFunctionRegistry {
    lambda_client: aws_sdk_lambda::Client,
    execution_role_arn: String,
}

impl FunctionRegistry for AwsFunctionRegistry {
    fn lookup_function(&self, function_name: &str) -> Result<FunctionLookup, String> {
        let client = self.lambda_client.clone();
        let name = function_name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match client.get_function().function_name(name).send().await {
                    Ok(_) => Ok(FunctionLookup::Exists),
                    Err(error) => {
                        let not_found = error
                            .as_service_error()
                            .map(|service_error| service_error.is_resource_not_found_exception())
                            .unwrap_or(false);
                        if not_found {
                            Ok(FunctionLookup::Missing)
                        } else {
                            Err(format!("failed to look up function: {error}"))
                        }
                    }
                }
            })
        })
    }

    fn create_function(&self, function_name: &str, archive: &[u8]) -> Result<String, String> {
        let client = self.lambda_client.clone();
        let name = function_name.to_string();
        let role = self.execution_role_arn.clone();
        let code = FunctionCode::builder()
            .zip_file(Blob::new(archive.to_vec()))
            .build();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let created = client
                    .create_function()
                    .function_name(name)
                    .runtime(Runtime::from(FUNCTION_RUNTIME))
                    .handler(FUNCTION_ENTRY_POINT)
                    .role(role)
                    .code(code)
                    .send()
                    .await
                    .map_err(|error| format!("failed to create function: {error}"))?;

                created
                    .function_arn()
                    .map(str::to_string)
                    .ok_or_else(|| "created function is missing an ARN".to_string())
            })
        })
    }

    fn update_function_code(&self, function_name: &str, archive: &[u8]) -> Result<(), String> {
        let client = self.lambda_client.clone();
        let name = function_name.to_string();
        let zip_file = Blob::new(archive.to_vec());

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .update_function_code()
                    .function_name(name)
                    .zip_file(zip_file)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to update function code: {error}"))
            })
        })
    }
}

struct AwsGatewayBinder {
    apigateway_client: aws_sdk_apigatewayv2::Client,
    lambda_client: aws_sdk_lambda::Client,
}

impl GatewayBinder for AwsGatewayBinder {
    fn bind_http_gateway(
        &self,
        function_name: &str,
        function_arn: &str,
    ) -> Result<String, String> {
        let apigateway_client = self.apigateway_client.clone();
        let lambda_client = self.lambda_client.clone();
        let api_name = gateway_api_name(function_name);
        let statement_id = gateway_permission_statement_id(function_name);
        let name = function_name.to_string();
        let target_arn = function_arn.to_string();
        let created_api_name = api_name.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                apigateway_client
                    .create_api()
                    .name(api_name)
                    .protocol_type(ProtocolType::Http)
                    .target(target_arn)
                    .send()
                    .await
                    .map_err(|error| format!("failed to create http api: {error}"))?;

                lambda_client
                    .add_permission()
                    .function_name(name)
                    .statement_id(statement_id)
                    .action("lambda:InvokeFunction")
                    .principal("apigateway.amazonaws.com")
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to grant gateway invoke permission: {error}")
                    })?;

                Ok(created_api_name)
            })
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let lambda_client = aws_sdk_lambda::Client::new(&aws_config);
    let registry = AwsFunctionRegistry {
        lambda_client: lambda_client.clone(),
        execution_role_arn: cli.role,
    };
    let binder = AwsGatewayBinder {
        apigateway_client: aws_sdk_apigatewayv2::Client::new(&aws_config),
        lambda_client,
    };

    let report = run_deploy(&cli.root, &registry, &binder);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).expect("run report should serialize")
    );

    if report.failed > 0 {
        exit(1);
    }
}
