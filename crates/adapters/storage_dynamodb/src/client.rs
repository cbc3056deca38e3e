//! SDK client construction and table bootstrap.

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType,
};

use todohub_app::ports::TableName;

use crate::error::StorageError;
use crate::todo_repo::{DynamoTodoRepository, ID};

/// Read and write capacity requested when the table has to be created.
pub const PROVISIONED_CAPACITY_UNITS: i64 = 10;

/// Configuration for the `DynamoDB` storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service endpoint, e.g. `http://localhost:8000` for `DynamoDB` Local.
    /// `None` uses the regional AWS endpoint.
    pub endpoint: Option<String>,
    pub region: String,
    /// Table holding todo items, created on startup if missing.
    pub table_name: TableName,
}

impl Config {
    #[must_use]
    pub fn new(region: impl Into<String>, table_name: TableName) -> Self {
        Self {
            endpoint: None,
            region: region.into(),
            table_name,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Credentials come from the default AWS provider chain. The todo table
    /// is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the table bootstrap fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region));
        if let Some(endpoint) = self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let database = Database {
            client: Client::new(&sdk_config),
            table_name: self.table_name,
        };
        database.ensure_table().await?;
        Ok(database)
    }
}

/// Holds the SDK client and the table it serves.
pub struct Database {
    client: Client,
    table_name: TableName,
}

impl Database {
    /// Create the todo table unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the request fails for any reason other
    /// than the table being present.
    pub async fn ensure_table(&self) -> Result<(), StorageError> {
        let result = self
            .client
            .create_table()
            .table_name(self.table_name.as_str())
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ID)
                    .attribute_type(ScalarAttributeType::S)
                    .build()?,
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ID)
                    .key_type(KeyType::Hash)
                    .build()?,
            )
            .provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(PROVISIONED_CAPACITY_UNITS)
                    .write_capacity_units(PROVISIONED_CAPACITY_UNITS)
                    .build()?,
            )
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(table = %self.table_name, "todo table created");
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(CreateTableError::is_resource_in_use_exception) =>
            {
                tracing::debug!(table = %self.table_name, "todo table already exists");
                Ok(())
            }
            Err(err) => Err(StorageError::sdk(err)),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    /// Repository over this database's todo table.
    #[must_use]
    pub fn todo_repository(&self) -> DynamoTodoRepository {
        DynamoTodoRepository::new(self.client.clone(), &self.table_name)
    }
}
