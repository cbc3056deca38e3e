//! `DynamoDB` implementation of [`TodoRepository`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};

use todohub_app::ports::{TableName, TodoRepository};
use todohub_domain::error::TodoError;
use todohub_domain::id::TodoId;
use todohub_domain::time;
use todohub_domain::todo::{TodoChanges, TodoItem};

use crate::error::StorageError;

pub(crate) const ID: &str = "id";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const TIMESTAMP: &str = "timestamp";

// `name` and `timestamp` are reserved words, so expressions go through placeholders.
const PROJECTION: &str = "#id, #name, #description, #timestamp";
const UPDATE_EXPRESSION: &str =
    "SET #name = :name, #description = :description, #timestamp = :timestamp";
const ITEM_EXISTS: &str = "attribute_exists(#id)";

type Item = HashMap<String, AttributeValue>;

/// Attribute map stored for `item`.
#[must_use]
pub fn to_item(item: &TodoItem) -> Item {
    HashMap::from([
        (ID.to_string(), AttributeValue::S(item.id.to_string())),
        (NAME.to_string(), AttributeValue::S(item.name.clone())),
        (
            DESCRIPTION.to_string(),
            AttributeValue::S(item.description.clone()),
        ),
        (
            TIMESTAMP.to_string(),
            AttributeValue::S(time::format(&item.timestamp)),
        ),
    ])
}

/// Decode a stored attribute map.
///
/// `name` and `description` default to empty when absent; `id` and
/// `timestamp` are required.
///
/// # Errors
///
/// Returns [`StorageError`] when a required attribute is missing, is not a
/// string, or does not parse.
pub fn from_item(item: &Item) -> Result<TodoItem, StorageError> {
    let id = required(item, ID)?
        .parse::<TodoId>()
        .map_err(|err| StorageError::MalformedAttribute {
            attribute: ID,
            source: Box::new(err),
        })?;
    let timestamp =
        time::parse(required(item, TIMESTAMP)?).map_err(|err| StorageError::MalformedAttribute {
            attribute: TIMESTAMP,
            source: Box::new(err),
        })?;

    Ok(TodoItem {
        id,
        name: optional(item, NAME)?,
        description: optional(item, DESCRIPTION)?,
        timestamp,
    })
}

fn required<'a>(item: &'a Item, attribute: &'static str) -> Result<&'a str, StorageError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value),
        _ => Err(StorageError::MissingAttribute { attribute }),
    }
}

fn optional(item: &Item, attribute: &'static str) -> Result<String, StorageError> {
    match item.get(attribute) {
        None => Ok(String::new()),
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(StorageError::MissingAttribute { attribute }),
    }
}

fn id_key(id: &TodoId) -> AttributeValue {
    AttributeValue::S(id.to_string())
}

/// `DynamoDB`-backed todo repository.
#[derive(Clone)]
pub struct DynamoTodoRepository {
    client: Client,
    table: Arc<str>,
}

impl DynamoTodoRepository {
    /// Create a new repository over `table_name`.
    ///
    /// The table must already exist, see [`crate::Database::ensure_table`].
    #[must_use]
    pub fn new(client: Client, table_name: &TableName) -> Self {
        Self {
            client,
            table: Arc::from(table_name.as_str()),
        }
    }
}

impl TodoRepository for DynamoTodoRepository {
    fn create(&self, item: TodoItem) -> impl Future<Output = Result<TodoItem, TodoError>> + Send {
        let client = self.client.clone();
        let table = Arc::clone(&self.table);
        async move {
            client
                .put_item()
                .table_name(&*table)
                .set_item(Some(to_item(&item)))
                .send()
                .await
                .map_err(StorageError::sdk)?;

            Ok(item)
        }
    }

    fn get_by_id(
        &self,
        id: &TodoId,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        let client = self.client.clone();
        let table = Arc::clone(&self.table);
        let key = id_key(id);
        async move {
            let output = client
                .get_item()
                .table_name(&*table)
                .key(ID, key)
                .consistent_read(true)
                .send()
                .await
                .map_err(StorageError::sdk)?;

            match output.item {
                Some(raw) => Ok(Some(from_item(&raw)?)),
                None => Ok(None),
            }
        }
    }

    fn update(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> impl Future<Output = Result<Option<TodoItem>, TodoError>> + Send {
        let client = self.client.clone();
        let table = Arc::clone(&self.table);
        let key = id_key(id);
        async move {
            let result = client
                .update_item()
                .table_name(&*table)
                .key(ID, key)
                .update_expression(UPDATE_EXPRESSION)
                .condition_expression(ITEM_EXISTS)
                .expression_attribute_names("#id", ID)
                .expression_attribute_names("#name", NAME)
                .expression_attribute_names("#description", DESCRIPTION)
                .expression_attribute_names("#timestamp", TIMESTAMP)
                .expression_attribute_values(":name", AttributeValue::S(changes.name))
                .expression_attribute_values(
                    ":description",
                    AttributeValue::S(changes.description),
                )
                .expression_attribute_values(
                    ":timestamp",
                    AttributeValue::S(time::format(&changes.timestamp)),
                )
                .return_values(ReturnValue::AllNew)
                .send()
                .await;

            match result {
                Ok(output) => match output.attributes {
                    Some(raw) => Ok(Some(from_item(&raw)?)),
                    None => Ok(None),
                },
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(UpdateItemError::is_conditional_check_failed_exception) =>
                {
                    Ok(None)
                }
                Err(err) => Err(StorageError::sdk(err).into()),
            }
        }
    }

    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send {
        let client = self.client.clone();
        let table = Arc::clone(&self.table);
        let key = id_key(id);
        async move {
            client
                .delete_item()
                .table_name(&*table)
                .key(ID, key)
                .send()
                .await
                .map_err(StorageError::sdk)?;

            Ok(())
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<TodoItem>, TodoError>> + Send {
        let client = self.client.clone();
        let table = Arc::clone(&self.table);
        async move {
            let mut items = Vec::new();
            let mut start_key: Option<Item> = None;
            loop {
                let page = client
                    .scan()
                    .table_name(&*table)
                    .projection_expression(PROJECTION)
                    .expression_attribute_names("#id", ID)
                    .expression_attribute_names("#name", NAME)
                    .expression_attribute_names("#description", DESCRIPTION)
                    .expression_attribute_names("#timestamp", TIMESTAMP)
                    .set_exclusive_start_key(start_key.take())
                    .send()
                    .await
                    .map_err(StorageError::sdk)?;

                for raw in page.items.unwrap_or_default() {
                    items.push(from_item(&raw)?);
                }

                match page.last_evaluated_key {
                    Some(next) if !next.is_empty() => start_key = Some(next),
                    _ => break,
                }
            }
            tracing::debug!(count = items.len(), "scanned todo table");
            Ok(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todohub_domain::todo::TodoDraft;

    fn sample() -> TodoItem {
        TodoItem::new(
            "5ba1a7b3e138230b4c3d2f1a".parse().unwrap(),
            TodoDraft::new("a", "b"),
            time::parse("2018-09-19 01:02:03").unwrap(),
        )
    }

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    #[test]
    fn should_store_every_field_as_string_attribute() {
        let item = to_item(&sample());
        assert_eq!(item.len(), 4);
        assert_eq!(item.get("id"), Some(&s("5ba1a7b3e138230b4c3d2f1a")));
        assert_eq!(item.get("name"), Some(&s("a")));
        assert_eq!(item.get("description"), Some(&s("b")));
        assert_eq!(item.get("timestamp"), Some(&s("2018-09-19 01:02:03")));
    }

    #[test]
    fn should_decode_what_it_stores() {
        let decoded = from_item(&to_item(&sample())).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn should_default_absent_text_attributes_to_empty() {
        let mut raw = to_item(&sample());
        raw.remove("description");
        let decoded = from_item(&raw).unwrap();
        assert_eq!(decoded.description, "");
    }

    #[test]
    fn should_reject_item_without_id() {
        let mut raw = to_item(&sample());
        raw.remove("id");
        assert!(matches!(
            from_item(&raw),
            Err(StorageError::MissingAttribute { attribute: "id" })
        ));
    }

    #[test]
    fn should_reject_non_string_timestamp() {
        let mut raw = to_item(&sample());
        raw.insert("timestamp".to_string(), AttributeValue::N("1537318923".to_string()));
        assert!(matches!(
            from_item(&raw),
            Err(StorageError::MissingAttribute {
                attribute: "timestamp"
            })
        ));
    }

    #[test]
    fn should_reject_malformed_id() {
        let mut raw = to_item(&sample());
        raw.insert("id".to_string(), s("not-an-object-id"));
        assert!(matches!(
            from_item(&raw),
            Err(StorageError::MalformedAttribute { attribute: "id", .. })
        ));
    }

    /// Round trip against `DynamoDB` Local on `http://localhost:8000`.
    #[tokio::test]
    #[ignore = "requires a running DynamoDB endpoint"]
    async fn should_round_trip_against_live_endpoint() {
        let db = crate::Config::new("us-east-1", "todohub-test".parse().unwrap())
            .with_endpoint("http://localhost:8000")
            .build()
            .await
            .unwrap();
        let repo = db.todo_repository();
        let item = sample();

        repo.create(item.clone()).await.unwrap();
        assert_eq!(repo.get_by_id(&item.id).await.unwrap(), Some(item.clone()));

        let changes = TodoDraft::new("c", "").stamped(time::parse("2018-09-19 02:00:00").unwrap());
        let updated = repo.update(&item.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "c");

        repo.delete(&item.id).await.unwrap();
        assert!(repo.get_by_id(&item.id).await.unwrap().is_none());

        let gone = TodoDraft::new("x", "y").stamped(time::parse("2018-09-19 03:00:00").unwrap());
        assert!(repo.update(&item.id, gone).await.unwrap().is_none());
    }
}
