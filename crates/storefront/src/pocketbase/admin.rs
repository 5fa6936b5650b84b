//! Superuser operations: authentication and collection schema management.
//!
//! Only the CLI uses these; the storefront never holds superuser credentials.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{PocketBaseClient, StoreError, collections};

/// Summary of an existing collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
}

/// Access rule for one operation. `Open` lets anyone through; `Locked` limits
/// the operation to superusers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Open,
    Locked,
}

impl Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Open => serializer.serialize_str(""),
            Self::Locked => serializer.serialize_none(),
        }
    }
}

/// A field definition in the store's schema format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_int: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_select: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade_delete: Option<bool>,
}

impl FieldSchema {
    fn base(name: &str, kind: &'static str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            only_int: None,
            min: None,
            collection_id: None,
            max_select: None,
            cascade_delete: None,
        }
    }

    /// Plain text field.
    #[must_use]
    pub fn text(name: &str) -> Self {
        Self::base(name, "text")
    }

    /// Non-negative integer field.
    #[must_use]
    pub fn integer(name: &str) -> Self {
        Self {
            only_int: Some(true),
            min: Some(0.0),
            ..Self::base(name, "number")
        }
    }

    /// Boolean field.
    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Self::base(name, "bool")
    }

    /// URL field.
    #[must_use]
    pub fn url(name: &str) -> Self {
        Self::base(name, "url")
    }

    /// Single relation to the collection with id `collection_id`.
    #[must_use]
    pub fn relation(name: &str, collection_id: &str) -> Self {
        Self {
            collection_id: Some(collection_id.to_string()),
            max_select: Some(1),
            cascade_delete: Some(false),
            ..Self::base(name, "relation")
        }
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A base collection definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub list_rule: Rule,
    pub view_rule: Rule,
    pub create_rule: Rule,
    pub update_rule: Rule,
    pub delete_rule: Rule,
    pub fields: Vec<FieldSchema>,
}

impl CollectionSchema {
    /// The `categorias` collection.
    #[must_use]
    pub fn categories() -> Self {
        Self::catalog(
            collections::CATEGORIES,
            vec![
                FieldSchema::text("nombre").required(),
                FieldSchema::text("descripcion"),
            ],
        )
    }

    /// The `repuestos` collection, relating to the categories collection
    /// with id `categories_id`.
    #[must_use]
    pub fn items(categories_id: &str) -> Self {
        Self::catalog(
            collections::ITEMS,
            vec![
                FieldSchema::text("nombre").required(),
                FieldSchema::text("descripcion"),
                FieldSchema::integer("precio"),
                FieldSchema::relation("categoria", categories_id),
                FieldSchema::integer("stock"),
                FieldSchema::boolean("disponible"),
                FieldSchema::url("imagen_url"),
                FieldSchema::text("marca"),
                FieldSchema::text("codigo_producto").required(),
            ],
        )
    }

    /// Catalog collections are publicly listable, viewable, creatable and
    /// deletable; updates need a superuser token.
    fn catalog(name: &str, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.to_string(),
            kind: "base",
            list_rule: Rule::Open,
            view_rule: Rule::Open,
            create_rule: Rule::Open,
            update_rule: Rule::Locked,
            delete_rule: Rule::Open,
            fields,
        }
    }
}

#[derive(Serialize)]
struct PasswordAuth<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

impl PocketBaseClient {
    /// Authenticate as a superuser and return a client carrying the token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` (status 400) for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn authenticate_superuser(
        &self,
        identity: &str,
        password: &SecretString,
    ) -> Result<Self, StoreError> {
        let url = self.endpoint(&[
            "collections",
            collections::SUPERUSERS,
            "auth-with-password",
        ])?;
        let body = PasswordAuth {
            identity,
            password: password.expose_secret(),
        };
        let request = self.http().post(url).json(&body);
        let auth: AuthResponse = self.send(request, "superuser auth").await?;
        Ok(self.with_token(SecretString::from(auth.token)))
    }

    /// Look up a collection by name, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` for failures other than not found.
    #[instrument(skip(self))]
    pub async fn find_collection(&self, name: &str) -> Result<Option<CollectionInfo>, StoreError> {
        let url = self.endpoint(&["collections", name])?;
        let request = self.http().get(url);
        match self.send(request, name).await {
            Ok(info) => Ok(Some(info)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the schema is rejected.
    #[instrument(skip(self, schema), fields(name = %schema.name))]
    pub async fn create_collection(
        &self,
        schema: &CollectionSchema,
    ) -> Result<CollectionInfo, StoreError> {
        let url = self.endpoint(&["collections"])?;
        let request = self.http().post(url).json(schema);
        self.send(request, &schema.name).await
    }
}
