//! Security tools: roles, users and class-level permissions.

use super::{json_text_result, parse_args, tool};
use crate::error::Result;
use parsebridge_rest::client::ParseClient;
use parsebridge_rest::ops;
use parsebridge_rest::query::QueryString;
use reqwest::Method;
use rmcp::model::{CallToolResult, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

pub const CREATE_ROLE: &str = "parse_create_role";
pub const GET_ROLE: &str = "parse_get_role";
pub const LIST_ROLES: &str = "parse_list_roles";
pub const UPDATE_ROLE: &str = "parse_update_role";
pub const DELETE_ROLE: &str = "parse_delete_role";
pub const ADD_USERS_TO_ROLE: &str = "parse_add_users_to_role";
pub const REMOVE_USERS_FROM_ROLE: &str = "parse_remove_users_from_role";
pub const UPDATE_CLP: &str = "parse_update_clp";
pub const CREATE_USER: &str = "parse_create_user";
pub const GET_USER: &str = "parse_get_user";
pub const LIST_USERS: &str = "parse_list_users";

#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            CREATE_ROLE,
            "Create an access-control role. ACL is required and maps actors to read/write grants, e.g. {\"*\": {\"read\": true}, \"role:Admin\": {\"read\": true, \"write\": true}}. Optional users/roles arrays of objectIds become relation members. Requires the master key.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Role name"},
                    "ACL": {"type": "object", "description": "Access control list of the role (required)"},
                    "users": {"type": "array", "items": {"type": "string"}, "description": "objectIds of member users"},
                    "roles": {"type": "array", "items": {"type": "string"}, "description": "objectIds of inherited roles"},
                },
                "required": ["name", "ACL"],
            }),
        ),
        tool(
            GET_ROLE,
            "Fetch one role by objectId: name, ACL and relation fields. Requires the master key.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "objectId": {"type": "string", "description": "objectId of the role"},
                },
                "required": ["objectId"],
            }),
        ),
        tool(
            LIST_ROLES,
            "List roles, optionally filtered by where and limited. Requires the master key.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "where": {"type": "object", "description": "Filter, e.g. {\"name\": \"Admin\"}"},
                    "limit": {"type": "integer", "description": "Maximum results"},
                },
            }),
        ),
        tool(
            UPDATE_ROLE,
            "Rename a role or replace its ACL. Use parse_add_users_to_role / parse_remove_users_from_role for membership. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "objectId": {"type": "string", "description": "objectId of the role"},
                    "name": {"type": "string", "description": "New role name"},
                    "ACL": {"type": "object", "description": "New ACL"},
                },
                "required": ["objectId"],
            }),
        ),
        tool(
            DELETE_ROLE,
            "Permanently delete a role; members lose its grants. Requires the master key.",
            &Method::DELETE,
            json!({
                "type": "object",
                "properties": {
                    "objectId": {"type": "string", "description": "objectId of the role to delete"},
                },
                "required": ["objectId"],
            }),
        ),
        tool(
            ADD_USERS_TO_ROLE,
            "Add users to a role by objectId; they inherit the role's grants. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "roleId": {"type": "string", "description": "objectId of the role"},
                    "userIds": {"type": "array", "items": {"type": "string"}, "description": "objectIds of users to add"},
                },
                "required": ["roleId", "userIds"],
            }),
        ),
        tool(
            REMOVE_USERS_FROM_ROLE,
            "Remove users from a role by objectId. Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "roleId": {"type": "string", "description": "objectId of the role"},
                    "userIds": {"type": "array", "items": {"type": "string"}, "description": "objectIds of users to remove"},
                },
                "required": ["roleId", "userIds"],
            }),
        ),
        tool(
            UPDATE_CLP,
            "Set class-level permissions: who may get, find, create, update, delete or addField. Actors are \"*\" (public), \"requiresAuthentication\", or \"role:RoleName\". Requires the master key.",
            &Method::PUT,
            json!({
                "type": "object",
                "properties": {
                    "className": {"type": "string", "description": "Parse class name"},
                    "permissions": {
                        "type": "object",
                        "properties": {
                            "get": {"type": "object", "additionalProperties": {"type": "boolean"}},
                            "find": {"type": "object", "additionalProperties": {"type": "boolean"}},
                            "create": {"type": "object", "additionalProperties": {"type": "boolean"}},
                            "update": {"type": "object", "additionalProperties": {"type": "boolean"}},
                            "delete": {"type": "object", "additionalProperties": {"type": "boolean"}},
                            "addField": {"type": "object", "additionalProperties": {"type": "boolean"}},
                        },
                        "description": "Permission map, e.g. {\"get\": {\"*\": true}, \"find\": {\"requiresAuthentication\": true}}",
                    },
                },
                "required": ["className", "permissions"],
            }),
        ),
        tool(
            CREATE_USER,
            "Create a user account. username and password are required; email and additionalFields are optional. Returns a sessionToken.",
            &Method::POST,
            json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string", "description": "Username"},
                    "password": {"type": "string", "description": "Password"},
                    "email": {"type": "string", "description": "Email address"},
                    "additionalFields": {"type": "object", "description": "Extra user fields"},
                },
                "required": ["username", "password"],
            }),
        ),
        tool(
            GET_USER,
            "Fetch one user by objectId (password is never returned). Requires the master key.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "objectId": {"type": "string", "description": "objectId of the user"},
                },
                "required": ["objectId"],
            }),
        ),
        tool(
            LIST_USERS,
            "List users, optionally filtered by where and limited. Requires the master key.",
            &Method::GET,
            json!({
                "type": "object",
                "properties": {
                    "where": {"type": "object", "description": "Filter, e.g. {\"username\": \"admin\"}"},
                    "limit": {"type": "integer", "description": "Maximum results"},
                },
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateRoleArgs {
    name: String,
    #[serde(rename = "ACL")]
    acl: Map<String, Value>,
    users: Option<Vec<String>>,
    roles: Option<Vec<String>>,
}

pub async fn create_role(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: CreateRoleArgs = parse_args(arguments)?;

    let mut body = Map::new();
    body.insert("name".to_string(), json!(args.name));
    body.insert("ACL".to_string(), Value::Object(args.acl));
    if let Some(users) = &args.users {
        body.insert("users".to_string(), ops::add_relation("_User", users));
    }
    if let Some(roles) = &args.roles {
        body.insert("roles".to_string(), ops::add_relation("_Role", roles));
    }

    let result = client.post_master("/roles", Value::Object(body)).await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ObjectIdArgs {
    object_id: String,
}

pub async fn get_role(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: ObjectIdArgs = parse_args(arguments)?;

    let data = client
        .get_master(&format!("/roles/{}", args.object_id))
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListArgs {
    #[serde(rename = "where")]
    where_filter: Option<Value>,
    limit: Option<u32>,
}

fn list_query(args: &ListArgs) -> QueryString {
    let mut query = QueryString::new();
    if let Some(where_filter) = &args.where_filter {
        query.push_json("where", where_filter);
    }
    if let Some(limit) = args.limit {
        query.push("limit", limit.to_string());
    }
    query
}

pub async fn list_roles(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: ListArgs = parse_args(arguments)?;

    let path = format!("/roles{}", list_query(&args).suffix());
    let data = client.get_master(&path).await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateRoleArgs {
    #[serde(rename = "objectId")]
    object_id: String,
    name: Option<String>,
    #[serde(rename = "ACL")]
    acl: Option<Map<String, Value>>,
}

pub async fn update_role(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: UpdateRoleArgs = parse_args(arguments)?;

    let mut body = Map::new();
    if let Some(name) = &args.name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(acl) = args.acl {
        body.insert("ACL".to_string(), Value::Object(acl));
    }

    let result = client
        .put_master(&format!("/roles/{}", args.object_id), Value::Object(body))
        .await?;
    json_text_result(&result)
}

pub async fn delete_role(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: ObjectIdArgs = parse_args(arguments)?;

    let result = client
        .delete_master(&format!("/roles/{}", args.object_id))
        .await?;
    json_text_result(&result)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RoleMembershipArgs {
    role_id: String,
    user_ids: Vec<String>,
}

pub async fn add_users_to_role(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: RoleMembershipArgs = parse_args(arguments)?;

    let mut body = Map::new();
    body.insert(
        "users".to_string(),
        ops::add_relation("_User", &args.user_ids),
    );

    let result = client
        .put_master(&format!("/roles/{}", args.role_id), Value::Object(body))
        .await?;
    json_text_result(&result)
}

pub async fn remove_users_from_role(
    client: &ParseClient,
    arguments: Value,
) -> Result<CallToolResult> {
    let args: RoleMembershipArgs = parse_args(arguments)?;

    let mut body = Map::new();
    body.insert(
        "users".to_string(),
        ops::remove_relation("_User", &args.user_ids),
    );

    let result = client
        .put_master(&format!("/roles/{}", args.role_id), Value::Object(body))
        .await?;
    json_text_result(&result)
}

/// One CLP action map: actor (`*`, `requiresAuthentication`, `role:Name`,
/// or a user objectId) to allowed flag.
type ActorGrants = BTreeMap<String, bool>;

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ClassPermissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    get: Option<ActorGrants>,
    #[serde(skip_serializing_if = "Option::is_none")]
    find: Option<ActorGrants>,
    #[serde(skip_serializing_if = "Option::is_none")]
    create: Option<ActorGrants>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<ActorGrants>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete: Option<ActorGrants>,
    #[serde(skip_serializing_if = "Option::is_none")]
    add_field: Option<ActorGrants>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UpdateClpArgs {
    class_name: String,
    permissions: ClassPermissions,
}

pub async fn update_clp(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: UpdateClpArgs = parse_args(arguments)?;

    let payload = json!({
        "classLevelPermissions": serde_json::to_value(&args.permissions)?,
    });
    let data = client
        .put_master(&format!("/schemas/{}", args.class_name), payload)
        .await?;
    json_text_result(&data)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateUserArgs {
    username: String,
    password: String,
    email: Option<String>,
    additional_fields: Option<Map<String, Value>>,
}

pub async fn create_user(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: CreateUserArgs = parse_args(arguments)?;

    // Explicit fields win over anything in additionalFields.
    let mut body = args.additional_fields.unwrap_or_default();
    body.insert("username".to_string(), json!(args.username));
    body.insert("password".to_string(), json!(args.password));
    if let Some(email) = &args.email {
        body.insert("email".to_string(), json!(email));
    }

    let result = client.post("/users", Value::Object(body)).await?;
    json_text_result(&result)
}

pub async fn get_user(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: ObjectIdArgs = parse_args(arguments)?;

    let data = client
        .get_master(&format!("/users/{}", args.object_id))
        .await?;
    json_text_result(&data)
}

pub async fn list_users(client: &ParseClient, arguments: Value) -> Result<CallToolResult> {
    let args: ListArgs = parse_args(arguments)?;

    let path = format!("/users{}", list_query(&args).suffix());
    let data = client.get_master(&path).await?;
    json_text_result(&data)
}
