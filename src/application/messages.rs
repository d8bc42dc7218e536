use serde::{Deserialize, Serialize};

use crate::domain::todo::ToDo;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRequest {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub todo: ToDo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateResponse { pub api: String, pub id: i64 }

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadRequest {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadResponse { pub api: String, pub todo: ToDo }

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRequest {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub todo: ToDo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResponse { pub api: String, pub updated: i64 }

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteRequest {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse { pub api: String, pub deleted: i64 }

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadAllRequest {
    #[serde(default)]
    pub api: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadAllResponse { pub api: String, pub todos: Vec<ToDo> }
