//! Scripted stand-ins for the terminal and the model provider.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use blueprint_lib::schema::{AbstractSchema, Field, FieldType, Model};
use blueprint_lib::{BlueprintError, Prompter, SchemaDesigner};

/// Replays canned answers and records everything shown.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: VecDeque<String>,
    pub secrets: VecDeque<String>,
    pub selections: VecDeque<usize>,
    pub shown: Vec<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn transcript(&self) -> String {
        self.shown.join("\n")
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, message: &str, _help: Option<&str>) -> Result<String, BlueprintError> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| BlueprintError::Interaction("script exhausted".to_string()))
    }

    fn secret(&mut self, message: &str) -> Result<String, BlueprintError> {
        self.asked.push(message.to_string());
        self.secrets
            .pop_front()
            .ok_or_else(|| BlueprintError::Interaction("script exhausted".to_string()))
    }

    fn select(&mut self, message: &str, _options: &[String]) -> Result<usize, BlueprintError> {
        self.asked.push(message.to_string());
        self.selections
            .pop_front()
            .ok_or_else(|| BlueprintError::Interaction("script exhausted".to_string()))
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}

/// A recorded call to the designer.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignCall {
    Generate { idea: String },
    Revise { schema_json: String, request: String },
}

/// Returns queued results in order and records every call.
#[derive(Default)]
pub struct ScriptedDesigner {
    pub results: RefCell<VecDeque<Result<AbstractSchema, BlueprintError>>>,
    pub calls: RefCell<Vec<DesignCall>>,
}

impl ScriptedDesigner {
    pub fn new(results: Vec<Result<AbstractSchema, BlueprintError>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn next(&self) -> Result<AbstractSchema, BlueprintError> {
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(BlueprintError::Interaction("no scripted result".to_string())))
    }
}

impl SchemaDesigner for ScriptedDesigner {
    async fn generate_schema(&self, idea: &str) -> Result<AbstractSchema, BlueprintError> {
        self.calls.borrow_mut().push(DesignCall::Generate {
            idea: idea.to_string(),
        });
        self.next()
    }

    async fn revise_schema(
        &self,
        schema: &AbstractSchema,
        request: &str,
    ) -> Result<AbstractSchema, BlueprintError> {
        self.calls.borrow_mut().push(DesignCall::Revise {
            schema_json: schema.to_pretty_json(),
            request: request.to_string(),
        });
        self.next()
    }
}

pub fn todo_schema() -> AbstractSchema {
    AbstractSchema::new(vec![
        Model::new(
            "users",
            vec![
                Field::new("id", FieldType::Serial).primary_key(),
                Field::new("email", FieldType::Varchar).not_null().unique(),
            ],
        ),
        Model::new(
            "tasks",
            vec![
                Field::new("id", FieldType::Serial).primary_key(),
                Field::new("title", FieldType::Text).not_null(),
                Field::new("user_id", FieldType::Integer)
                    .not_null()
                    .references("users", "id"),
            ],
        ),
    ])
}

pub fn todo_schema_with_due_date() -> AbstractSchema {
    let mut schema = todo_schema();
    schema.models[1]
        .fields
        .push(Field::new("due_date", FieldType::Date));
    schema
}
