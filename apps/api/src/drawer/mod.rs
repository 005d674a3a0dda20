//! Stack of side-panel drawers.
//!
//! The stack owns panel lifecycle only: it stores an opaque content
//! descriptor (which form, which entity, the draft values) and the dashboard
//! resolves that descriptor to widgets. Panels never close on their own; the
//! close control and the backdrop both end in [`DrawerStack::close`].

pub mod handlers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::forms::{Draft, FormKind};
use crate::models::Attachment;

/// Stacking order of the bottom panel; each panel above it adds one.
pub const BASE_Z_INDEX: u32 = 1000;

/// Fields holding exactly one file rather than a list.
const SINGLE_FILE_FIELDS: &[&str] = &["resume", "logo"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawerHandle(Uuid);

impl DrawerHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DrawerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DrawerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DrawerHandle {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Where an inline-created entity's id goes: a field of another open drawer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSlot {
    pub drawer: DrawerHandle,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerContent {
    pub form: FormKind,
    /// Id of the entity being edited; `None` for creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub draft: Draft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<ReturnSlot>,
}

impl DrawerContent {
    pub fn new(form: FormKind) -> Self {
        Self {
            form,
            target: None,
            draft: Draft::new(),
            return_to: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawerError {
    #[error("drawer {0} is not open")]
    NotOpen(DrawerHandle),

    #[error("drawer {handle} has no attachment {index} in '{field}'")]
    NoAttachment {
        handle: DrawerHandle,
        field: String,
        index: usize,
    },
}

#[derive(Debug, Clone)]
struct Panel {
    handle: DrawerHandle,
    title: String,
    content: DrawerContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerView {
    pub handle: DrawerHandle,
    pub title: String,
    pub z_index: u32,
    #[serde(flatten)]
    pub content: DrawerContent,
}

#[derive(Debug, Clone, Default)]
pub struct DrawerStack {
    panels: Vec<Panel>,
}

impl DrawerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, title: impl Into<String>, content: DrawerContent) -> DrawerHandle {
        let handle = DrawerHandle::new();
        self.panels.push(Panel {
            handle,
            title: title.into(),
            content,
        });
        handle
    }

    /// Removes exactly the panel `handle`, wherever it sits in the stack.
    pub fn close(&mut self, handle: DrawerHandle) -> Result<DrawerContent, DrawerError> {
        let pos = self.position(handle)?;
        Ok(self.panels.remove(pos).content)
    }

    pub fn close_all(&mut self) {
        self.panels.clear();
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, handle: DrawerHandle) -> Result<&DrawerContent, DrawerError> {
        let pos = self.position(handle)?;
        Ok(&self.panels[pos].content)
    }

    fn position(&self, handle: DrawerHandle) -> Result<usize, DrawerError> {
        self.panels
            .iter()
            .position(|p| p.handle == handle)
            .ok_or(DrawerError::NotOpen(handle))
    }

    fn content_mut(&mut self, handle: DrawerHandle) -> Result<&mut DrawerContent, DrawerError> {
        let pos = self.position(handle)?;
        Ok(&mut self.panels[pos].content)
    }

    /// Overwrites the given draft fields, leaving others as they are.
    pub fn merge_draft(
        &mut self,
        handle: DrawerHandle,
        fields: Draft,
    ) -> Result<&DrawerContent, DrawerError> {
        let content = self.content_mut(handle)?;
        content.draft.extend(fields);
        Ok(content)
    }

    /// Stores an uploaded file in the draft. List fields append and return
    /// the new index; single-file fields are replaced and return 0.
    pub fn push_attachment(
        &mut self,
        handle: DrawerHandle,
        field: &str,
        attachment: Attachment,
    ) -> Result<usize, DrawerError> {
        let draft = &mut self.content_mut(handle)?.draft;
        if SINGLE_FILE_FIELDS.contains(&field) {
            draft.insert(field.to_string(), json!(attachment));
            return Ok(0);
        }
        let mut list = match draft.remove(field) {
            Some(Value::Array(list)) => list,
            _ => Vec::new(),
        };
        list.push(json!(attachment));
        let index = list.len() - 1;
        draft.insert(field.to_string(), Value::Array(list));
        Ok(index)
    }

    pub fn remove_attachment(
        &mut self,
        handle: DrawerHandle,
        field: &str,
        index: usize,
    ) -> Result<(), DrawerError> {
        let draft = &mut self.content_mut(handle)?.draft;
        let missing = || DrawerError::NoAttachment {
            handle,
            field: field.to_string(),
            index,
        };
        if SINGLE_FILE_FIELDS.contains(&field) {
            return match draft.get(field) {
                Some(v) if !v.is_null() && index == 0 => {
                    draft.insert(field.to_string(), Value::Null);
                    Ok(())
                }
                _ => Err(missing()),
            };
        }
        match draft.get_mut(field) {
            Some(Value::Array(list)) if index < list.len() => {
                list.remove(index);
                Ok(())
            }
            _ => Err(missing()),
        }
    }

    /// Writes an inline-created id into the waiting parent drawer. Returns
    /// `false` when that drawer has been closed in the meantime.
    pub fn deliver(&mut self, slot: &ReturnSlot, id: &str) -> bool {
        match self.content_mut(slot.drawer) {
            Ok(parent) => {
                parent.draft.insert(slot.field.clone(), json!(id));
                true
            }
            Err(_) => false,
        }
    }

    pub fn views(&self) -> Vec<DrawerView> {
        self.panels
            .iter()
            .enumerate()
            .map(|(i, p)| DrawerView {
                handle: p.handle,
                title: p.title.clone(),
                z_index: BASE_Z_INDEX + i as u32,
                content: p.content.clone(),
            })
            .collect()
    }

    pub fn view(&self, handle: DrawerHandle) -> Result<DrawerView, DrawerError> {
        let pos = self.position(handle)?;
        self.views()
            .into_iter()
            .nth(pos)
            .ok_or(DrawerError::NotOpen(handle))
    }
}
