//! The composition root: an ordered set of stacks and their synthesis.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use serde_json::json;
use tracing::info;

use crate::error::{StackError, StackResult};
use crate::stack::{ServiceStack, ServiceStackProps};

pub const MANIFEST_FILE: &str = "manifest.json";

// Stack ids double as template file names.
static STACK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("static regex"));

#[derive(Debug, Default)]
pub struct App {
    stacks: Vec<ServiceStack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack and add it to the app. Stack ids must be unique, start
    /// with a letter and contain only ASCII letters, digits and `-`.
    pub fn add_stack(
        &mut self,
        id: impl Into<String>,
        props: ServiceStackProps,
    ) -> StackResult<&ServiceStack> {
        let id = id.into();
        if !STACK_ID_RE.is_match(&id) {
            return Err(StackError::InvalidStackId(id));
        }
        if self.get(&id).is_some() {
            return Err(StackError::DuplicateStack(id));
        }
        let stack = ServiceStack::new(id, props)?;
        self.stacks.push(stack);
        Ok(&self.stacks[self.stacks.len() - 1])
    }

    pub fn get(&self, id: &str) -> Option<&ServiceStack> {
        self.stacks.iter().find(|s| s.id() == id)
    }

    pub fn stacks(&self) -> impl Iterator<Item = &ServiceStack> {
        self.stacks.iter()
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Write every stack's template (or only `only`) into `out_dir`, plus a
    /// manifest listing them. Returns the template paths in stack order.
    pub fn synth(&self, out_dir: &Path, only: Option<&str>) -> StackResult<Vec<PathBuf>> {
        let selected: Vec<&ServiceStack> = match only {
            Some(id) => vec![self.get(id).ok_or_else(|| StackError::UnknownStack(id.to_string()))?],
            None => self.stacks.iter().collect(),
        };

        std::fs::create_dir_all(out_dir).map_err(|source| StackError::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(selected.len());
        let mut manifest = serde_json::Map::new();

        for stack in selected {
            let file_name = format!("{}.template.json", stack.id());
            let path = out_dir.join(&file_name);
            write_json(&path, &stack.template())?;

            manifest.insert(
                stack.id().to_string(),
                json!({
                    "template": file_name,
                    "strategy": stack.strategy().map(|s| s.kind()),
                }),
            );
            info!(stack = %stack.id(), path = %path.display(), "template written");
            written.push(path);
        }

        write_json(
            &out_dir.join(MANIFEST_FILE),
            &json!({ "stacks": manifest }),
        )?;
        Ok(written)
    }
}

fn write_json(path: &Path, value: &serde_json::Value) -> StackResult<()> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).map_err(|source| StackError::Write {
        path: path.to_path_buf(),
        source,
    })
}
